//! Import entry points for beatmap sets and scores.
//!
//! Imports never return errors. A failed import is logged and yields `None`,
//! and whatever was not imported later shows up as an unknown score.

use crate::database::connection::Database;
use crate::database::query;
use crate::database::replay_storage::ReplayStore;
use crate::models::beatmap::BeatmapSetRecord;
use crate::models::replay::ReplayData;
use crate::models::ruleset::Ruleset;
use crate::models::score::{ScoreRecord, UserRef};
use crate::models::stats::HitStats;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub struct BeatmapImport {
    pub online_id: Option<i64>,
    pub difficulty_name: String,
    pub ruleset: Ruleset,
}

#[derive(Debug, Clone)]
pub struct BeatmapSetImport {
    pub online_id: Option<i64>,
    /// Generated when absent.
    pub hash: Option<String>,
    pub artist: String,
    pub title: String,
    pub author: String,
    pub beatmaps: Vec<BeatmapImport>,
}

#[derive(Debug, Clone)]
pub struct ScoreImport {
    /// `None` generates a fresh hash; `Some("")` stores a hashless score.
    pub hash: Option<String>,
    pub online_id: Option<i64>,
    pub beatmap_id: i64,
    pub ruleset: Ruleset,
    pub user: UserRef,
    pub total_score: i64,
    pub statistics: HitStats,
    pub max_combo: i32,
    pub replay: Option<ReplayData>,
}

impl ScoreImport {
    /// Minimal guest score on `beatmap_id`.
    pub fn new(beatmap_id: i64, ruleset: Ruleset) -> Self {
        Self {
            hash: None,
            online_id: None,
            beatmap_id,
            ruleset,
            user: UserRef::guest(),
            total_score: 0,
            statistics: HitStats::new(),
            max_combo: 0,
            replay: None,
        }
    }

    pub fn with_online_id(mut self, online_id: i64) -> Self {
        self.online_id = Some(online_id);
        self
    }

    pub fn with_hash(mut self, hash: impl Into<String>) -> Self {
        self.hash = Some(hash.into());
        self
    }

    pub fn with_replay(mut self, replay: ReplayData) -> Self {
        self.replay = Some(replay);
        self
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

fn now_nanos() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default()
}

impl Database {
    /// Imports a beatmap set with its difficulties.
    pub async fn import_beatmap_set(&self, import: BeatmapSetImport) -> Option<BeatmapSetRecord> {
        match self.try_import_beatmap_set(import).await {
            Ok(set) => set,
            Err(e) => {
                log::error!("IMPORT: Beatmap set import failed: {}", e);
                None
            }
        }
    }

    async fn try_import_beatmap_set(
        &self,
        import: BeatmapSetImport,
    ) -> Result<Option<BeatmapSetRecord>, sqlx::Error> {
        if import.beatmaps.is_empty() {
            log::warn!("IMPORT: Skipping set '{}' without beatmaps", import.title);
            return Ok(None);
        }

        let hash = match import.hash {
            Some(hash) if !hash.is_empty() => hash,
            _ => format!(
                "{:x}",
                md5::compute(format!(
                    "{}:{}:{}:{:?}:{}",
                    import.artist,
                    import.title,
                    import.author,
                    import.online_id,
                    now_nanos()
                ))
            ),
        };

        if query::beatmapset_hash_exists(self.pool(), &hash).await? {
            log::warn!("IMPORT: Beatmap set {} already imported", hash);
            return Ok(None);
        }

        let mut tx = self.pool().begin().await?;
        let set_id = query::insert_beatmapset(
            &mut *tx,
            import.online_id,
            &hash,
            &import.artist,
            &import.title,
            &import.author,
        )
        .await?;

        for beatmap in &import.beatmaps {
            query::insert_beatmap(
                &mut *tx,
                set_id,
                beatmap.online_id,
                &beatmap.difficulty_name,
                beatmap.ruleset.id(),
            )
            .await?;
        }
        tx.commit().await?;

        log::info!(
            "IMPORT: Beatmap set '{} - {}' ({} difficulties)",
            import.artist,
            import.title,
            import.beatmaps.len()
        );
        self.beatmapset(set_id).await
    }

    /// Imports a score and its replay payload.
    pub async fn import_score(
        &self,
        replays: &ReplayStore,
        import: ScoreImport,
    ) -> Option<ScoreRecord> {
        match self.try_import_score(replays, import).await {
            Ok(score) => score,
            Err(e) => {
                log::error!("IMPORT: Score import failed: {}", e);
                None
            }
        }
    }

    async fn try_import_score(
        &self,
        replays: &ReplayStore,
        import: ScoreImport,
    ) -> Result<Option<ScoreRecord>, sqlx::Error> {
        if self.beatmap(import.beatmap_id).await?.is_none() {
            log::warn!(
                "IMPORT: Score references unknown beatmap {}",
                import.beatmap_id
            );
            return Ok(None);
        }

        let imported_at = now_millis();
        let hash = match import.hash {
            Some(hash) => hash,
            None => {
                let next_id = query::next_score_id(self.pool()).await?;
                format!(
                    "{:x}",
                    md5::compute(format!(
                        "{}:{}:{}:{:?}:{}:{}:{}",
                        import.beatmap_id,
                        import.ruleset.id(),
                        import.user.username,
                        import.online_id,
                        import.total_score,
                        next_id,
                        now_nanos()
                    ))
                )
            }
        };

        if !hash.is_empty() && self.score_by_hash(&hash).await?.is_some() {
            log::warn!("IMPORT: Score {} already imported", hash);
            return Ok(None);
        }

        let statistics = import
            .statistics
            .to_json()
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let id = query::insert_score(
            self.pool(),
            import.online_id,
            &hash,
            import.beatmap_id,
            import.ruleset.id(),
            &import.user.username,
            import.user.online_id,
            import.total_score,
            import.statistics.calculate_accuracy(),
            import.max_combo,
            &statistics,
            imported_at,
        )
        .await?;

        if let Some(replay) = &import.replay {
            match replays.save(&ReplayStore::key_for(&hash, id), replay) {
                Ok(_) => query::mark_score_replay(self.pool(), id).await?,
                Err(e) => log::error!("IMPORT: Failed to store replay for score {}: {}", id, e),
            }
        }

        log::info!(
            "IMPORT: Score {} (online id {:?}, hash '{}', ruleset {})",
            id,
            import.online_id,
            hash,
            import.ruleset
        );
        self.score(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> BeatmapSetImport {
        BeatmapSetImport {
            online_id: Some(1),
            hash: None,
            artist: "SomeArtist".to_string(),
            title: "import".to_string(),
            author: "SomeAuthor".to_string(),
            beatmaps: vec![
                BeatmapImport {
                    online_id: Some(1024),
                    difficulty_name: "Easy".to_string(),
                    ruleset: Ruleset::Osu,
                },
                BeatmapImport {
                    online_id: Some(2048),
                    difficulty_name: "Hard".to_string(),
                    ruleset: Ruleset::Osu,
                },
            ],
        }
    }

    #[tokio::test]
    async fn imports_set_with_difficulties() {
        let db = Database::in_memory().await.unwrap();
        let set = db.import_beatmap_set(sample_set()).await.unwrap();

        assert_eq!(set.beatmaps.len(), 2);
        assert_eq!(set.beatmaps[0].online_id, Some(1024));
        assert_eq!(db.beatmapsets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_set_hash_is_a_failed_import() {
        let db = Database::in_memory().await.unwrap();
        let mut import = sample_set();
        import.hash = Some("set-hash".to_string());

        assert!(db.import_beatmap_set(import.clone()).await.is_some());
        assert!(db.import_beatmap_set(import).await.is_none());
    }

    #[tokio::test]
    async fn empty_set_is_a_failed_import() {
        let db = Database::in_memory().await.unwrap();
        let mut import = sample_set();
        import.beatmaps.clear();
        assert!(db.import_beatmap_set(import).await.is_none());
    }

    #[tokio::test]
    async fn score_gets_generated_hash_and_replay() {
        let dir = tempfile::tempdir().unwrap();
        let replays = ReplayStore::new(dir.path());
        let db = Database::in_memory().await.unwrap();
        let set = db.import_beatmap_set(sample_set()).await.unwrap();

        let mut replay = ReplayData::new(1.0);
        replay.add_press(500, 1);
        let score = db
            .import_score(
                &replays,
                ScoreImport::new(set.beatmaps[0].id, Ruleset::Osu)
                    .with_online_id(1)
                    .with_replay(replay.clone()),
            )
            .await
            .unwrap();

        assert_eq!(score.hash.len(), 32);
        assert!(score.has_replay);
        assert_eq!(replays.load_for(&score).unwrap(), Some(replay));
    }

    #[tokio::test]
    async fn consecutive_imports_get_distinct_hashes() {
        let dir = tempfile::tempdir().unwrap();
        let replays = ReplayStore::new(dir.path());
        let db = Database::in_memory().await.unwrap();
        let set = db.import_beatmap_set(sample_set()).await.unwrap();
        let beatmap_id = set.beatmaps[0].id;

        let first = db
            .import_score(&replays, ScoreImport::new(beatmap_id, Ruleset::Osu).with_online_id(1))
            .await
            .unwrap();
        let second = db
            .import_score(&replays, ScoreImport::new(beatmap_id, Ruleset::Osu).with_online_id(1))
            .await
            .unwrap();

        assert_ne!(first.hash, second.hash);
        assert_eq!(db.scores_by_online_id(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn duplicate_hash_and_unknown_beatmap_fail() {
        let dir = tempfile::tempdir().unwrap();
        let replays = ReplayStore::new(dir.path());
        let db = Database::in_memory().await.unwrap();
        let set = db.import_beatmap_set(sample_set()).await.unwrap();
        let beatmap_id = set.beatmaps[0].id;

        let import = ScoreImport::new(beatmap_id, Ruleset::Osu).with_hash("deadbeef");
        assert!(db.import_score(&replays, import.clone()).await.is_some());
        assert!(db.import_score(&replays, import).await.is_none());
        assert!(
            db.import_score(&replays, ScoreImport::new(9999, Ruleset::Osu))
                .await
                .is_none()
        );
        assert_eq!(db.count_scores().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn hashless_scores_may_repeat() {
        let dir = tempfile::tempdir().unwrap();
        let replays = ReplayStore::new(dir.path());
        let db = Database::in_memory().await.unwrap();
        let set = db.import_beatmap_set(sample_set()).await.unwrap();
        let beatmap_id = set.beatmaps[0].id;

        for _ in 0..2 {
            let score = db
                .import_score(&replays, ScoreImport::new(beatmap_id, Ruleset::Osu).with_hash(""))
                .await
                .unwrap();
            assert!(score.hash.is_empty());
        }
        assert_eq!(db.count_scores().await.unwrap(), 2);
    }
}
