//! Data structures mirroring the SQLite tables.

use crate::models::beatmap::{BeatmapRecord, BeatmapSetRecord};
use crate::models::ruleset::Ruleset;
use crate::models::score::{ScoreRecord, UserRef};
use crate::models::stats::HitStats;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct BeatmapsetRow {
    pub id: i64,
    pub online_id: Option<i64>,
    pub hash: String,
    pub artist: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct BeatmapRow {
    pub id: i64,
    pub beatmapset_id: i64,
    pub online_id: Option<i64>,
    pub difficulty_name: String,
    pub ruleset: i64,
}

#[derive(Debug, Clone, FromRow)]
pub struct ScoreRow {
    pub id: i64,
    pub online_id: Option<i64>,
    pub hash: String,
    pub beatmap_id: i64,
    pub ruleset: i64,
    pub username: String,
    pub user_online_id: Option<i64>,
    pub total_score: i64,
    pub accuracy: f64,
    pub max_combo: i32,
    pub statistics: String, // JSON-encoded HitStats
    pub has_replay: bool,
    pub imported_at: i64,
}

fn decode_ruleset(id: i64) -> Result<Ruleset, sqlx::Error> {
    Ruleset::from_id(id)
        .ok_or_else(|| sqlx::Error::Decode(format!("unknown ruleset id {}", id).into()))
}

impl TryFrom<BeatmapRow> for BeatmapRecord {
    type Error = sqlx::Error;

    fn try_from(row: BeatmapRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            set_id: row.beatmapset_id,
            online_id: row.online_id,
            difficulty_name: row.difficulty_name,
            ruleset: decode_ruleset(row.ruleset)?,
        })
    }
}

impl BeatmapsetRow {
    pub fn into_record(self, beatmaps: Vec<BeatmapRow>) -> Result<BeatmapSetRecord, sqlx::Error> {
        let beatmaps = beatmaps
            .into_iter()
            .map(BeatmapRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BeatmapSetRecord {
            id: self.id,
            online_id: self.online_id,
            hash: self.hash,
            artist: self.artist,
            title: self.title,
            author: self.author,
            beatmaps,
        })
    }
}

impl TryFrom<ScoreRow> for ScoreRecord {
    type Error = sqlx::Error;

    fn try_from(row: ScoreRow) -> Result<Self, Self::Error> {
        let statistics = HitStats::from_json(&row.statistics)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;

        Ok(Self {
            id: row.id,
            online_id: row.online_id,
            hash: row.hash,
            beatmap_id: row.beatmap_id,
            ruleset: decode_ruleset(row.ruleset)?,
            user: UserRef {
                username: row.username,
                online_id: row.user_online_id,
            },
            total_score: row.total_score,
            accuracy: row.accuracy,
            max_combo: row.max_combo,
            statistics,
            has_replay: row.has_replay,
            imported_at: row.imported_at,
        })
    }
}
