use crate::database::query;
use crate::models::beatmap::{BeatmapRecord, BeatmapSetRecord};
use crate::models::score::ScoreRecord;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Handle on the SQLite store holding beatmaps and scores.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens or creates the database file.
    pub async fn new(db_path: &Path) -> Result<Self, sqlx::Error> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                sqlx::Error::Io(std::io::Error::other(format!(
                    "Unable to create parent directory: {}",
                    e
                )))
            })?;
        }

        let absolute_path = if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            std::env::current_dir()
                .unwrap_or_else(|_| PathBuf::from("."))
                .join(db_path)
        };

        let options = SqliteConnectOptions::new()
            .filename(&absolute_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePool::connect_with(options).await?;
        let db = Database { pool };
        db.init_schema().await?;
        log::info!("DB: Opened {:?}", absolute_path);
        Ok(db)
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is capped at one connection; every SQLite memory connection
    /// is a separate database.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        let db = Database { pool };
        db.init_schema().await?;
        Ok(db)
    }

    async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS beatmapset (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                online_id INTEGER,
                hash TEXT NOT NULL UNIQUE,
                artist TEXT NOT NULL,
                title TEXT NOT NULL,
                author TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS beatmap (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                beatmapset_id INTEGER NOT NULL,
                online_id INTEGER,
                difficulty_name TEXT NOT NULL,
                ruleset INTEGER NOT NULL,
                FOREIGN KEY (beatmapset_id) REFERENCES beatmapset(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        // Hash is empty for scores synthesized from online data, so it cannot
        // be the primary key.
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS score (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                online_id INTEGER,
                hash TEXT NOT NULL DEFAULT '',
                beatmap_id INTEGER NOT NULL,
                ruleset INTEGER NOT NULL,
                username TEXT NOT NULL,
                user_online_id INTEGER,
                total_score INTEGER NOT NULL,
                accuracy REAL NOT NULL,
                max_combo INTEGER NOT NULL,
                statistics TEXT NOT NULL,
                has_replay INTEGER NOT NULL DEFAULT 0,
                imported_at INTEGER NOT NULL,
                FOREIGN KEY (beatmap_id) REFERENCES beatmap(id) ON DELETE CASCADE
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_score_hash ON score(hash) WHERE hash != ''",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_score_online_id ON score(online_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn score(&self, id: i64) -> Result<Option<ScoreRecord>, sqlx::Error> {
        query::get_score(&self.pool, id)
            .await?
            .map(ScoreRecord::try_from)
            .transpose()
    }

    pub async fn score_by_hash(&self, hash: &str) -> Result<Option<ScoreRecord>, sqlx::Error> {
        query::find_score_by_hash(&self.pool, hash)
            .await?
            .map(ScoreRecord::try_from)
            .transpose()
    }

    pub async fn score_by_online_id(
        &self,
        online_id: i64,
    ) -> Result<Option<ScoreRecord>, sqlx::Error> {
        query::find_score_by_online_id(&self.pool, online_id)
            .await?
            .map(ScoreRecord::try_from)
            .transpose()
    }

    /// Every stored score sharing `online_id`, oldest import first.
    pub async fn scores_by_online_id(
        &self,
        online_id: i64,
    ) -> Result<Vec<ScoreRecord>, sqlx::Error> {
        query::get_scores_by_online_id(&self.pool, online_id)
            .await?
            .into_iter()
            .map(ScoreRecord::try_from)
            .collect()
    }

    pub async fn count_scores(&self) -> Result<i64, sqlx::Error> {
        query::count_scores(&self.pool).await
    }

    pub async fn beatmap(&self, id: i64) -> Result<Option<BeatmapRecord>, sqlx::Error> {
        query::get_beatmap(&self.pool, id)
            .await?
            .map(BeatmapRecord::try_from)
            .transpose()
    }

    pub async fn beatmapset(&self, id: i64) -> Result<Option<BeatmapSetRecord>, sqlx::Error> {
        query::get_beatmapset(&self.pool, id)
            .await?
            .map(|(set, beatmaps)| set.into_record(beatmaps))
            .transpose()
    }

    /// Retrieves all beatmapsets with their beatmaps.
    pub async fn beatmapsets(&self) -> Result<Vec<BeatmapSetRecord>, sqlx::Error> {
        query::get_all_beatmapsets(&self.pool)
            .await?
            .into_iter()
            .map(|(set, beatmaps)| set.into_record(beatmaps))
            .collect()
    }
}
