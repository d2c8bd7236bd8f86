//! Raw sqlx query helpers for the persistent database layer.

#![allow(clippy::too_many_arguments)]

use crate::database::models::{BeatmapRow, BeatmapsetRow, ScoreRow};
use sqlx::{SqliteExecutor, SqlitePool};

const SCORE_COLUMNS: &str = "id, online_id, hash, beatmap_id, ruleset, username, user_online_id, \
     total_score, accuracy, max_combo, statistics, has_replay, imported_at";

// ============================================================================
// BEATMAP QUERIES
// ============================================================================

pub async fn beatmapset_hash_exists(pool: &SqlitePool, hash: &str) -> Result<bool, sqlx::Error> {
    let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM beatmapset WHERE hash = ?1")
        .bind(hash)
        .fetch_optional(pool)
        .await?;
    Ok(existing.is_some())
}

pub async fn insert_beatmapset<'e>(
    executor: impl SqliteExecutor<'e>,
    online_id: Option<i64>,
    hash: &str,
    artist: &str,
    title: &str,
    author: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO beatmapset (online_id, hash, artist, title, author)
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(online_id)
    .bind(hash)
    .bind(artist)
    .bind(title)
    .bind(author)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn insert_beatmap<'e>(
    executor: impl SqliteExecutor<'e>,
    beatmapset_id: i64,
    online_id: Option<i64>,
    difficulty_name: &str,
    ruleset: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO beatmap (beatmapset_id, online_id, difficulty_name, ruleset)
         VALUES (?1, ?2, ?3, ?4)",
    )
    .bind(beatmapset_id)
    .bind(online_id)
    .bind(difficulty_name)
    .bind(ruleset)
    .execute(executor)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_beatmap(pool: &SqlitePool, id: i64) -> Result<Option<BeatmapRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, beatmapset_id, online_id, difficulty_name, ruleset FROM beatmap WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn get_beatmapset(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<(BeatmapsetRow, Vec<BeatmapRow>)>, sqlx::Error> {
    let set: Option<BeatmapsetRow> = sqlx::query_as(
        "SELECT id, online_id, hash, artist, title, author FROM beatmapset WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match set {
        Some(set) => {
            let beatmaps = get_beatmaps_for_set(pool, set.id).await?;
            Ok(Some((set, beatmaps)))
        }
        None => Ok(None),
    }
}

async fn get_beatmaps_for_set(
    pool: &SqlitePool,
    beatmapset_id: i64,
) -> Result<Vec<BeatmapRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, beatmapset_id, online_id, difficulty_name, ruleset FROM beatmap
         WHERE beatmapset_id = ?1 ORDER BY id",
    )
    .bind(beatmapset_id)
    .fetch_all(pool)
    .await
}

/// Retrieves every beatmapset together with its beatmaps.
pub async fn get_all_beatmapsets(
    pool: &SqlitePool,
) -> Result<Vec<(BeatmapsetRow, Vec<BeatmapRow>)>, sqlx::Error> {
    let beatmapsets: Vec<BeatmapsetRow> = sqlx::query_as(
        "SELECT id, online_id, hash, artist, title, author FROM beatmapset
         ORDER BY artist, title, id",
    )
    .fetch_all(pool)
    .await?;

    let mut result = Vec::with_capacity(beatmapsets.len());
    for beatmapset in beatmapsets {
        let beatmaps = get_beatmaps_for_set(pool, beatmapset.id).await?;
        result.push((beatmapset, beatmaps));
    }

    Ok(result)
}

// ============================================================================
// SCORE QUERIES
// ============================================================================

pub async fn insert_score(
    pool: &SqlitePool,
    online_id: Option<i64>,
    hash: &str,
    beatmap_id: i64,
    ruleset: i64,
    username: &str,
    user_online_id: Option<i64>,
    total_score: i64,
    accuracy: f64,
    max_combo: i32,
    statistics: &str,
    imported_at: i64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO score (online_id, hash, beatmap_id, ruleset, username, user_online_id,
         total_score, accuracy, max_combo, statistics, has_replay, imported_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, 0, ?11)",
    )
    .bind(online_id)
    .bind(hash)
    .bind(beatmap_id)
    .bind(ruleset)
    .bind(username)
    .bind(user_online_id)
    .bind(total_score)
    .bind(accuracy)
    .bind(max_combo)
    .bind(statistics)
    .bind(imported_at)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn mark_score_replay(pool: &SqlitePool, id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE score SET has_replay = 1 WHERE id = ?1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Next row id the score table will hand out.
pub async fn next_score_id(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(id) FROM score")
        .fetch_one(pool)
        .await?;
    Ok(max.unwrap_or(0) + 1)
}

pub async fn get_score(pool: &SqlitePool, id: i64) -> Result<Option<ScoreRow>, sqlx::Error> {
    let sql = format!("SELECT {} FROM score WHERE id = ?1", SCORE_COLUMNS);
    sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
}

/// Exact hash lookup. An empty hash never matches.
pub async fn find_score_by_hash(
    pool: &SqlitePool,
    hash: &str,
) -> Result<Option<ScoreRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM score WHERE hash = ?1 AND hash != '' ORDER BY id DESC LIMIT 1",
        SCORE_COLUMNS
    );
    sqlx::query_as(&sql).bind(hash).fetch_optional(pool).await
}

/// Online id lookup. Hashed rows win over hashless ones, then the most
/// recent import wins.
pub async fn find_score_by_online_id(
    pool: &SqlitePool,
    online_id: i64,
) -> Result<Option<ScoreRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM score WHERE online_id = ?1 ORDER BY (hash != '') DESC, id DESC LIMIT 1",
        SCORE_COLUMNS
    );
    sqlx::query_as(&sql)
        .bind(online_id)
        .fetch_optional(pool)
        .await
}

pub async fn get_scores_by_online_id(
    pool: &SqlitePool,
    online_id: i64,
) -> Result<Vec<ScoreRow>, sqlx::Error> {
    let sql = format!(
        "SELECT {} FROM score WHERE online_id = ?1 ORDER BY id",
        SCORE_COLUMNS
    );
    sqlx::query_as(&sql).bind(online_id).fetch_all(pool).await
}

pub async fn count_scores(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM score")
        .fetch_one(pool)
        .await
}
