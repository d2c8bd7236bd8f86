//! Stored scores and the identity policy used to compare them.

use crate::models::ruleset::Ruleset;
use crate::models::stats::HitStats;

/// Player who set a score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub username: String,
    pub online_id: Option<i64>,
}

impl UserRef {
    /// Local player without an online account.
    pub fn guest() -> Self {
        Self {
            username: "Guest".to_string(),
            online_id: None,
        }
    }
}

/// A recorded performance as persisted by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRecord {
    pub id: i64,
    pub online_id: Option<i64>,
    /// Content hash. Empty when the source did not provide one.
    pub hash: String,
    pub beatmap_id: i64,
    pub ruleset: Ruleset,
    pub user: UserRef,
    pub total_score: i64,
    pub accuracy: f64,
    pub max_combo: i32,
    pub statistics: HitStats,
    pub has_replay: bool,
    /// Unix timestamp (ms) recorded at import.
    pub imported_at: i64,
}

impl ScoreRecord {
    /// Online id when it is usable as an identity key.
    pub fn usable_online_id(&self) -> Option<i64> {
        usable_online_id(self.online_id)
    }

    /// Whether two records describe the same logical score.
    ///
    /// Non-empty hashes decide when both are present; otherwise a shared
    /// positive online id does.
    pub fn is_same_score(&self, other: &ScoreRecord) -> bool {
        same_identity(
            &self.hash,
            self.online_id,
            &other.hash,
            other.online_id,
        )
    }

    /// Builds a lookup carrying this record's keys.
    pub fn to_lookup(&self) -> ScoreLookup {
        ScoreLookup {
            hash: self.hash.clone(),
            online_id: self.online_id,
            ruleset: Some(self.ruleset),
        }
    }
}

/// Possibly-partial score descriptor supplied by a caller.
///
/// Typically built from an online leaderboard entry, which rarely has a hash.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreLookup {
    pub hash: String,
    pub online_id: Option<i64>,
    /// Hint only. The stored record's ruleset always wins.
    pub ruleset: Option<Ruleset>,
}

impl ScoreLookup {
    pub fn by_hash(hash: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            ..Self::default()
        }
    }

    pub fn by_online_id(online_id: i64) -> Self {
        Self {
            online_id: Some(online_id),
            ..Self::default()
        }
    }

    pub fn with_ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = Some(ruleset);
        self
    }

    pub fn usable_online_id(&self) -> Option<i64> {
        usable_online_id(self.online_id)
    }

    /// True when neither key can identify a stored score.
    pub fn is_ambiguous(&self) -> bool {
        self.hash.is_empty() && self.usable_online_id().is_none()
    }

    /// Whether `record` is the score this lookup names.
    pub fn matches(&self, record: &ScoreRecord) -> bool {
        same_identity(&self.hash, self.online_id, &record.hash, record.online_id)
    }
}

fn usable_online_id(online_id: Option<i64>) -> Option<i64> {
    online_id.filter(|id| *id > 0)
}

fn same_identity(
    hash_a: &str,
    online_a: Option<i64>,
    hash_b: &str,
    online_b: Option<i64>,
) -> bool {
    if !hash_a.is_empty() && !hash_b.is_empty() {
        return hash_a == hash_b;
    }
    match (usable_online_id(online_a), usable_online_id(online_b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}
