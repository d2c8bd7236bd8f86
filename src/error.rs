//! Error types surfaced by presentation flows.

use crate::models::ruleset::Ruleset;
use crate::navigation::view::ViewKind;
use std::time::Duration;
use thiserror::Error;

/// Everything that can end a presentation flow.
///
/// None of these are retried internally. Retry policy belongs to the caller.
#[derive(Debug, Error)]
pub enum PresentError {
    /// The lookup carried neither a hash nor a usable online id.
    #[error("score lookup has no usable identity (empty hash and no online id)")]
    AmbiguousIdentity,

    /// No stored score matched the lookup.
    #[error("no stored score matches the lookup")]
    UnknownScore,

    /// The score's beatmap cannot be shown in the score's ruleset.
    #[error("beatmap {beatmap_id} has no representation in ruleset {ruleset}")]
    BeatmapNotPresentable { beatmap_id: i64, ruleset: Ruleset },

    /// The expected view never became current within the budget.
    #[error("timed out after {waited:?} waiting for a new {expected} view")]
    ArrivalTimeout { expected: ViewKind, waited: Duration },

    /// A readiness condition never held within the budget.
    #[error("timed out after {waited:?} waiting for {description}")]
    ConditionTimeout { description: String, waited: Duration },

    /// An operation needed a view of this kind to be current.
    #[error("a {expected} view must be current")]
    NotCurrent { expected: ViewKind },

    /// A navigation step ran against an empty view stack.
    #[error("navigation step applied to an empty view stack")]
    StackUnderflow,

    /// The arrived view displays a different score than requested.
    #[error("arrived view displays a different score than requested")]
    DisplayedScoreMismatch,

    /// The active ruleset does not match the presented score.
    #[error("active ruleset {active} does not match score ruleset {expected}")]
    RulesetMismatch { expected: Ruleset, active: Ruleset },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("replay storage error: {0}")]
    Replay(#[from] std::io::Error),
}

/// Errors raised while reading or writing the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
