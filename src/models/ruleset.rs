//! Game modes and cross-mode beatmap conversion rules.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A game mode. Determines scoring and input rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ruleset {
    #[default]
    Osu,
    Taiko,
    Catch,
    Mania,
}

/// How a beatmap is shown under a given ruleset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    /// The beatmap was authored for this ruleset.
    Native,
    /// The beatmap is converted from its authored ruleset.
    Converted,
}

impl Ruleset {
    pub const ALL: [Ruleset; 4] = [Ruleset::Osu, Ruleset::Taiko, Ruleset::Catch, Ruleset::Mania];

    /// Stable identifier persisted in storage.
    pub fn id(self) -> i64 {
        match self {
            Ruleset::Osu => 0,
            Ruleset::Taiko => 1,
            Ruleset::Catch => 2,
            Ruleset::Mania => 3,
        }
    }

    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Ruleset::Osu),
            1 => Some(Ruleset::Taiko),
            2 => Some(Ruleset::Catch),
            3 => Some(Ruleset::Mania),
            _ => None,
        }
    }

    pub fn short_name(self) -> &'static str {
        match self {
            Ruleset::Osu => "osu",
            Ruleset::Taiko => "taiko",
            Ruleset::Catch => "fruits",
            Ruleset::Mania => "mania",
        }
    }

    /// Returns how a beatmap authored for `self` can be shown under `target`.
    ///
    /// Only osu! beatmaps convert; every other ruleset is native-only.
    pub fn representation_in(self, target: Ruleset) -> Option<Representation> {
        if self == target {
            Some(Representation::Native)
        } else if self == Ruleset::Osu {
            Some(Representation::Converted)
        } else {
            None
        }
    }
}

impl fmt::Display for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
