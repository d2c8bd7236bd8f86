//! Beatmap sets and their difficulties.

use crate::models::ruleset::{Representation, Ruleset};

/// A single difficulty inside a set.
#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapRecord {
    pub id: i64,
    pub set_id: i64,
    pub online_id: Option<i64>,
    pub difficulty_name: String,
    /// Ruleset the difficulty was authored for.
    pub ruleset: Ruleset,
}

impl BeatmapRecord {
    /// How this difficulty can be shown under `target`, if at all.
    pub fn representation_in(&self, target: Ruleset) -> Option<Representation> {
        self.ruleset.representation_in(target)
    }

    /// Whether the song select carousel lists this difficulty.
    pub fn is_visible_in(&self, target: Ruleset, show_converted: bool) -> bool {
        match self.representation_in(target) {
            Some(Representation::Native) => true,
            Some(Representation::Converted) => show_converted,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BeatmapSetRecord {
    pub id: i64,
    pub online_id: Option<i64>,
    pub hash: String,
    pub artist: String,
    pub title: String,
    pub author: String,
    pub beatmaps: Vec<BeatmapRecord>,
}

impl BeatmapSetRecord {
    pub fn beatmap(&self, beatmap_id: i64) -> Option<&BeatmapRecord> {
        self.beatmaps.iter().find(|b| b.id == beatmap_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beatmap(ruleset: Ruleset) -> BeatmapRecord {
        BeatmapRecord {
            id: 1,
            set_id: 1,
            online_id: Some(1024),
            difficulty_name: "Normal".to_string(),
            ruleset,
        }
    }

    #[test]
    fn converted_visibility_follows_option() {
        let map = beatmap(Ruleset::Osu);
        assert!(map.is_visible_in(Ruleset::Osu, false));
        assert!(map.is_visible_in(Ruleset::Catch, true));
        assert!(!map.is_visible_in(Ruleset::Catch, false));
    }

    #[test]
    fn non_osu_maps_only_show_natively() {
        let map = beatmap(Ruleset::Mania);
        assert!(map.is_visible_in(Ruleset::Mania, false));
        assert!(!map.is_visible_in(Ruleset::Osu, true));
    }
}
