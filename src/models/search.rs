use crate::models::beatmap::{BeatmapRecord, BeatmapSetRecord};

/// Free-text filter applied to the song select carousel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchFilter {
    pub query: String,
}

impl SearchFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.query.trim().is_empty()
    }

    /// Every whitespace-separated term must appear in the set metadata or
    /// the difficulty name (case-insensitive).
    pub fn matches(&self, set: &BeatmapSetRecord, beatmap: &BeatmapRecord) -> bool {
        if !self.is_active() {
            return true;
        }

        let haystack = format!(
            "{} {} {} {}",
            set.artist, set.title, set.author, beatmap.difficulty_name
        )
        .to_lowercase();

        self.query
            .split_whitespace()
            .all(|term| haystack.contains(&term.to_lowercase()))
    }
}
