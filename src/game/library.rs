//! In-memory mirror of the stored beatmap sets, used to build carousels
//! inside frame ticks without touching storage.

use crate::database::Database;
use crate::models::beatmap::BeatmapSetRecord;
use crate::models::ruleset::Ruleset;
use crate::models::search::SearchFilter;

#[derive(Debug, Clone, Default)]
pub struct Library {
    sets: Vec<BeatmapSetRecord>,
}

impl Library {
    pub fn new(sets: Vec<BeatmapSetRecord>) -> Self {
        Self { sets }
    }

    pub async fn load(db: &Database) -> Result<Self, sqlx::Error> {
        let sets = db.beatmapsets().await?;
        log::info!("LIBRARY: Loaded {} beatmap sets", sets.len());
        Ok(Self::new(sets))
    }

    /// Beatmap ids listed by a carousel under the given context.
    pub fn visible_beatmaps(
        &self,
        ruleset: Ruleset,
        show_converted: bool,
        filter: &SearchFilter,
    ) -> Vec<i64> {
        self.sets
            .iter()
            .flat_map(|set| set.beatmaps.iter().map(move |beatmap| (set, beatmap)))
            .filter(|(set, beatmap)| {
                beatmap.is_visible_in(ruleset, show_converted) && filter.matches(set, beatmap)
            })
            .map(|(_, beatmap)| beatmap.id)
            .collect()
    }
}
