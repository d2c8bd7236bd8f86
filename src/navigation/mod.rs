pub mod confirm;
pub mod context;
pub mod router;
pub mod scheduler;
pub mod stack;
pub mod view;

pub use confirm::{ArrivalConfirmer, FrameDriver};
pub use context::NavigationContext;
pub use router::{PresentMode, PresentationRequest, PresentationRouter, RouterEnv};
pub use scheduler::{FrameEnv, FrameScheduler, NavigationStep};
pub use stack::{ExitOutcome, ViewStack};
pub use view::{SongSelectState, View, ViewInstance, ViewKind, ViewToken};

#[cfg(test)]
pub(crate) mod tests_support {
    use crate::models::ruleset::Ruleset;
    use crate::models::score::{ScoreRecord, UserRef};
    use crate::models::stats::HitStats;

    pub fn score(id: i64, hash: &str) -> ScoreRecord {
        ScoreRecord {
            id,
            online_id: None,
            hash: hash.to_string(),
            beatmap_id: 1,
            ruleset: Ruleset::Osu,
            user: UserRef::guest(),
            total_score: 0,
            accuracy: 0.0,
            max_combo: 0,
            statistics: HitStats::new(),
            has_replay: false,
            imported_at: 0,
        }
    }
}
