pub mod beatmap;
pub mod replay;
pub mod ruleset;
pub mod score;
pub mod search;
pub mod settings;
pub mod stats;

pub use beatmap::{BeatmapRecord, BeatmapSetRecord};
pub use replay::ReplayData;
pub use ruleset::{Representation, Ruleset};
pub use score::{ScoreLookup, ScoreRecord, UserRef};
pub use search::SearchFilter;
pub use settings::Settings;
pub use stats::HitStats;
