pub mod connection;
pub mod import;
pub mod models;
pub mod query;
pub mod replay_storage;

pub use connection::Database;
pub use import::{BeatmapImport, BeatmapSetImport, ScoreImport};
pub use replay_storage::ReplayStore;
