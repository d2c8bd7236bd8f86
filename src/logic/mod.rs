pub mod audio;

pub use audio::{MusicController, PlaybackControl};
