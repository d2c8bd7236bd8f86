//! Score presentation routing and arrival confirmation.
//!
//! A caller hands [`Game`] a possibly-partial score descriptor. The score is
//! resolved against storage, the context is adjusted so the score can be
//! shown, navigation is queued, and an [`ArrivalConfirmer`] ticks frames
//! until a fresh instance of the destination view is current.

pub mod database;
pub mod error;
pub mod game;
pub mod identity;
pub mod logic;
pub mod models;
pub mod navigation;
pub mod system;

pub use error::{ConfigError, PresentError};
pub use game::{Game, PresentationFlow};
pub use navigation::{ArrivalConfirmer, FrameDriver, PresentMode, PresentationRequest};
