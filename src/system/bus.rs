//! Shared channel infrastructure for navigation observers.
//!
//! The `NavigationBus` carries every stack mutation and context change so
//! that logging, tests and frontends can observe navigation without holding
//! a reference to the coordinator.

use crate::models::ruleset::Ruleset;
use crate::navigation::view::{ViewKind, ViewToken};
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Navigation-level events.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationEvent {
    /// A view instance became current.
    Pushed { kind: ViewKind, token: ViewToken },
    /// A view instance was removed.
    Exited { kind: ViewKind, token: ViewToken },
    /// Exit requested on the root view and ignored.
    RootExitIgnored,
    /// The active ruleset changed.
    RulesetChanged { from: Ruleset, to: Ruleset },
    /// Converted beatmaps were made visible to present a score.
    ConvertedBeatmapsEnabled,
    /// The song select filter was cleared.
    FilterCleared { query: String },
    /// A song select carousel finished populating.
    ItemsPresented { token: ViewToken, count: usize },
}

/// Commands sent to the playback backend.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioCommand {
    Play,
    Pause,
}

/// Aggregates the observer channels.
#[derive(Clone)]
pub struct NavigationBus {
    pub nav_tx: Sender<NavigationEvent>,
    pub nav_rx: Receiver<NavigationEvent>,

    pub audio_cmd_tx: Sender<AudioCommand>,
    pub audio_cmd_rx: Receiver<AudioCommand>,
}

impl NavigationBus {
    pub fn new() -> Self {
        let (nav_tx, nav_rx) = unbounded();
        let (audio_cmd_tx, audio_cmd_rx) = unbounded();

        Self {
            nav_tx,
            nav_rx,
            audio_cmd_tx,
            audio_cmd_rx,
        }
    }

    pub fn publish(&self, event: NavigationEvent) {
        if let Err(e) = self.nav_tx.send(event) {
            log::error!("BUS: Failed to publish navigation event: {}", e);
        }
    }

    /// Takes every navigation event published so far.
    pub fn drain(&self) -> Vec<NavigationEvent> {
        self.nav_rx.try_iter().collect()
    }

    pub fn drain_audio(&self) -> Vec<AudioCommand> {
        self.audio_cmd_rx.try_iter().collect()
    }
}

impl Default for NavigationBus {
    fn default() -> Self {
        Self::new()
    }
}
