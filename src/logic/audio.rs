//! Playback control used to quiet the menu track before navigating.
//!
//! Navigation itself never depends on audio. Pausing only keeps the track
//! from ending (and changing the selected beatmap) mid-flow.

use crate::system::bus::{AudioCommand, NavigationBus};
use crossbeam_channel::Sender;

pub trait PlaybackControl {
    fn is_playing(&self) -> bool;
    fn toggle_pause(&mut self);

    /// Pauses if currently playing. Returns whether a pause was issued.
    fn pause_if_playing(&mut self) -> bool {
        if self.is_playing() {
            self.toggle_pause();
            true
        } else {
            false
        }
    }
}

/// Tracks menu music state and forwards commands on the bus.
pub struct MusicController {
    cmd_tx: Sender<AudioCommand>,
    playing: bool,
}

impl MusicController {
    pub fn new(bus: &NavigationBus) -> Self {
        Self {
            cmd_tx: bus.audio_cmd_tx.clone(),
            playing: false,
        }
    }

    pub fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.send(AudioCommand::Play);
        }
    }

    fn send(&self, cmd: AudioCommand) {
        if let Err(e) = self.cmd_tx.send(cmd) {
            log::error!("AUDIO: Failed to send {:?}: {}", e.0, e);
        }
    }
}

impl PlaybackControl for MusicController {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn toggle_pause(&mut self) {
        self.playing = !self.playing;
        let cmd = if self.playing {
            AudioCommand::Play
        } else {
            AudioCommand::Pause
        };
        log::debug!("AUDIO: {:?}", cmd);
        self.send(cmd);
    }
}
