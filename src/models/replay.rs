//! Serializable replay payloads attached to stored scores.
//!
//! All timestamps are in **microseconds (i64)**.

use serde::{Deserialize, Serialize};

/// Current replay format version for compatibility.
pub const REPLAY_FORMAT_VERSION: u8 = 4;

/// A single user input (press or release).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayInput {
    /// Absolute time in microseconds since map start.
    pub time_us: i64,
    /// Packed data: (column << 1) | is_press
    pub payload: u8,
}

impl ReplayInput {
    /// Unpack column and is_press from payload.
    #[inline]
    pub fn unpack(&self) -> (usize, bool) {
        let is_press = (self.payload & 1) != 0;
        let column = (self.payload >> 1) as usize;
        (column, is_press)
    }
}

/// Raw inputs recorded during a play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayData {
    /// Format version for future compatibility.
    pub version: u8,
    /// All user inputs in chronological order.
    pub inputs: Vec<ReplayInput>,
    /// Playback rate used during the play.
    pub rate: f64,
}

impl ReplayData {
    pub fn new(rate: f64) -> Self {
        Self {
            version: REPLAY_FORMAT_VERSION,
            inputs: Vec::new(),
            rate,
        }
    }

    /// Replay with no inputs, used when a score has no stored payload.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Adds an input (press or release).
    pub fn add_input(&mut self, time_us: i64, column: usize, is_press: bool) {
        let payload = ((column as u8) << 1) | (is_press as u8);
        self.inputs.push(ReplayInput { time_us, payload });
    }

    #[inline]
    pub fn add_press(&mut self, time_us: i64, column: usize) {
        self.add_input(time_us, column, true);
    }

    #[inline]
    pub fn add_release(&mut self, time_us: i64, column: usize) {
        self.add_input(time_us, column, false);
    }

    /// Time of the last recorded input.
    pub fn duration_us(&self) -> i64 {
        self.inputs.last().map(|i| i.time_us).unwrap_or(0)
    }
}

impl Default for ReplayData {
    fn default() -> Self {
        Self::new(1.0)
    }
}
