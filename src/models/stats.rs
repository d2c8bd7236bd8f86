//! Hit statistics stored alongside a score.

use serde::{Deserialize, Serialize};

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HitStats {
    pub marv: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
    pub ghost_tap: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total judged notes (ghost taps excluded).
    pub fn judged(&self) -> u32 {
        self.marv + self.perfect + self.great + self.good + self.bad + self.miss
    }

    /// Calculates accuracy percentage (0-100).
    ///
    /// Uses a weighted formula:
    /// - Marv/Perfect: 100% weight (6 points)
    /// - Great: 66.7% weight (4 points)
    /// - Good: 33.3% weight (2 points)
    /// - Bad: 16.7% weight (1 point)
    /// - Miss: 0% weight (0 points)
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.judged() as f64;

        if total == 0.0 {
            return 0.0;
        }

        let score = (self.marv + self.perfect) as f64 * 6.0
            + self.great as f64 * 4.0
            + self.good as f64 * 2.0
            + self.bad as f64;

        (score / (total * 6.0)) * 100.0
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
