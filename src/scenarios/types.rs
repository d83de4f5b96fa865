//! Agent kinds and planar positions of the navigation scenario.

use serde::{Deserialize, Serialize};

/// Agent kind. Its maximum speed comes from
/// [`ScenarioConfig::speed_for`](super::ScenarioConfig::speed_for).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    Fast,
    Standard,
    Heavy,
}

impl AgentKind {
    /// Length of the kind encoding in an observation.
    pub const ENCODED_LEN: usize = 3;

    const ENCODING_ORDER: [AgentKind; Self::ENCODED_LEN] =
        [AgentKind::Fast, AgentKind::Standard, AgentKind::Heavy];

    /// Appends the one-hot encoding of this kind.
    pub fn encode_into(self, features: &mut Vec<f64>) {
        features.extend(
            Self::ENCODING_ORDER
                .iter()
                .map(|k| if *k == self { 1.0 } else { 0.0 }),
        );
    }

    /// First kind whose slot in `encoded` is above one half.
    pub fn decode(encoded: &[f64]) -> Option<AgentKind> {
        Self::ENCODING_ORDER
            .into_iter()
            .zip(encoded)
            .find(|(_, v)| **v > 0.5)
            .map(|(kind, _)| kind)
    }
}

/// A point in the arena `[0, W] × [0, H]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Moves by `(dx, dy)` and clamps to the arena.
    pub fn translate(&mut self, dx: f64, dy: f64, width: f64, height: f64) {
        self.x = (self.x + dx).clamp(0.0, width);
        self.y = (self.y + dy).clamp(0.0, height);
    }

    /// Position scaled to `[0, 1] × [0, 1]`.
    pub fn normalized(&self, width: f64, height: f64) -> (f64, f64) {
        (self.x / width, self.y / height)
    }
}
