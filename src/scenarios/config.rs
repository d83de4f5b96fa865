//! Parameters of the navigation scenario.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::types::AgentKind;
use crate::rollout::CollaboratorError;

/// Maximum speed of each kind unless [`ScenarioConfig::speeds`] overrides it.
pub const DEFAULT_SPEEDS: [(AgentKind, f64); 3] = [
    (AgentKind::Fast, 1.0),
    (AgentKind::Standard, 0.6),
    (AgentKind::Heavy, 0.3),
];

/// Navigation scenario parameters.
///
/// Read from `env_config.scenario_config` of a trainer configuration; every
/// field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    // --- Arena ---
    pub world_width: f64,
    pub world_height: f64,
    /// Duration of one step.
    pub delta_t: f64,

    // --- Agents ---
    /// Kind of each agent, in slot order.
    pub agents: Vec<AgentKind>,
    /// Maximum speed per kind, overriding [`DEFAULT_SPEEDS`].
    pub speeds: HashMap<AgentKind, f64>,
    /// Distance at which an agent counts as arrived.
    pub goal_radius: f64,

    // --- Reward ---
    /// Weight of the per-step reduction of distance to goal.
    pub progress_coef: f64,
    /// One-off reward when an agent arrives.
    pub arrival_bonus: f64,
    /// Subtracted every step until all agents have arrived.
    pub time_penalty: f64,
}

impl ScenarioConfig {
    /// Observation length per agent: position (2), goal offset (2), kind (3).
    pub const OBSERVATION_DIM: usize = 7;

    /// Action length per agent: planar velocity.
    pub const ACTION_DIM: usize = 2;

    pub fn speed_for(&self, kind: AgentKind) -> f64 {
        match self.speeds.get(&kind) {
            Some(speed) => *speed,
            None => DEFAULT_SPEEDS
                .iter()
                .find(|(k, _)| *k == kind)
                .map_or(0.0, |(_, speed)| *speed),
        }
    }

    /// Per-agent control bounds in slot order.
    pub fn control_bounds(&self) -> Vec<f64> {
        self.agents.iter().map(|k| self.speed_for(*k)).collect()
    }

    /// Parses and validates the scenario section of a trainer configuration.
    /// `null` yields the defaults.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CollaboratorError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let config = Self::deserialize(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the arena is non-empty and every speed is usable.
    pub fn validate(&self) -> Result<(), CollaboratorError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("delta_t", self.delta_t),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("{name} must be positive, got {value}").into());
            }
        }
        if !(self.goal_radius.is_finite() && self.goal_radius >= 0.0) {
            let radius = self.goal_radius;
            return Err(format!("goal_radius must be non-negative, got {radius}").into());
        }
        for (kind, speed) in &self.speeds {
            if !(speed.is_finite() && *speed >= 0.0) {
                return Err(format!("speed of {kind:?} must be non-negative, got {speed}").into());
            }
        }
        Ok(())
    }
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            world_width: 10.0,
            world_height: 10.0,
            delta_t: 1.0,
            agents: vec![AgentKind::Fast, AgentKind::Heavy],
            speeds: HashMap::new(),
            goal_radius: 0.5,
            progress_coef: 1.0,
            arrival_bonus: 5.0,
            time_penalty: 0.01,
        }
    }
}
