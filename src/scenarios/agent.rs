//! Agent state and dynamics.

use super::config::ScenarioConfig;
use super::types::{AgentKind, Position};

/// State of a single agent.
///
/// An agent moves with a velocity command bounded by its kind's maximum
/// speed until it reaches its goal, where it stays.
#[derive(Debug, Clone)]
pub struct AgentState {
    pub position: Position,
    pub goal: Position,
    pub kind: AgentKind,
    pub arrived: bool,
}

impl AgentState {
    pub fn new(position: Position, goal: Position, kind: AgentKind) -> Self {
        Self {
            position,
            goal,
            kind,
            arrived: false,
        }
    }

    pub fn distance_to_goal(&self) -> f64 {
        self.position.distance_to(&self.goal)
    }

    /// Applies a velocity command and returns the reduction in distance to
    /// goal.
    ///
    /// Each component is clamped to the kind's maximum speed before moving by
    /// `v × Δt`. Arrived agents ignore commands.
    pub fn step(&mut self, velocity: &[f64], config: &ScenarioConfig) -> f64 {
        if self.arrived {
            return 0.0;
        }
        let bound = config.speed_for(self.kind);
        let component = |i: usize| velocity.get(i).copied().unwrap_or(0.0).max(-bound).min(bound);
        let before = self.distance_to_goal();
        self.position.translate(
            component(0) * config.delta_t,
            component(1) * config.delta_t,
            config.world_width,
            config.world_height,
        );
        let after = self.distance_to_goal();
        if after <= config.goal_radius {
            self.arrived = true;
        }
        before - after
    }

    /// Observation features: `[x, y, goal_dx, goal_dy]` then the kind encoding, with
    /// positions and offsets normalized by the arena size.
    pub fn features(&self, config: &ScenarioConfig) -> Vec<f64> {
        let (x, y) = self
            .position
            .normalized(config.world_width, config.world_height);
        let dx = (self.goal.x - self.position.x) / config.world_width;
        let dy = (self.goal.y - self.position.y) / config.world_height;
        let mut features = vec![x, y, dx, dy];
        self.kind.encode_into(&mut features);
        features
    }
}
