//! Goal-seeking heuristic for the navigation scenario.

use crate::checkpoint::{Checkpoint, RestorePolicy};
use crate::rollout::{AgentTuple, CollaboratorError, Policy};
use crate::scenarios::{AgentKind, ScenarioConfig};

/// Heads straight for the goal at the agent's maximum speed, slowing down to
/// land on it.
///
/// Reads the goal offset and the agent kind from the observation layout of
/// [`AgentState::features`](crate::scenarios::AgentState::features):
/// ```text
/// [x, y, goal_dx, goal_dy, one_hot(kind)]
/// ```
///
/// Serves as a strong baseline: under no perturbation it reaches every goal
/// within the shortest number of steps.
pub struct GoalSeekingPolicy {
    config: ScenarioConfig,
}

impl GoalSeekingPolicy {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    fn velocity(&self, obs: &[f64]) -> Result<Vec<f64>, CollaboratorError> {
        if obs.len() < ScenarioConfig::OBSERVATION_DIM {
            return Err(format!(
                "observation has {} features, expected {}",
                obs.len(),
                ScenarioConfig::OBSERVATION_DIM
            )
            .into());
        }
        let dx = obs[2] * self.config.world_width;
        let dy = obs[3] * self.config.world_height;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 1e-12 {
            return Ok(vec![0.0, 0.0]);
        }
        // Noisy observations may blur the one-hot; fall back to the slowest kind.
        let kind = AgentKind::decode(&obs[4..]).unwrap_or(AgentKind::Heavy);
        let speed = self
            .config
            .speed_for(kind)
            .min(dist / self.config.delta_t);
        Ok(vec![dx / dist * speed, dy / dist * speed])
    }
}

impl Policy for GoalSeekingPolicy {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        observations.iter().map(|o| self.velocity(o)).collect()
    }

    fn name(&self) -> &str {
        "goal_seeking"
    }
}

impl RestorePolicy for GoalSeekingPolicy {
    /// Needs no weights; only the scenario section of the configuration.
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError> {
        let scenario = &checkpoint.config().env_config.scenario_config;
        Ok(Self::new(ScenarioConfig::from_value(scenario)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rollout::Environment;
    use crate::scenarios::NavigationEnvironment;

    #[test]
    fn heads_toward_goal_at_kind_speed() {
        let mut policy = GoalSeekingPolicy::new(ScenarioConfig::default());
        // Fast agent, goal 3 units to the right.
        let obs = vec![0.0, 0.0, 0.3, 0.0, 1.0, 0.0, 0.0];
        let actions = policy.compute_actions(&[obs]).unwrap();
        assert!((actions[0][0] - 1.0).abs() < 1e-12);
        assert!(actions[0][1].abs() < 1e-12);
    }

    #[test]
    fn slows_down_near_goal() {
        let mut policy = GoalSeekingPolicy::new(ScenarioConfig::default());
        let obs = vec![0.0, 0.0, 0.0, -0.02, 1.0, 0.0, 0.0];
        let actions = policy.compute_actions(&[obs]).unwrap();
        assert!((actions[0][1] + 0.2).abs() < 1e-12);
    }

    #[test]
    fn short_observation_is_an_error() {
        let mut policy = GoalSeekingPolicy::new(ScenarioConfig::default());
        assert!(policy.compute_actions(&[vec![0.0; 3]]).is_err());
    }

    #[test]
    fn reaches_goals_without_noise() {
        let config = ScenarioConfig::default();
        let mut env = NavigationEnvironment::new(config.clone(), 200, 3);
        let mut policy = GoalSeekingPolicy::new(config);
        let mut obs = env.reset().unwrap();
        loop {
            let actions = policy.compute_actions(&obs).unwrap();
            let transition = env.step(&actions).unwrap();
            obs = transition.observations;
            if transition.done {
                break;
            }
        }
        assert!(env.agents.iter().all(|a| a.arrived));
    }
}
