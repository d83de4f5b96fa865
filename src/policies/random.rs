//! Random policy for sanity checks and as a lower-bound baseline.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::checkpoint::{Checkpoint, RestorePolicy};
use crate::rollout::{AgentTuple, CollaboratorError, Policy};
use crate::scenarios::ScenarioConfig;

/// Uniformly random velocity commands within each agent's control bound.
#[derive(Debug)]
pub struct RandomPolicy {
    bounds: Vec<f64>,
    action_dim: usize,
    rng: StdRng,
}

impl RandomPolicy {
    /// Creates a new random policy.
    ///
    /// # Arguments
    ///
    /// * `bounds` - Control bound of each agent slot
    /// * `action_dim` - Length of each agent's action
    /// * `seed` - Random seed
    pub fn new(bounds: Vec<f64>, action_dim: usize, seed: u64) -> Self {
        Self {
            bounds,
            action_dim,
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Policy for RandomPolicy {
    fn compute_actions(
        &mut self,
        observations: &[Vec<f64>],
    ) -> Result<AgentTuple, CollaboratorError> {
        if observations.len() > self.bounds.len() {
            return Err(format!(
                "random policy has bounds for {} agents, got {}",
                self.bounds.len(),
                observations.len()
            )
            .into());
        }
        Ok(self.bounds[..observations.len()]
            .iter()
            .map(|&bound| {
                let bound = bound.abs();
                (0..self.action_dim)
                    .map(|_| {
                        if bound > 0.0 {
                            self.rng.gen_range(-bound..=bound)
                        } else {
                            0.0
                        }
                    })
                    .collect()
            })
            .collect())
    }

    fn name(&self) -> &str {
        "random"
    }
}

impl RestorePolicy for RandomPolicy {
    /// Needs no weights; bounds come from the scenario and the seed from the
    /// trainer configuration.
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError> {
        let config = checkpoint.config();
        let scenario = ScenarioConfig::from_value(&config.env_config.scenario_config)?;
        Ok(Self::new(
            scenario.control_bounds(),
            ScenarioConfig::ACTION_DIM,
            config.seed,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::checkpoint::PARAMS_FILE;

    #[test]
    fn returns_one_action_per_agent() {
        let mut policy = RandomPolicy::new(vec![1.0, 0.5, 0.2, 0.1], 2, 0);
        let obs = vec![vec![0.0; 7]; 4];
        let actions = policy.compute_actions(&obs).unwrap();
        assert_eq!(actions.len(), 4);
        assert!(actions.iter().all(|a| a.len() == 2));
    }

    #[test]
    fn actions_within_bounds() {
        let mut policy = RandomPolicy::new(vec![1.0, 0.25], 2, 7);
        for _ in 0..100 {
            let actions = policy.compute_actions(&[vec![], vec![]]).unwrap();
            assert!(actions[0].iter().all(|a| a.abs() <= 1.0));
            assert!(actions[1].iter().all(|a| a.abs() <= 0.25));
        }
    }

    #[test]
    fn too_many_agents_is_an_error() {
        let mut policy = RandomPolicy::new(vec![1.0], 2, 7);
        assert!(policy.compute_actions(&[vec![], vec![]]).is_err());
    }

    #[test]
    fn restores_bounds_from_scenario() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(PARAMS_FILE),
            r#"{
                "env": "navigation",
                "seed": 4,
                "env_config": {
                    "scenario_name": "Navigation",
                    "max_steps": 20,
                    "scenario_config": {"agents": ["fast", "heavy", "standard"]}
                }
            }"#,
        )
        .unwrap();
        let checkpoint = Checkpoint::open(dir.path().join("checkpoint-1")).unwrap();
        let mut policy = RandomPolicy::restore(&checkpoint).unwrap();
        let actions = policy.compute_actions(&vec![vec![0.0; 7]; 3]).unwrap();
        assert_eq!(actions.len(), 3);
        assert!(actions.iter().all(|a| a.len() == ScenarioConfig::ACTION_DIM));
        assert!(actions[1].iter().all(|a| a.abs() <= 0.3));
    }
}
