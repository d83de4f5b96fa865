//! A restored policy bundled with the environment it was trained on.

use std::path::Path;

use tracing::info;

use crate::checkpoint::{
    BuildEnvironment, Checkpoint, CheckpointError, ModelName, RestorePolicy, TrainerConfig,
};
use crate::rollout::{Environment, Policy};

/// A policy, its stepping environment and its trainer configuration.
///
/// Handles are exclusively owned by the evaluator for the duration of a
/// batch.
#[derive(Debug)]
pub struct PolicyHandle<P, E> {
    policy: P,
    env: E,
    config: TrainerConfig,
    name: ModelName,
}

impl<P, E> PolicyHandle<P, E>
where
    P: RestorePolicy,
    E: BuildEnvironment,
{
    /// Loads a checkpoint with the standard evaluation overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        Self::load_with(path, |config| config)
    }

    /// Loads a checkpoint, applying `update` after the evaluation overrides.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the checkpoint; `params.json` is read from its directory
    /// * `update` - Caller adjustments to the trainer configuration
    pub fn load_with(
        path: impl AsRef<Path>,
        update: impl FnOnce(TrainerConfig) -> TrainerConfig,
    ) -> Result<Self, CheckpointError> {
        let checkpoint = Checkpoint::open_for_evaluation(path)?.map_config(update);
        let policy = P::restore(&checkpoint).map_err(|source| CheckpointError::Restore {
            path: checkpoint.path().to_path_buf(),
            source,
        })?;
        let config = checkpoint.into_config();
        let env = E::build(&config.env_config, config.seed).map_err(|source| {
            CheckpointError::Environment {
                scenario: config.env_config.scenario_name.clone(),
                source,
            }
        })?;
        let handle = Self::new(policy, env, config);
        info!(
            model = %handle.name.model_title,
            scenario = %handle.name.env_title,
            agents = handle.env.n_agents(),
            "Loaded model"
        );
        Ok(handle)
    }
}

impl<P: Policy, E: Environment> PolicyHandle<P, E> {
    /// Bundles an already constructed policy and environment.
    pub fn new(policy: P, env: E, config: TrainerConfig) -> Self {
        let name = config.model_name();
        Self {
            policy,
            env,
            config,
            name,
        }
    }

    pub fn name(&self) -> &ModelName {
        &self.name
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    /// Step budget per episode.
    pub fn max_steps(&self) -> u32 {
        self.config.env_config.max_steps
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Splits the handle into its policy and environment for a rollout.
    pub fn parts_mut(&mut self) -> (&mut P, &mut E) {
        (&mut self.policy, &mut self.env)
    }
}
