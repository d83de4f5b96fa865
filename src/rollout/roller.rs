//! Single-episode driver.
//!
//! Implements `RESET → (STEP)* → DONE` against an [`Environment`], asking a
//! [`Policy`] or an action callback for actions and optionally perturbing the
//! observation or action tuple through an [`Injector`].

use super::collection::{CollectionConfig, EpisodeResult};
use super::error::RolloutError;
use super::metrics::MetricAccumulator;
use super::traits::{AgentTuple, CollaboratorError, Environment, Policy};
use crate::injection::Injector;

/// Closure form of an action source.
pub type ActionCallback<'a> = dyn FnMut(&[Vec<f64>]) -> Result<AgentTuple, CollaboratorError> + 'a;

enum ActionSource<'a> {
    Policy(&'a mut dyn Policy),
    Callback(&'a mut ActionCallback<'a>),
}

/// Builder for [`EpisodeRoller`].
///
/// Exactly one of [`policy`](Self::policy) or [`callback`](Self::callback)
/// must be set before [`build`](Self::build).
#[derive(Default)]
pub struct EpisodeRollerBuilder<'a> {
    policy: Option<&'a mut dyn Policy>,
    callback: Option<&'a mut ActionCallback<'a>>,
    injector: Option<&'a mut Injector>,
    collection: CollectionConfig,
}

impl<'a> EpisodeRollerBuilder<'a> {
    pub fn policy(mut self, policy: &'a mut dyn Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn callback(mut self, callback: &'a mut ActionCallback<'a>) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Perturbs each step. The injection point follows the injector's mode.
    pub fn injector(mut self, injector: &'a mut Injector) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Like [`injector`](Self::injector), but accepts an optional one.
    pub fn maybe_injector(mut self, injector: Option<&'a mut Injector>) -> Self {
        self.injector = injector;
        self
    }

    pub fn collection(mut self, collection: CollectionConfig) -> Self {
        self.collection = collection;
        self
    }

    /// Validates the action source and returns the roller.
    ///
    /// # Errors
    ///
    /// [`RolloutError::Configuration`] if both or neither of policy and
    /// callback were supplied.
    pub fn build(self) -> Result<EpisodeRoller<'a>, RolloutError> {
        let source = match (self.policy, self.callback) {
            (Some(policy), None) => ActionSource::Policy(policy),
            (None, Some(callback)) => ActionSource::Callback(callback),
            (policy, callback) => {
                let supplied = usize::from(policy.is_some()) + usize::from(callback.is_some());
                return Err(RolloutError::Configuration { supplied });
            }
        };
        Ok(EpisodeRoller {
            source,
            injector: self.injector,
            collection: self.collection,
        })
    }
}

/// Runs episodes to completion with a fixed action source and injector.
///
/// Each call to [`run`](Self::run) is one rollout. Environment and policy
/// errors propagate unchanged; there are no retries.
pub struct EpisodeRoller<'a> {
    source: ActionSource<'a>,
    injector: Option<&'a mut Injector>,
    collection: CollectionConfig,
}

impl<'a> EpisodeRoller<'a> {
    pub fn builder() -> EpisodeRollerBuilder<'a> {
        EpisodeRollerBuilder::default()
    }

    /// Runs one episode until the environment reports `done`.
    ///
    /// When observations or actions are collected, the logged sequence has
    /// exactly one entry per step.
    pub fn run<E: Environment>(
        &mut self,
        env: &mut E,
    ) -> Result<EpisodeResult<E::Frame>, RolloutError> {
        // RESET
        let mut observation = env.reset().map_err(RolloutError::Environment)?;
        let mut steps: u32 = 0;
        let mut total_reward = 0.0;
        let mut terminated;
        let mut metrics = MetricAccumulator::new();
        let mut observations = self.collection.observations.then(Vec::new);
        let mut actions = self.collection.actions.then(Vec::new);
        let mut frames = if self.collection.frames {
            let mut frames = Vec::new();
            if let Some(frame) = env.render().map_err(RolloutError::Environment)? {
                frames.push(frame);
            }
            Some(frames)
        } else {
            None
        };

        // STEP*
        loop {
            steps += 1;

            if let Some(injector) = self.injector.as_deref_mut() {
                if injector.spec().mode().is_observation_target() {
                    observation = injector.inject(&observation)?;
                }
            }
            if let Some(log) = observations.as_mut() {
                log.push(observation.clone());
            }

            let mut action = self.compute_actions(&observation)?;

            if let Some(injector) = self.injector.as_deref_mut() {
                if injector.spec().mode().is_action_target() {
                    action = injector.inject(&action)?;
                }
            }
            if let Some(log) = actions.as_mut() {
                log.push(action.clone());
            }

            let transition = env.step(&action).map_err(RolloutError::Environment)?;
            total_reward += transition.reward;
            for (key, value) in &transition.info.metrics {
                metrics.record(key, *value);
            }
            if let Some(frames) = frames.as_mut() {
                if let Some(frame) = env.render().map_err(RolloutError::Environment)? {
                    frames.push(frame);
                }
            }
            tracing::trace!(
                step = steps,
                reward = transition.reward,
                done = transition.done,
                "environment step"
            );

            observation = transition.observations;
            terminated = transition.done;
            if terminated {
                break;
            }
        }

        // DONE
        Ok(EpisodeResult {
            total_reward,
            steps,
            terminated,
            observations,
            actions,
            frames,
            metrics: metrics.totals(),
        })
    }

    fn compute_actions(&mut self, observation: &[Vec<f64>]) -> Result<AgentTuple, RolloutError> {
        match &mut self.source {
            ActionSource::Policy(policy) => policy
                .compute_actions(observation)
                .map_err(RolloutError::Policy),
            ActionSource::Callback(callback) => {
                (*callback)(observation).map_err(RolloutError::Policy)
            }
        }
    }
}

/// Runs a single episode.
///
/// Convenience over [`EpisodeRoller::builder`] for one-off rollouts: exactly
/// one of `policy` and `callback` must be `Some`.
pub fn run_episode<'a, E: Environment>(
    env: &mut E,
    policy: Option<&'a mut dyn Policy>,
    callback: Option<&'a mut ActionCallback<'a>>,
    injector: Option<&'a mut Injector>,
    collection: CollectionConfig,
) -> Result<EpisodeResult<E::Frame>, RolloutError> {
    let mut builder = EpisodeRoller::builder()
        .maybe_injector(injector)
        .collection(collection);
    if let Some(policy) = policy {
        builder = builder.policy(policy);
    }
    if let Some(callback) = callback {
        builder = builder.callback(callback);
    }
    builder.build()?.run(env)
}
