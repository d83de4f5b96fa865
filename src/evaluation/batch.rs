//! Repeated rollouts per policy, with and without injection.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use super::error::EvaluationError;
use super::handle::PolicyHandle;
use crate::checkpoint::ModelName;
use crate::injection::{InjectionSpec, Injector};
use crate::rollout::{CollectionConfig, EpisodeResult, EpisodeRoller, Environment, Policy};
use crate::stats::PerformanceRetention;

/// Episodes of one (policy, injection) run.
#[derive(Debug, Clone)]
pub struct RolloutBatch<F> {
    /// Episode results in execution order. Frames are moved to
    /// [`best_frames`](Self::best_frames) and never kept here.
    pub episodes: Vec<EpisodeResult<F>>,
    /// Frames of the highest-reward episode, if frames were collected.
    pub best_frames: Option<Vec<F>>,
    /// Index of the highest-reward episode.
    pub best_episode: Option<usize>,
}

impl<F> RolloutBatch<F> {
    /// Total reward of every episode, in execution order.
    pub fn rewards(&self) -> Vec<f64> {
        self.episodes.iter().map(|e| e.total_reward).collect()
    }
}

/// Reward lists of one policy with and without injection.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyEvaluation {
    pub name: ModelName,
    /// Rewards without injection, if a baseline was requested.
    pub baseline: Option<Vec<f64>>,
    /// Rewards under injection, if an injection was given.
    pub injected: Option<Vec<f64>>,
}

impl PolicyEvaluation {
    /// Injected performance relative to the baseline, when both exist.
    pub fn retention(&self) -> Option<PerformanceRetention> {
        match (&self.baseline, &self.injected) {
            (Some(before), Some(after)) => PerformanceRetention::from_rewards(before, after),
            _ => None,
        }
    }
}

/// Runs `n_episodes` sequential episodes per policy and run.
///
/// Owns the single random source of an evaluation. Every run gets an
/// [`Injector`] seeded from it, so a seeded evaluator reproduces its noise
/// exactly.
#[derive(Debug)]
pub struct BatchEvaluator {
    n_episodes: usize,
    collection: CollectionConfig,
    rng: StdRng,
}

impl BatchEvaluator {
    /// Creates a reproducible evaluator.
    ///
    /// # Arguments
    ///
    /// * `n_episodes` - Episodes per (policy, run)
    /// * `seed` - Seed of the noise source
    pub fn new(n_episodes: usize, seed: u64) -> Self {
        Self::from_rng(n_episodes, StdRng::seed_from_u64(seed))
    }

    /// Creates an evaluator seeded from system entropy.
    pub fn from_entropy(n_episodes: usize) -> Self {
        Self::from_rng(n_episodes, StdRng::from_entropy())
    }

    fn from_rng(n_episodes: usize, rng: StdRng) -> Self {
        Self {
            n_episodes,
            collection: CollectionConfig::rewards_only(),
            rng,
        }
    }

    /// Sets what [`rollout_episodes`](Self::rollout_episodes) records.
    pub fn with_collection(mut self, collection: CollectionConfig) -> Self {
        self.collection = collection;
        self
    }

    pub fn n_episodes(&self) -> usize {
        self.n_episodes
    }

    /// Rolls out `n_episodes` episodes of one policy.
    ///
    /// Logs every episode's reward and the max/mean/min over the batch, and
    /// keeps the frames of the best episode when frames are collected.
    pub fn rollout_episodes<P: Policy, E: Environment>(
        &mut self,
        handle: &mut PolicyHandle<P, E>,
        injection: Option<&InjectionSpec>,
    ) -> Result<RolloutBatch<E::Frame>, EvaluationError> {
        self.rollout_with(handle, injection, self.collection)
    }

    pub(super) fn rollout_with<P: Policy, E: Environment>(
        &mut self,
        handle: &mut PolicyHandle<P, E>,
        injection: Option<&InjectionSpec>,
        collection: CollectionConfig,
    ) -> Result<RolloutBatch<E::Frame>, EvaluationError> {
        if self.n_episodes == 0 {
            return Err(EvaluationError::NoEpisodes);
        }
        let mut injector = match injection {
            Some(spec) => {
                let bounds = handle.env().control_bounds();
                Some(Injector::new(spec.clone(), &bounds, self.rng.gen())?)
            }
            None => None,
        };
        let model = handle.name().model_title.clone();
        let (policy, env) = handle.parts_mut();
        let mut roller = EpisodeRoller::builder()
            .policy(policy)
            .maybe_injector(injector.as_mut())
            .collection(collection)
            .build()?;

        let mut batch = RolloutBatch {
            episodes: Vec::with_capacity(self.n_episodes),
            best_frames: None,
            best_episode: None,
        };
        let mut best_reward = f64::NEG_INFINITY;
        for episode in 0..self.n_episodes {
            let mut result = roller.run(env)?;
            let frames = result.frames.take();
            info!(
                model = %model,
                episode,
                reward = result.total_reward,
                steps = result.steps,
                "Episode done"
            );
            if result.total_reward > best_reward {
                best_reward = result.total_reward;
                batch.best_frames = frames;
                batch.best_episode = Some(episode);
            }
            batch.episodes.push(result);
        }

        let rewards = batch.rewards();
        let max = rewards.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = rewards.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = rewards.iter().sum::<f64>() / rewards.len() as f64;
        info!(model = %model, max, mean, min, "Rollout rewards");
        Ok(batch)
    }

    /// Evaluates every policy without and/or with the injection.
    ///
    /// # Arguments
    ///
    /// * `handles` - Policies to evaluate, in output order
    /// * `injection` - Perturbation for the injected run; `None` skips it
    /// * `compute_baseline` - Whether to run the uninjected baseline first
    pub fn evaluate<P: Policy, E: Environment>(
        &mut self,
        handles: &mut [PolicyHandle<P, E>],
        injection: Option<&InjectionSpec>,
        compute_baseline: bool,
    ) -> Result<Vec<PolicyEvaluation>, EvaluationError> {
        if let Some(spec) = injection {
            info!(injection = %spec.title(), "Evaluating resilience");
        }
        let mut evaluations = Vec::with_capacity(handles.len());
        for handle in handles.iter_mut() {
            let baseline = if compute_baseline {
                Some(self.rollout_with(handle, None, CollectionConfig::rewards_only())?.rewards())
            } else {
                None
            };
            let injected = match injection {
                Some(spec) => Some(
                    self.rollout_with(handle, Some(spec), CollectionConfig::rewards_only())?
                        .rewards(),
                ),
                None => None,
            };
            evaluations.push(PolicyEvaluation {
                name: handle.name().clone(),
                baseline,
                injected,
            });
        }
        Ok(evaluations)
    }
}
