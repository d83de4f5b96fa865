//! What an episode records, and what it returns.

use std::collections::BTreeMap;

use super::metrics::MetricKey;
use super::traits::AgentTuple;

/// Which trajectory data an episode should keep.
///
/// Passed once to the roller instead of threading separate flags through
/// every layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionConfig {
    /// Keep the (possibly perturbed) observation tuple seen at each step.
    pub observations: bool,
    /// Keep the (possibly perturbed) action tuple sent at each step.
    pub actions: bool,
    /// Keep rendered frames (one after reset plus one per step).
    pub frames: bool,
}

impl CollectionConfig {
    /// Records nothing but rewards.
    pub fn rewards_only() -> Self {
        Self::default()
    }

    /// Records observations and actions, no frames.
    pub fn trajectories() -> Self {
        Self {
            observations: true,
            actions: true,
            frames: false,
        }
    }

    /// Records everything.
    pub fn all() -> Self {
        Self {
            observations: true,
            actions: true,
            frames: true,
        }
    }
}

/// Outcome of one rollout.
///
/// Owned by whoever requested the episode and never modified after
/// [`EpisodeRoller::run`](super::EpisodeRoller::run) returns it.
#[derive(Debug, Clone)]
pub struct EpisodeResult<F> {
    /// Sum of per-step rewards.
    pub total_reward: f64,
    /// Number of environment steps taken.
    pub steps: u32,
    /// Whether the environment reported termination.
    pub terminated: bool,
    /// Observation tuple per step, if collected.
    pub observations: Option<Vec<AgentTuple>>,
    /// Action tuple per step, if collected.
    pub actions: Option<Vec<AgentTuple>>,
    /// Rendered frames, if collected.
    pub frames: Option<Vec<F>>,
    /// End-of-episode sums of the environment's info metrics.
    pub metrics: BTreeMap<MetricKey, f64>,
}

impl<F> EpisodeResult<F> {
    /// Returns true if the episode ended before `max_steps` steps.
    pub fn ended_early(&self, max_steps: u32) -> bool {
        self.steps < max_steps
    }
}
