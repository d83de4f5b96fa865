//! Per-magnitude statistics of a noise sweep.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::evaluation::SweepResults;

/// Affine rescaling `(reward + offset) / scale` applied before plotting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RewardTransform {
    #[serde(default)]
    pub offset: f64,
    #[serde(default = "unit_scale")]
    pub scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl RewardTransform {
    pub fn new(offset: f64, scale: f64) -> Self {
        Self { offset, scale }
    }

    pub fn identity() -> Self {
        Self::new(0.0, 1.0)
    }

    pub fn apply(&self, reward: f64) -> f64 {
        (reward + self.offset) / self.scale
    }
}

impl Default for RewardTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Mean and spread over the episode axis, per policy and magnitude.
#[derive(Debug, Clone)]
pub struct SweepStatistics {
    pub magnitudes: Vec<f64>,
    /// Model titles in the order of the first axis.
    pub models: Vec<String>,
    /// `[policy, magnitude]` mean of the transformed rewards.
    pub mean: Array2<f64>,
    /// `[policy, magnitude]` population standard deviation.
    pub std: Array2<f64>,
    /// `[policy, magnitude]` fraction of episodes that ended early.
    pub early_termination_rate: Array2<f64>,
}

impl SweepStatistics {
    pub fn from_results(results: &SweepResults, transform: RewardTransform) -> Self {
        let (policies, magnitudes, _) = results.rewards.dim();
        let empty = || Array2::from_elem((policies, magnitudes), f64::NAN);
        let rewards = results.rewards.mapv(|r| transform.apply(r));
        let flags = results.ended_early.mapv(|f| if f { 1.0 } else { 0.0 });
        Self {
            magnitudes: results.magnitudes.clone(),
            models: results.models.iter().map(|m| m.model_title.clone()).collect(),
            mean: rewards.mean_axis(Axis(2)).unwrap_or_else(empty),
            std: rewards.std_axis(Axis(2), 0.0),
            early_termination_rate: flags.mean_axis(Axis(2)).unwrap_or_else(empty),
        }
    }

    /// Mean curve of one policy over the magnitudes.
    pub fn mean_curve(&self, policy: usize) -> Vec<f64> {
        self.mean.row(policy).to_vec()
    }

    /// Lower and upper band edges (`mean ∓ std`) of one policy.
    pub fn band(&self, policy: usize) -> (Vec<f64>, Vec<f64>) {
        self.mean
            .row(policy)
            .iter()
            .zip(self.std.row(policy))
            .map(|(m, s)| (m - s, m + s))
            .unzip()
    }
}
