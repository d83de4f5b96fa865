//! Noise sweeps over a grid of magnitudes.

use std::collections::BTreeSet;

use ndarray::{Array3, ArrayView2};
use tracing::info;

use super::batch::BatchEvaluator;
use super::error::EvaluationError;
use super::handle::PolicyHandle;
use crate::checkpoint::ModelName;
use crate::injection::{InjectMode, InjectionSpec};
use crate::rollout::{CollectionConfig, Environment, Policy};

/// Ordered noise magnitudes of a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct SweepGrid {
    magnitudes: Vec<f64>,
}

impl SweepGrid {
    pub const DEFAULT_START: f64 = 0.0;
    pub const DEFAULT_END: f64 = 2.0;
    pub const DEFAULT_POINTS: usize = 50;

    /// `points` evenly spaced magnitudes from `start` to `end`, both included.
    ///
    /// A single point yields `[start]`.
    pub fn linspace(start: f64, end: f64, points: usize) -> Result<Self, EvaluationError> {
        if points == 0 {
            return Err(EvaluationError::InvalidGrid("no points".into()));
        }
        Self::from_magnitudes(linspace(start, end, points))
    }

    /// Uses the given magnitudes in order.
    pub fn from_magnitudes(magnitudes: Vec<f64>) -> Result<Self, EvaluationError> {
        if magnitudes.is_empty() {
            return Err(EvaluationError::InvalidGrid("no points".into()));
        }
        if let Some(bad) = magnitudes.iter().find(|m| !m.is_finite() || **m < 0.0) {
            return Err(EvaluationError::InvalidGrid(format!(
                "magnitude {bad} is not a non-negative finite number"
            )));
        }
        Ok(Self { magnitudes })
    }

    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }
}

impl Default for SweepGrid {
    fn default() -> Self {
        Self {
            magnitudes: linspace(Self::DEFAULT_START, Self::DEFAULT_END, Self::DEFAULT_POINTS),
        }
    }
}

fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    if points == 1 {
        return vec![start];
    }
    let step = (end - start) / (points - 1) as f64;
    (0..points)
        .map(|i| {
            if i == points - 1 {
                end
            } else {
                start + i as f64 * step
            }
        })
        .collect()
}

/// Rewards of a sweep, indexed `[policy, magnitude, episode]`.
#[derive(Debug, Clone)]
pub struct SweepResults {
    pub mode: InjectMode,
    pub targets: BTreeSet<usize>,
    pub magnitudes: Vec<f64>,
    /// Policy names in the order of the first axis.
    pub models: Vec<ModelName>,
    pub rewards: Array3<f64>,
    /// Whether the episode ended before the policy's step budget.
    pub ended_early: Array3<bool>,
}

impl SweepResults {
    /// `[magnitude, episode]` rewards of one policy.
    pub fn policy_rewards(&self, policy: usize) -> ArrayView2<'_, f64> {
        self.rewards.index_axis(ndarray::Axis(0), policy)
    }

    pub fn n_episodes(&self) -> usize {
        self.rewards.dim().2
    }
}

impl BatchEvaluator {
    /// Evaluates every policy at every magnitude of `grid`.
    ///
    /// Magnitudes form the outer loop and policies the inner one; each cell
    /// runs [`n_episodes`](Self::n_episodes) injected episodes.
    pub fn sweep<P: Policy, E: Environment>(
        &mut self,
        handles: &mut [PolicyHandle<P, E>],
        grid: &SweepGrid,
        mode: InjectMode,
        targets: &BTreeSet<usize>,
    ) -> Result<SweepResults, EvaluationError> {
        if self.n_episodes() == 0 {
            return Err(EvaluationError::NoEpisodes);
        }
        let shape = (handles.len(), grid.len(), self.n_episodes());
        let mut rewards = Array3::zeros(shape);
        let mut ended_early = Array3::from_elem(shape, false);

        for (m, &magnitude) in grid.magnitudes().iter().enumerate() {
            let spec = InjectionSpec::new(mode, targets.iter().copied(), magnitude)?;
            info!(
                magnitude,
                point = m + 1,
                points = grid.len(),
                mode = %mode,
                "Sweeping"
            );
            for (p, handle) in handles.iter_mut().enumerate() {
                let max_steps = handle.max_steps();
                let batch =
                    self.rollout_with(handle, Some(&spec), CollectionConfig::rewards_only())?;
                for (e, episode) in batch.episodes.iter().enumerate() {
                    rewards[[p, m, e]] = episode.total_reward;
                    ended_early[[p, m, e]] = episode.ended_early(max_steps);
                }
            }
        }

        Ok(SweepResults {
            mode,
            targets: targets.clone(),
            magnitudes: grid.magnitudes().to_vec(),
            models: handles.iter().map(|h| h.name().clone()).collect(),
            rewards,
            ended_early,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_spans_zero_to_two() {
        let grid = SweepGrid::default();
        assert_eq!(grid.len(), 50);
        assert_eq!(grid.magnitudes()[0], 0.0);
        assert_eq!(grid.magnitudes()[49], 2.0);
        assert!((grid.magnitudes()[1] - 2.0 / 49.0).abs() < 1e-12);
    }

    #[test]
    fn linspace_single_point_is_start() {
        let grid = SweepGrid::linspace(0.5, 1.0, 1).unwrap();
        assert_eq!(grid.magnitudes(), &[0.5]);
    }

    #[test]
    fn linspace_is_increasing() {
        let grid = SweepGrid::linspace(0.0, 1.0, 5).unwrap();
        assert_eq!(grid.magnitudes(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            SweepGrid::linspace(0.0, 1.0, 0),
            Err(EvaluationError::InvalidGrid(_))
        ));
    }

    #[test]
    fn negative_magnitude_is_rejected() {
        assert!(SweepGrid::linspace(-1.0, 1.0, 3).is_err());
        assert!(SweepGrid::from_magnitudes(vec![0.1, f64::NAN]).is_err());
    }
}
