//! Evaluation run configuration.
//!
//! Loaded from a JSON file; every field has a default.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evaluation::{BatchEvaluator, EvaluationError, SweepGrid};
use crate::injection::{InjectMode, InjectionError, InjectionSpec};
use crate::plot::PlottingMode;
use crate::stats::RewardTransform;

/// Which policy type the checkpoints hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// JSON linear weights ([`LinearPolicy`](crate::policies::LinearPolicy)).
    #[default]
    Linear,
    /// Weight-free heuristic ([`GoalSeekingPolicy`](crate::policies::GoalSeekingPolicy)).
    GoalSeeking,
    /// `tch` variable store; needs the `nn` feature.
    Mlp,
    /// Uniform actions within the scenario's control bounds
    /// ([`RandomPolicy`](crate::policies::RandomPolicy)).
    Random,
}

/// Noise magnitudes of a sweep: `points` values from `start` to `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub start: f64,
    pub end: f64,
    pub points: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            start: SweepGrid::DEFAULT_START,
            end: SweepGrid::DEFAULT_END,
            points: SweepGrid::DEFAULT_POINTS,
        }
    }
}

/// Configuration of a resilience evaluation or noise sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    // --- Inputs ---
    /// Checkpoint paths; `params.json` is read from each one's directory.
    pub checkpoints: Vec<PathBuf>,
    pub policy: PolicyKind,
    /// Episodes per model and run.
    pub n_episodes: usize,

    // --- Injection ---
    pub mode: InjectMode,
    /// Indices of the perturbed agents.
    pub targets: BTreeSet<usize>,
    /// Half-width of the uniform noise for single evaluations.
    pub noise_delta: f64,
    /// Whether to also evaluate without injection.
    pub compute_baseline: bool,
    pub sweep: SweepConfig,

    // --- Output ---
    pub plotting_mode: PlottingMode,
    /// Applied to sweep rewards before plotting.
    pub reward_transform: RewardTransform,
    pub result_dir: PathBuf,
    /// Seed of the noise source; drawn from system entropy when absent.
    pub seed: Option<u64>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            checkpoints: Vec::new(),
            policy: PolicyKind::default(),
            n_episodes: 50,
            mode: InjectMode::ObservationNoise,
            targets: BTreeSet::from([0]),
            noise_delta: 0.1,
            compute_baseline: true,
            sweep: SweepConfig::default(),
            plotting_mode: PlottingMode::default(),
            reward_transform: RewardTransform::default(),
            result_dir: PathBuf::from("results"),
            seed: None,
        }
    }
}

impl ResilienceConfig {
    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checkpoints.is_empty() {
            return Err(ConfigError::Invalid("no checkpoints given".into()));
        }
        if self.n_episodes == 0 {
            return Err(ConfigError::Invalid("n_episodes must be positive".into()));
        }
        if self.plotting_mode.needs_baseline() && !self.compute_baseline {
            return Err(ConfigError::Invalid(format!(
                "{} plots need compute_baseline",
                self.plotting_mode
            )));
        }
        if self.reward_transform.scale == 0.0 {
            return Err(ConfigError::Invalid("reward_transform.scale is zero".into()));
        }
        Ok(())
    }

    pub fn injection_spec(&self) -> Result<InjectionSpec, InjectionError> {
        InjectionSpec::new(self.mode, self.targets.iter().copied(), self.noise_delta)
    }

    pub fn sweep_grid(&self) -> Result<SweepGrid, EvaluationError> {
        SweepGrid::linspace(self.sweep.start, self.sweep.end, self.sweep.points)
    }

    /// Evaluator seeded from [`seed`](Self::seed), or from entropy.
    pub fn evaluator(&self) -> BatchEvaluator {
        match self.seed {
            Some(seed) => BatchEvaluator::new(self.n_episodes, seed),
            None => BatchEvaluator::from_entropy(self.n_episodes),
        }
    }
}
