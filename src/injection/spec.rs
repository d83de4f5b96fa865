//! Immutable description of one perturbation run.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::error::InjectionError;
use super::mode::InjectMode;

/// What to perturb, on which agents, and by how much.
///
/// Constructed once per evaluation run and never mutated. The magnitude is
/// validated on construction, so every spec in circulation is non-negative
/// and finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawInjectionSpec", into = "RawInjectionSpec")]
pub struct InjectionSpec {
    mode: InjectMode,
    targets: BTreeSet<usize>,
    magnitude: f64,
}

impl InjectionSpec {
    /// Creates a new injection spec.
    ///
    /// # Arguments
    ///
    /// * `mode` - Observation or action noise
    /// * `targets` - Indices of the agents to perturb
    /// * `magnitude` - Half-width `delta` of the uniform noise `U[-delta, delta]`
    ///
    /// # Errors
    ///
    /// Returns [`InjectionError::InvalidMagnitude`] if `magnitude` is negative,
    /// NaN, or infinite.
    pub fn new(
        mode: InjectMode,
        targets: impl IntoIterator<Item = usize>,
        magnitude: f64,
    ) -> Result<Self, InjectionError> {
        if !magnitude.is_finite() || magnitude < 0.0 {
            return Err(InjectionError::InvalidMagnitude(magnitude));
        }
        Ok(Self {
            mode,
            targets: targets.into_iter().collect(),
            magnitude,
        })
    }

    pub fn mode(&self) -> InjectMode {
        self.mode
    }

    pub fn targets(&self) -> &BTreeSet<usize> {
        &self.targets
    }

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    /// Returns a copy of this spec with a different magnitude.
    ///
    /// Used by noise sweeps, which keep mode and targets fixed.
    pub fn with_magnitude(&self, magnitude: f64) -> Result<Self, InjectionError> {
        Self::new(self.mode, self.targets.iter().copied(), magnitude)
    }

    /// Human-readable description, e.g.
    /// `Agents injected: {0, 1}, Inject mode: OBS_NOISE (±0.1 uniform noise)`.
    ///
    /// Empty when no agent is targeted.
    pub fn title(&self) -> String {
        if self.targets.is_empty() {
            return String::new();
        }
        let mut title = format!(
            "Agents injected: {}, Inject mode: {}",
            self.target_list(),
            self.mode
        );
        if self.mode.is_noise() {
            title.push_str(&format!(" (±{:?} uniform noise)", self.magnitude));
        }
        title
    }

    /// File-name-friendly variant of [`InjectionSpec::title`].
    pub fn file_stem(&self) -> String {
        if self.targets.is_empty() {
            return String::new();
        }
        let mut name = format!(
            "agents_injected_{}_inject_mode_{}",
            self.target_list(),
            self.mode
        );
        if self.mode.is_noise() {
            name.push_str(&format!("_{:?}_delta_noise", self.magnitude));
        }
        name
    }

    fn target_list(&self) -> String {
        let items: Vec<String> = self.targets.iter().map(|t| t.to_string()).collect();
        format!("{{{}}}", items.join(", "))
    }
}

#[derive(Serialize, Deserialize)]
struct RawInjectionSpec {
    mode: InjectMode,
    targets: BTreeSet<usize>,
    magnitude: f64,
}

impl TryFrom<RawInjectionSpec> for InjectionSpec {
    type Error = InjectionError;

    fn try_from(raw: RawInjectionSpec) -> Result<Self, Self::Error> {
        InjectionSpec::new(raw.mode, raw.targets, raw.magnitude)
    }
}

impl From<InjectionSpec> for RawInjectionSpec {
    fn from(spec: InjectionSpec) -> Self {
        Self {
            mode: spec.mode,
            targets: spec.targets,
            magnitude: spec.magnitude,
        }
    }
}
