//! Perturbation modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Where a perturbation is applied during a rollout.
///
/// `ObservationNoise` perturbs the observation tuple before the policy sees
/// it; `ActionNoise` perturbs the action tuple after the policy produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InjectMode {
    ActionNoise,
    #[serde(rename = "OBS_NOISE", alias = "OBSERVATION_NOISE")]
    ObservationNoise,
}

impl InjectMode {
    /// Returns true if the mode adds random noise.
    pub fn is_noise(self) -> bool {
        match self {
            InjectMode::ActionNoise | InjectMode::ObservationNoise => true,
        }
    }

    /// Returns true if the mode perturbs observations (before action selection).
    pub fn is_observation_target(self) -> bool {
        matches!(self, InjectMode::ObservationNoise)
    }

    /// Returns true if the mode perturbs actions (after action selection).
    pub fn is_action_target(self) -> bool {
        matches!(self, InjectMode::ActionNoise)
    }

    /// Short label used in titles and file names.
    pub fn label(self) -> &'static str {
        match self {
            InjectMode::ActionNoise => "ACTION_NOISE",
            InjectMode::ObservationNoise => "OBS_NOISE",
        }
    }

    /// Axis label for charts that sweep the noise magnitude.
    pub fn axis_label(self) -> &'static str {
        match self {
            InjectMode::ActionNoise => "Uniform action noise",
            InjectMode::ObservationNoise => "Uniform observation noise",
        }
    }
}

impl fmt::Display for InjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
