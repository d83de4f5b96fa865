//! Comparison figures.
//!
//! Rendering needs the `plot` feature; plotting modes and the results
//! directory layout are always available.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::injection::InjectMode;

mod error;
#[cfg(feature = "plot")]
mod resilience;
#[cfg(feature = "plot")]
mod sweep;

pub use error::PlotError;
#[cfg(feature = "plot")]
pub use resilience::{draw_resilience, ResilienceFigure};
#[cfg(feature = "plot")]
pub use sweep::draw_sweep;

/// Directory under a scenario's results holding resilience figures.
pub const RESILIENCE_DIR: &str = "resilience evaluation";

/// Colour-blind friendly series colours, as RGB.
pub const CB_COLOR_CYCLE: [(u8, u8, u8); 9] = [
    (0x37, 0x7e, 0xb8),
    (0xff, 0x7f, 0x00),
    (0x4d, 0xaf, 0x4a),
    (0xf7, 0x81, 0xbf),
    (0xa6, 0x56, 0x28),
    (0x98, 0x4e, 0xa3),
    (0x99, 0x99, 0x99),
    (0xe4, 0x1a, 0x1c),
    (0xde, 0xde, 0x00),
];

/// How a resilience evaluation is drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlottingMode {
    /// Reward distributions with median, quartiles and whiskers.
    #[default]
    Violin,
    /// Injected mean and median as a percentage of the baseline.
    PerformanceMaintained,
}

impl PlottingMode {
    pub fn label(self) -> &'static str {
        match self {
            PlottingMode::Violin => "VIOLIN",
            PlottingMode::PerformanceMaintained => "PERFORMANCE_MAINTAINED",
        }
    }

    /// Whether this mode needs uninjected baseline rewards.
    pub fn needs_baseline(self) -> bool {
        matches!(self, PlottingMode::PerformanceMaintained)
    }
}

impl fmt::Display for PlottingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `<result_dir>/<figure title>/resilience evaluation`.
pub fn resilience_dir(result_dir: &Path, figure_title: &str) -> PathBuf {
    result_dir.join(figure_title).join(RESILIENCE_DIR)
}

/// Output file of a resilience figure.
pub fn resilience_path(
    result_dir: &Path,
    figure_title: &str,
    inject_stem: &str,
    mode: PlottingMode,
) -> PathBuf {
    resilience_dir(result_dir, figure_title)
        .join(format!("eval_resilience_{inject_stem}_{mode}.svg"))
}

/// Output file of a noise sweep figure.
pub fn sweep_path(
    result_dir: &Path,
    figure_title: &str,
    mode: InjectMode,
    targets: &BTreeSet<usize>,
) -> PathBuf {
    let agents = targets
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join("_");
    resilience_dir(result_dir, figure_title)
        .join(format!("noise_sweep_agents_{agents}_{mode}.svg"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_labels() {
        assert_eq!(PlottingMode::Violin.to_string(), "VIOLIN");
        assert_eq!(
            serde_json::to_string(&PlottingMode::PerformanceMaintained).unwrap(),
            "\"PERFORMANCE_MAINTAINED\""
        );
        assert!(PlottingMode::PerformanceMaintained.needs_baseline());
        assert!(!PlottingMode::Violin.needs_baseline());
    }

    #[test]
    fn resilience_layout() {
        let path = resilience_path(
            Path::new("results"),
            "Navigation",
            "agents_x",
            PlottingMode::Violin,
        );
        assert_eq!(
            path,
            Path::new("results/Navigation/resilience evaluation")
                .join("eval_resilience_agents_x_VIOLIN.svg")
        );
    }

    #[test]
    fn sweep_layout() {
        let path = sweep_path(
            Path::new("out"),
            "Navigation",
            InjectMode::ObservationNoise,
            &BTreeSet::from([0, 2]),
        );
        assert_eq!(
            path.file_name().unwrap(),
            "noise_sweep_agents_0_2_OBS_NOISE.svg"
        );
    }
}
