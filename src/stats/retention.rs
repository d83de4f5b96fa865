//! Performance retained under injection.

use tracing::warn;

use super::summary::{mean, percentile, sorted};

/// Injected mean and median as a percentage of the uninjected ones.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceRetention {
    pub mean_pct: f64,
    pub median_pct: f64,
}

impl PerformanceRetention {
    /// Compares rewards before and after injection.
    ///
    /// Returns `None` if either list is empty or the baseline mean or median
    /// is zero.
    pub fn from_rewards(before: &[f64], after: &[f64]) -> Option<Self> {
        if before.is_empty() || after.is_empty() {
            return None;
        }
        let before_mean = mean(before);
        let before_median = percentile(&sorted(before), 0.5);
        if before_mean == 0.0 || before_median == 0.0 {
            warn!(
                mean = before_mean,
                median = before_median,
                "Baseline is zero, retention undefined"
            );
            return None;
        }
        Some(Self {
            mean_pct: mean(after) / before_mean * 100.0,
            median_pct: percentile(&sorted(after), 0.5) / before_median * 100.0,
        })
    }
}
