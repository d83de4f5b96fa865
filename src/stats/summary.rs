//! Descriptive statistics of a reward list.

/// Percentile of an ascending slice, `p01` in `[0, 1]`.
///
/// Interpolates linearly between the two closest ranks. Returns NaN for an
/// empty slice.
pub fn percentile(sorted: &[f64], p01: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let p = p01.clamp(0.0, 1.0);
    let idx = p * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let w = idx - lo as f64;
    sorted[lo] * (1.0 - w) + sorted[hi] * w
}

/// Tukey whisker ends for an ascending slice with quartiles `q1` and `q3`.
///
/// The lower end is `q1 - 1.5 * IQR` clipped to `[min, q1]`; the upper end is
/// `q3 + 1.5 * IQR` clipped to `[q3, max]`.
pub fn adjacent_values(sorted: &[f64], q1: f64, q3: f64) -> (f64, f64) {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return (f64::NAN, f64::NAN);
    };
    let iqr = q3 - q1;
    let lower = (q1 - 1.5 * iqr).max(min).min(q1);
    let upper = (q3 + 1.5 * iqr).min(max).max(q3);
    (lower, upper)
}

/// Sorts a copy of `values` in ascending order.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Arithmetic mean; NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; NaN when empty.
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Summary of one policy's rewards, as drawn in distribution plots.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardSummary {
    /// Rewards in ascending order.
    pub sorted: Vec<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Lower whisker end.
    pub lower_adjacent: f64,
    /// Upper whisker end.
    pub upper_adjacent: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl RewardSummary {
    /// Summarizes `rewards`. Returns `None` when the list is empty.
    pub fn from_rewards(rewards: &[f64]) -> Option<Self> {
        if rewards.is_empty() {
            return None;
        }
        let sorted = sorted(rewards);
        let q1 = percentile(&sorted, 0.25);
        let median = percentile(&sorted, 0.5);
        let q3 = percentile(&sorted, 0.75);
        let (lower_adjacent, upper_adjacent) = adjacent_values(&sorted, q1, q3);
        Some(Self {
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            q1,
            median,
            q3,
            lower_adjacent,
            upper_adjacent,
            mean: mean(rewards),
            std: std_dev(rewards),
            sorted,
        })
    }
}
