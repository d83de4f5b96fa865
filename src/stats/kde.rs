//! Gaussian kernel density estimate for violin outlines.

use super::summary::{mean, sorted};

/// Number of evaluation points along a violin.
pub const DEFAULT_POINTS: usize = 100;

/// Density of a sample evaluated on an even grid between its extremes.
#[derive(Debug, Clone, PartialEq)]
pub struct Density {
    pub coords: Vec<f64>,
    /// Density at each coordinate, normalized so the peak is 1.
    pub values: Vec<f64>,
}

impl Density {
    /// Estimates the density of `samples` with Scott's-rule bandwidth.
    ///
    /// A sample with no spread yields a single point of height 1. Returns
    /// `None` when `samples` is empty.
    pub fn estimate(samples: &[f64], points: usize) -> Option<Self> {
        let sorted = sorted(samples);
        let (&lo, &hi) = (sorted.first()?, sorted.last()?);
        let n = sorted.len() as f64;
        let m = mean(&sorted);
        let sample_std = if sorted.len() > 1 {
            (sorted.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        let bandwidth = sample_std * n.powf(-0.2);
        if bandwidth.is_nan() || bandwidth <= 0.0 || points < 2 {
            return Some(Self {
                coords: vec![m],
                values: vec![1.0],
            });
        }

        let step = (hi - lo) / (points - 1) as f64;
        let coords: Vec<f64> = (0..points).map(|i| lo + i as f64 * step).collect();
        let mut values: Vec<f64> = coords
            .iter()
            .map(|x| {
                sorted
                    .iter()
                    .map(|s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
                    .sum::<f64>()
            })
            .collect();
        let peak = values.iter().copied().fold(0.0, f64::max);
        if peak > 0.0 {
            values.iter_mut().for_each(|v| *v /= peak);
        }
        Some(Self { coords, values })
    }
}
