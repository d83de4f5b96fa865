//! Reward aggregation.
//!
//! Quartiles with Tukey whiskers for distribution plots, mean/median
//! retention under injection, and per-magnitude curves for sweeps.

pub mod kde;
pub mod retention;
pub mod summary;
pub mod sweep;

pub use kde::Density;
pub use retention::PerformanceRetention;
pub use summary::{adjacent_values, percentile, RewardSummary};
pub use sweep::{RewardTransform, SweepStatistics};
