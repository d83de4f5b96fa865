//! Batch evaluation of restored policies.
//!
//! A [`BatchEvaluator`] runs the episode roller `n` times per policy, with
//! and without injection, and across a [`SweepGrid`] of noise magnitudes.

pub mod batch;
pub mod error;
pub mod handle;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use batch::{BatchEvaluator, PolicyEvaluation, RolloutBatch};
pub use error::EvaluationError;
pub use handle::PolicyHandle;
pub use sweep::{SweepGrid, SweepResults};
