//! marl-resilience - resilience evaluation of trained multi-agent policies
//!
//! Restores policies from checkpoints, rolls them out with uniform noise
//! injected into observations or actions, and compares the episode rewards
//! against an uninjected baseline or across a sweep of noise magnitudes.

pub mod checkpoint;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod injection;
pub mod pipeline;
pub mod plot;
pub mod policies;
pub mod rollout;
pub mod scenarios;
pub mod stats;

#[cfg(test)]
mod testing;

pub use config::ResilienceConfig;
pub use error::{ConfigError, Error, Result};
pub use evaluation::{BatchEvaluator, PolicyEvaluation, PolicyHandle, SweepGrid, SweepResults};
pub use injection::{InjectMode, InjectionSpec, Injector};
pub use rollout::{run_episode, EpisodeResult, EpisodeRoller};
