//! Checkpoint loading.
//!
//! Reads the trainer configuration stored next to a checkpoint, applies the
//! evaluation overrides and hands the checkpoint to the policy and
//! environment constructors.

mod config;
mod error;
mod loader;

pub use config::{CustomModelConfig, EnvConfig, ModelConfig, ModelName, TrainerConfig};
pub use error::CheckpointError;
pub use loader::{BuildEnvironment, Checkpoint, RestorePolicy, PARAMS_FILE};
