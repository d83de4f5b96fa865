//! Checkpoint discovery and collaborator restoration.
//!
//! A checkpoint is a path to the serialized weights. The trainer
//! configuration lives in `params.json` in the same directory:
//!
//! ```text
//! run/
//! ├── params.json
//! └── checkpoint-93
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use super::config::{EnvConfig, TrainerConfig};
use super::error::CheckpointError;
use crate::rollout::{CollaboratorError, Environment, Policy};

/// File name of the trainer configuration next to a checkpoint.
pub const PARAMS_FILE: &str = "params.json";

/// A checkpoint path together with its (possibly overridden) configuration.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
    config: TrainerConfig,
}

impl Checkpoint {
    /// Opens a checkpoint and reads its configuration as stored.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let path = path.as_ref().to_path_buf();
        let params_path = match path.parent() {
            Some(parent) => parent.join(PARAMS_FILE),
            None => return Err(CheckpointError::NoParentDirectory(path)),
        };
        let raw = fs::read_to_string(&params_path).map_err(|source| CheckpointError::Io {
            path: params_path.clone(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| CheckpointError::Parse {
            path: params_path,
            source,
        })?;
        Ok(Self { path, config })
    }

    /// Opens a checkpoint and applies the single-process evaluation overrides
    /// (see [`TrainerConfig::for_evaluation`]).
    pub fn open_for_evaluation(path: impl AsRef<Path>) -> Result<Self, CheckpointError> {
        let mut checkpoint = Self::open(path)?;
        checkpoint.config = checkpoint.config.for_evaluation();
        Ok(checkpoint)
    }

    /// Applies a caller-supplied configuration update.
    pub fn map_config(mut self, update: impl FnOnce(TrainerConfig) -> TrainerConfig) -> Self {
        self.config = update(self.config);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &TrainerConfig {
        &self.config
    }

    pub fn into_config(self) -> TrainerConfig {
        self.config
    }

    /// Reads the raw checkpoint payload.
    pub fn read_weights(&self) -> Result<Vec<u8>, CheckpointError> {
        fs::read(&self.path).map_err(|source| CheckpointError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// A policy that can be restored from a checkpoint.
pub trait RestorePolicy: Policy + Sized {
    fn restore(checkpoint: &Checkpoint) -> Result<Self, CollaboratorError>;
}

/// An environment that can be built from a trainer's environment config.
pub trait BuildEnvironment: Environment + Sized {
    fn build(config: &EnvConfig, seed: u64) -> Result<Self, CollaboratorError>;
}
