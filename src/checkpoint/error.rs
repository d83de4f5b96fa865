use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::rollout::CollaboratorError;

/// Errors raised while loading a checkpoint and its collaborators.
#[derive(Debug, Error)]
pub enum CheckpointError {
    #[error("Checkpoint path {0} has no parent directory")]
    NoParentDirectory(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to restore policy from {path}: {source}")]
    Restore {
        path: PathBuf,
        #[source]
        source: CollaboratorError,
    },

    #[error("Failed to build environment for scenario {scenario}: {source}")]
    Environment {
        scenario: String,
        #[source]
        source: CollaboratorError,
    },
}
