use std::error::Error;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering figures.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Nothing to plot")]
    Empty,

    #[error("Performance retention for {0} needs baseline and injected rewards")]
    MissingRuns(String),

    #[error("Failed to create {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to draw {path}: {source}")]
    Drawing {
        path: PathBuf,
        #[source]
        source: Box<dyn Error + Send + Sync>,
    },
}
