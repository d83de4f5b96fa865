use thiserror::Error;

use crate::injection::InjectionError;
use crate::rollout::RolloutError;

/// Errors raised by batch evaluations and noise sweeps.
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("At least one episode per run is required")]
    NoEpisodes,

    #[error("Invalid sweep grid: {0}")]
    InvalidGrid(String),

    #[error(transparent)]
    Injection(#[from] InjectionError),

    #[error(transparent)]
    Rollout(#[from] RolloutError),
}
