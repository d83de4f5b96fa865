use thiserror::Error;

use super::traits::CollaboratorError;
use crate::injection::InjectionError;

/// Errors raised while rolling out an episode.
///
/// Collaborator failures are wrapped once and keep the original error as
/// their source. Nothing is retried.
#[derive(Debug, Error)]
pub enum RolloutError {
    #[error("Exactly one of policy or action callback must be supplied, got {supplied}")]
    Configuration { supplied: usize },

    #[error(transparent)]
    Injection(#[from] InjectionError),

    #[error("Environment failed: {0}")]
    Environment(#[source] CollaboratorError),

    #[error("Policy failed: {0}")]
    Policy(#[source] CollaboratorError),
}
