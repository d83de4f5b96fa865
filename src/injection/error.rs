use thiserror::Error;

/// Errors raised while building or applying an injector.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InjectionError {
    #[error("Cannot inject {targets} agents into a tuple of {slots} agents")]
    InvalidTargetSet { targets: usize, slots: usize },

    #[error("Target agent index {index} is out of range for {slots} agents")]
    TargetOutOfRange { index: usize, slots: usize },

    #[error("Noise magnitude must be finite and non-negative, got {0}")]
    InvalidMagnitude(f64),

    #[error("No control bound supplied for targeted agent {0}")]
    MissingControlBound(usize),

    #[error("Control bound for agent {agent} must be finite and non-negative, got {bound}")]
    InvalidControlBound { agent: usize, bound: f64 },
}
