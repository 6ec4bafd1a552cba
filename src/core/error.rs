use thiserror::Error;

/// Validation failures surfaced synchronously to the caller.
///
/// A botch is NOT an error. It is a first-class outcome that flags
/// catastrophic in-fiction failure; interpreting it is the caller's job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("dice pool cannot be negative, got {0}")]
    InvalidPool(i32),

    #[error("difficulty must be within [2, 10], got {0}")]
    InvalidDifficulty(i32),

    #[error("success threshold cannot be negative, got {0}")]
    InvalidThreshold(i32),

    #[error("extended action misconfigured: {0}")]
    MisconfiguredExtended(String),

    #[error("combat round step out of order: expected {expected}, got {actual}")]
    IllegalStateTransition { expected: String, actual: String },
}

pub type Result<T> = std::result::Result<T, EngineError>;
