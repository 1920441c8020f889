use thiserror::Error;

/// Failure taxonomy of the dialog engine.
///
/// None of these cross the engine boundary: `EmptyInput` and `Validation`
/// are absorbed by the retry loop and surfaced to the caller as a spoken
/// correction, `RetryLimitExceeded` becomes the operator-transfer
/// directive, and `SessionNotFound` re-enters the consent gate. They exist
/// as a type so the recovery paths stay explicit and loggable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("no input received")]
    EmptyInput,

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("retry limit exceeded")]
    RetryLimitExceeded,

    #[error("no active session for call {0}")]
    SessionNotFound(String),
}
