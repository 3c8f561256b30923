//! Command utility types shared by command implementations and the binary.
//!
//! The marker errors below are returned through `anyhow` and mapped to exit
//! codes by the `ghm` binary.

/// Error indicating user cancelled an operation.
#[derive(Debug, thiserror::Error)]
#[error("user cancelled")]
pub struct CancelError;

/// Error indicating a missing or invalid flag value.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FlagError(pub String);

/// Auth error - triggers exit 4.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AuthError(pub String);

/// Reject a blank flag value with a [`FlagError`] naming the flag.
pub fn require_non_empty(flag: &str, value: &str) -> Result<(), FlagError> {
    if value.trim().is_empty() {
        return Err(FlagError(format!("{flag} cannot be empty")));
    }
    Ok(())
}
