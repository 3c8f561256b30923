//! Gateway error types.

/// Errors from running an external process.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The process exited with a non-zero status.
    #[error("{program} {command} failed: {message}")]
    CommandFailed {
        /// Program name (`gh` or `git`).
        program: String,
        /// The subcommand that failed.
        command: String,
        /// Error message from stderr.
        message: String,
        /// Process exit code, if available.
        exit_code: Option<i32>,
    },

    /// Binary not found.
    #[error("{0} executable not found in PATH")]
    NotFound(String),

    /// The process could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}
