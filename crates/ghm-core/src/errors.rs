//! Core error types for the ghm CLI.

/// Errors from reading or writing a persisted state document.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StateError {
    /// Failed to read a state file.
    #[error("failed to read {path}: {source}")]
    ReadFile {
        /// Path of the state file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a state file.
    #[error("failed to write {path}: {source}")]
    WriteFile {
        /// Path of the state file.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// State file content is not a flat JSON object of strings.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// Path of the state file.
        path: String,
        /// Parser message.
        message: String,
    },

    /// Failed to serialize a document.
    #[error("failed to serialize {path}: {message}")]
    Serialize {
        /// Path of the state file.
        path: String,
        /// Serializer message.
        message: String,
    },
}

impl StateError {
    /// Whether the error came from unreadable document content rather than I/O.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_display_parse_error() {
        let err = StateError::Parse {
            path: "secrets.json".to_string(),
            message: "expected value at line 1 column 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "failed to parse secrets.json: expected value at line 1 column 1",
        );
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_should_display_read_file_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "permission denied");
        let err = StateError::ReadFile {
            path: "/state/cconfig.json".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/state/cconfig.json"));
        assert!(msg.contains("permission denied"));
        assert!(!err.is_corrupt());
    }

    #[test]
    fn test_should_display_write_file_error() {
        let io_err = std::io::Error::other("no space left on device");
        let err = StateError::WriteFile {
            path: "secrets.json".to_string(),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.starts_with("failed to write secrets.json"));
        assert!(msg.contains("no space left"));
    }

    #[test]
    fn test_should_expose_io_source() {
        use std::error::Error as _;

        let err = StateError::WriteFile {
            path: "secrets.json".to_string(),
            source: std::io::Error::other("disk full"),
        };
        assert!(err.source().is_some());
    }
}
