use std::path::Path;
use thiserror::Error;

/// Result type alias for scanning operations
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while scanning files and talking to the catalog store
#[derive(Error, Debug)]
pub enum ScanError {
    /// File bytes could not be read from disk
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path of the file that could not be read
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Authentication failed - invalid or missing access key
    #[error("authentication failed: invalid access key")]
    Unauthorized,

    /// Catalog store returned an error response
    #[error("store error ({code}): {message}")]
    Store {
        /// Error code from the store (Postgres SQLSTATE or HTTP status)
        code: String,
        /// Error message from the store
        message: String,
    },

    /// Insert hit an existing row for the same unique key
    #[error("unique key violation: {0}")]
    UniqueViolation(String),

    /// Sandbox analysis request failed
    #[error("sandbox analysis failed: {0}")]
    Sandbox(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl ScanError {
    /// Build a [`ScanError::FileRead`] from a path and I/O error
    pub fn file_read(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// Returns true if the error is a duplicate-key conflict from the store
    #[must_use]
    pub const fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation(_))
    }

    /// Returns true if the operation may succeed when retried
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_))
    }

    /// Returns true if the error is due to authentication
    #[must_use]
    pub const fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns the HTTP status code implied by this error, if any
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::UniqueViolation(_) => Some(409),
            _ => None,
        }
    }
}
