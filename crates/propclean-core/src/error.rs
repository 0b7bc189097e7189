//! Error types for the propclean core library
//!
//! The tree operations themselves are total. Errors only arise from the
//! depth-guarded `*_with` variants and from the serde bridges.

use thiserror::Error;

/// Main error type for propclean operations
#[derive(Error, Debug)]
pub enum Error {
    /// Input nests deeper than the configured limit
    #[error("Nesting depth limit of {limit} exceeded at '{}'", display_path(path))]
    DepthLimitExceeded {
        limit: usize,
        /// Dot-joined original keys and sequence indices leading to the node
        path: String,
    },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

impl Error {
    pub(crate) fn depth_exceeded(limit: usize) -> Self {
        Error::DepthLimitExceeded {
            limit,
            path: String::new(),
        }
    }

    /// Prefix the error location with the segment of an enclosing container
    pub(crate) fn within(self, segment: &str) -> Self {
        match self {
            Error::DepthLimitExceeded { limit, path } => Error::DepthLimitExceeded {
                limit,
                path: if path.is_empty() {
                    segment.to_string()
                } else {
                    format!("{segment}.{path}")
                },
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}
