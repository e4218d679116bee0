//! Error types for CaseScout.
//!
//! Library crates use [`CaseScoutError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all CaseScout operations.
#[derive(Debug, thiserror::Error)]
pub enum CaseScoutError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error during search, fetch, or model calls.
    #[error("network error: {0}")]
    Network(String),

    /// HTML parsing or content extraction error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Generative-model error (unavailable client, API, or response parsing).
    #[error("model error: {0}")]
    Model(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CaseScoutError>;

impl CaseScoutError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = CaseScoutError::config("missing API key");
        assert_eq!(err.to_string(), "config error: missing API key");

        let err = CaseScoutError::Model("empty candidate list".into());
        assert!(err.to_string().contains("empty candidate list"));
    }
}
