//! Error types for CatalogBridge.
//!
//! Library crates use [`BridgeError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Read and parse failures display as `"{Kind}: {detail}"` because that text
//! ends up verbatim in the general-error messages processors emit.

use std::path::PathBuf;

/// Top-level error type for all CatalogBridge operations.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Configuration loading or validation error.
    #[error("ConfigError: {message}")]
    Config { message: String },

    /// Filesystem I/O error.
    #[error("IoError at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error (bad URL, unsupported scheme, oversized body).
    #[error("ValidationError: {message}")]
    Validation { message: String },

    /// The requested resource does not exist.
    #[error("NotFoundError: {0}")]
    NotFound(String),

    /// The source refused access (HTTP 401/403, filesystem permissions).
    #[error("PermissionDenied: {0}")]
    PermissionDenied(String),

    /// The remote end could not be reached.
    #[error("ConnectionRefused: {0}")]
    ConnectionRefused(String),

    /// Any other transport-level failure.
    #[error("NetworkError: {0}")]
    Network(String),

    /// Malformed content surfaced while parsing.
    #[error("ParseError: {message}")]
    Parse { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
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

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
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

    /// Whether this error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = BridgeError::ConnectionRefused("port closed".into());
        assert_eq!(err.to_string(), "ConnectionRefused: port closed");

        let err = BridgeError::config("missing [reader] section");
        assert_eq!(err.to_string(), "ConfigError: missing [reader] section");

        let err = BridgeError::parse("expected value at line 1 column 1");
        assert!(err.to_string().starts_with("ParseError: "));
    }

    #[test]
    fn not_found_detection() {
        assert!(BridgeError::NotFound("gone".into()).is_not_found());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(BridgeError::io("/tmp/nope", io).is_not_found());

        assert!(!BridgeError::Network("HTTP 500".into()).is_not_found());
    }
}
