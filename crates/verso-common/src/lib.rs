//! # Verso Common
//!
//! Common error types and logging configuration shared by the Verso crates.
//!
//! ## Features
//!
//! - Unified error type with per-category constructors
//! - Logging configuration and setup
//! - Result extension traits

use thiserror::Error;

pub mod logging;

pub use logging::{init_logging, LogConfig, LogFormat};

/// Unified error type for Verso.
///
/// Each crate keeps its own precise error enum and converts into this one at
/// the workspace boundary.
#[derive(Error, Debug)]
pub enum VersoError {
    /// Malformed input data (SVG path data, scene descriptions).
    #[error("Parse error: {message}")]
    Parse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Numeric domain errors (singular matrices and the like).
    #[error("Geometry error: {message}")]
    Geometry {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Misuse of the renderer protocol while building a scene.
    #[error("Protocol error: {message}")]
    Protocol {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration errors.
    #[error("Config error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (unexpected).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl VersoError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            source: None,
        }
    }

    /// Create a parse error with source.
    pub fn parse_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Parse {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a geometry error.
    pub fn geometry(message: impl Into<String>) -> Self {
        Self::Geometry {
            message: message.into(),
            source: None,
        }
    }

    /// Create a geometry error with source.
    pub fn geometry_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Geometry {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a protocol error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
            source: None,
        }
    }

    /// Create a protocol error with source.
    pub fn protocol_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Protocol {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a config error with source.
    pub fn config_with_source<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get the error category for logging.
    pub fn category(&self) -> &'static str {
        match self {
            VersoError::Parse { .. } => "parse",
            VersoError::Geometry { .. } => "geometry",
            VersoError::Protocol { .. } => "protocol",
            VersoError::Config { .. } => "config",
            VersoError::Io(_) => "io",
            VersoError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for Verso operations.
pub type Result<T> = std::result::Result<T, VersoError>;

/// Extension trait for Result.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, message: impl Into<String>) -> Result<T>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| VersoError::Internal(format!("{}: {}", message.into(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_categories() {
        assert_eq!(VersoError::parse("test").category(), "parse");
        assert_eq!(VersoError::geometry("test").category(), "geometry");
        assert_eq!(VersoError::protocol("test").category(), "protocol");
        assert_eq!(VersoError::config("test").category(), "config");
        assert_eq!(VersoError::Internal("test".into()).category(), "internal");
    }

    #[test]
    fn test_error_source() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let err = VersoError::config_with_source("settings", io);
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Config error: settings");
    }

    #[test]
    fn test_result_context() {
        let res: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = res.context("loading font").unwrap_err();
        assert!(matches!(err, VersoError::Internal(ref m) if m == "loading font: gone"));
    }
}
