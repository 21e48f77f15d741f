//! Error types for locklint
//!
//! Provides unified error handling across the crate. Lock-discipline
//! violations are not errors; they are collected as reports. Errors are
//! reserved for conditions that abort analysis of a package: I/O
//! failures, unparseable sources, bad configuration.

use thiserror::Error;

/// Main error type for locklint operations
#[derive(Debug, Error)]
pub enum LocklintError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error in {file}: {message}")]
    Parse { file: String, message: String },

    /// Analysis error
    #[error("analysis error: {0}")]
    Analysis(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl LocklintError {
    /// Create a parse error
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        LocklintError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an analysis error
    pub fn analysis(msg: impl Into<String>) -> Self {
        LocklintError::Analysis(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        LocklintError::Config(msg.into())
    }
}

/// Result type alias for locklint operations
pub type Result<T> = std::result::Result<T, LocklintError>;
