//! Domain error types
//!
//! This module defines the error hierarchy for PHI Guard. Engine-level failures
//! are expressed as [`ScrubError`]; everything the application surfaces (config,
//! I/O, serialization) is wrapped in [`PhiGuardError`].
//!
//! Error messages never carry scrubbed input. Pattern text and pattern names may
//! appear because they are operator-supplied configuration, not user data.

use thiserror::Error;

/// Main PHI Guard error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum PhiGuardError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Scrubbing engine errors
    #[error("Scrub error: {0}")]
    Scrub(#[from] ScrubError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Scrubbing engine errors
///
/// Every failure is local to the single call that produced it. None of the
/// variants carries any part of the value being scrubbed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrubError {
    /// Matcher failed to compile or is structurally unsafe
    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    /// Pattern name already registered and replace was not requested
    #[error("Pattern name already registered: {0}")]
    DuplicateName(String),

    /// Enable/disable requested for a name the registry does not know
    #[error("Unknown pattern: {0}")]
    UnknownPattern(String),

    /// Structured input nests deeper than the configured bound
    #[error("Structure nesting exceeds maximum depth of {limit}")]
    DepthExceeded { limit: usize },

    /// Unexpected internal fault
    #[error("Scrub failure: {0}")]
    ScrubFailure(String),
}

impl ScrubError {
    /// Shorthand for an [`ScrubError::InvalidPattern`]
    pub fn invalid_pattern(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Stable, content-free identifier of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidPattern { .. } => "InvalidPattern",
            Self::DuplicateName(_) => "DuplicateName",
            Self::UnknownPattern(_) => "UnknownPattern",
            Self::DepthExceeded { .. } => "DepthExceeded",
            Self::ScrubFailure(_) => "ScrubFailure",
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for PhiGuardError {
    fn from(err: std::io::Error) -> Self {
        PhiGuardError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for PhiGuardError {
    fn from(err: serde_json::Error) -> Self {
        PhiGuardError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for PhiGuardError {
    fn from(err: toml::de::Error) -> Self {
        PhiGuardError::Configuration(format!("TOML parse error: {err}"))
    }
}
