//! Configuration error module.
//!
//! Errors raised while layering, parsing and validating the Hoku
//! configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file is missing.
    #[error("Configuration file not found: {0}")]
    FileNotFound(PathBuf),

    /// The configuration file has an extension no parser is registered for.
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    /// The configuration file could not be parsed or merged.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// The configuration could not be serialized.
    #[error("Failed to serialize configuration: {0}")]
    SerializeError(String),

    /// A section failed validation.
    #[error("Configuration validation error: {0}")]
    ValidationError(String),

    /// A numeric value is outside the range it is allowed to take.
    #[error("Configuration value {key} is out of valid range: {message}")]
    ValueOutOfRange {
        /// Dotted key of the offending value
        key: String,
        /// Description of the valid range
        message: String,
    },
}
