//! Error module for Hoku.
//!
//! This module provides the application-level error type. Library code in
//! `data_structures` reports its own errors, which are wrapped here together
//! with configuration and I/O failures from the command-line front end.

use thiserror::Error;

use crate::data_structures::hoku_bloom_filter::HokuBloomFilterError;

pub mod config;

/// Result type alias used throughout Hoku.
pub type HokuResult<T> = Result<T, HokuError>;

/// Core error enum for Hoku.
#[derive(Error, Debug)]
pub enum HokuError {
    /// Errors occurring during configuration loading or validation.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Errors raised by a Bloom filter.
    #[error("Filter error: {0}")]
    Filter(#[from] HokuBloomFilterError),

    /// IO errors that may occur during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors when reporting filter details.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Custom error with message for cases where specific error types are not defined.
    #[error("{0}")]
    Custom(String),
}

impl HokuError {
    /// Process exit code for this error.
    ///
    /// Configuration problems exit with 2, everything else with 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 2,
            Self::Filter(HokuBloomFilterError::Configuration(_)) => 2,
            _ => 1,
        }
    }
}
