// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Error types for the Hoku Bloom Filter.

/// Errors that can occur in Hoku Bloom Filter operations.
#[derive(Debug, thiserror::Error)]
pub enum HokuBloomFilterError {
    /// The requested sizing is invalid or degenerate
    #[error("Invalid filter configuration: {0}")]
    Configuration(String),

    /// The bit store could not be allocated
    #[error("Insufficient memory for a bit store of {requested_bytes} bytes")]
    Resource {
        /// Size of the allocation that was refused
        requested_bytes: u64,
    },

    /// The digest algorithm named by the filter is unavailable
    #[error("Hash calculation error: {0}")]
    Hash(String),

    /// Reading or writing the persisted form failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Hoku Bloom Filter operations
pub type Result<T> = std::result::Result<T, HokuBloomFilterError>;

impl HokuBloomFilterError {
    /// Build an `Io` error of kind `InvalidData` for malformed persisted state.
    pub(crate) fn invalid_data(message: impl Into<String>) -> Self {
        Self::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message.into(),
        ))
    }
}
