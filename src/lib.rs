//! Hoku Library
//!
//! This library contains a concurrent, insert-only Bloom filter over byte
//! strings together with its portable binary format, plus the configuration
//! and error types used by the `hoku` command-line tool.
//!
//! # Architecture
//!
//! Hoku is designed with the following principles in mind:
//! - Strict component boundaries
//! - Lock-free concurrency for high throughput
//! - Comprehensive error handling and propagation
//! - Bit-exact, platform-independent persistence

// Re-export public modules
pub mod config;
pub mod data_structures;
pub mod error;

// Internal modules that are not part of the public API
#[cfg(test)]
pub(crate) mod tests;

/// Version information for Hoku.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
