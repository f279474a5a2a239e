//! Data structures for Hoku.
//!
//! This module contains specialized data structures optimized for
//! high-performance concurrent operations. All implementations adhere to the
//! strict project requirements:
//! - No unsafe code
//! - Lock-free concurrency patterns
//! - Explicit, versioned binary formats for anything that is persisted

pub mod hoku_bloom_filter;

// Re-export common data structures
pub use hoku_bloom_filter::{HokuBloomFilter, HokuBloomFilterConfig, HokuBloomFilterError};
