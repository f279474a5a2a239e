// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Hoku Bloom Filter for persistent set membership.
//!
//! A space-efficient probabilistic set over byte strings. Membership queries
//! never return a false negative and return a false positive with a
//! probability bounded by the configured rate while the filter holds no more
//! than the number of elements it was sized for.
//!
//! # Features
//!
//! - Thread-safe, lock-free implementation built on atomic 32-bit words.
//! - Sizing either from a target false positive rate or from an explicit
//!   byte size and hash count.
//! - Independent SHA-256 probes, so identical parameters give identical bits
//!   on every platform.
//! - A versioned big-endian binary format for persistence.
//! - Saturation reporting through a pluggable observer.
//!
//! # Example
//!
//! ```
//! use hoku_lib::data_structures::hoku_bloom_filter::{HokuBloomFilter, HokuBloomFilterConfig};
//!
//! let config = HokuBloomFilterConfig::new()
//!     .with_expected_items(1_000)
//!     .with_false_positive_rate(0.01);
//! let filter = HokuBloomFilter::with_config(config).unwrap();
//!
//! filter.add(b"hello").unwrap();
//!
//! assert!(filter.might_contain(b"hello").unwrap());
//! assert_eq!(filter.bit_capacity(), 9600);
//! assert_eq!(filter.hash_count(), 7);
//! ```
//!
//! # Persistence
//!
//! A filter written with [`HokuBloomFilter::write_to`] can be restored with
//! [`HokuBloomFilter::read_from`] into an instance that answers every query
//! exactly as the filter it was written from:
//!
//! ```
//! use hoku_lib::data_structures::hoku_bloom_filter::HokuBloomFilter;
//!
//! let filter = HokuBloomFilter::with_size(128, 4, 100).unwrap();
//! filter.add(b"persisted").unwrap();
//!
//! let bytes = filter.to_bytes().unwrap();
//! assert_eq!(bytes.len(), 20 + 128);
//!
//! let restored = HokuBloomFilter::from_bytes(&bytes).unwrap();
//! assert!(restored.might_contain(b"persisted").unwrap());
//! assert_eq!(restored.current_count(), 1);
//! ```

// Module declarations
mod bits;
mod codec;
mod config;
mod error;
mod events;
mod filter;
mod hash;
mod params;

// Re-exports
pub use codec::{FORMAT_VERSION, HEADER_BYTES};
pub use config::{FilterSizing, HokuBloomFilterConfig};
pub use error::{HokuBloomFilterError, Result};
pub use events::{
    NoOpSaturationObserver, SaturationEvent, SaturationObserver, TracingSaturationObserver,
};
pub use filter::{FilterSummary, HokuBloomFilter};
pub use hash::HashFunction;
pub use params::{
    false_positive_rate, optimal_bit_count, optimal_hash_count, FilterParameters,
    MAX_HASH_COUNT, MAX_ITEM_COUNT, MAX_WORD_COUNT,
};
