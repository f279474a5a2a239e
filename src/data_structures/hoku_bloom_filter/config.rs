// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Configuration for the Hoku Bloom Filter.

use crate::data_structures::hoku_bloom_filter::error::{HokuBloomFilterError, Result};
use crate::data_structures::hoku_bloom_filter::hash::HashFunction;
use crate::data_structures::hoku_bloom_filter::params::FilterParameters;

/// How the bit capacity and hash count are chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterSizing {
    /// Derive size and hash count from a target false positive rate
    Probabilistic {
        /// Desired false positive rate in (0, 1]
        false_positive_rate: f64,
    },
    /// Use a fixed byte size and hash count, derive the false positive rate
    Explicit {
        /// Size of the bit store in bytes, rounded up to whole words
        size_bytes: usize,
        /// Number of probes per element
        hash_count: usize,
    },
}

/// Configuration for the Hoku Bloom Filter.
///
/// Nothing is validated until the configuration is resolved, so the builder
/// methods never fail.
#[derive(Debug, Clone)]
pub struct HokuBloomFilterConfig {
    /// Expected number of items that will be inserted into the filter
    expected_items: u32,

    /// Sizing path
    sizing: FilterSizing,

    /// Optional ceiling on the bit store size in bytes
    max_memory_bytes: Option<u64>,

    /// Digest algorithm used to derive probe positions
    hash_function: HashFunction,
}

impl HokuBloomFilterConfig {
    /// Create a new default configuration.
    ///
    /// Default values:
    /// - expected_items: 100,000
    /// - sizing: probabilistic at a false positive rate of 0.01 (1%)
    /// - max_memory_bytes: None (unconstrained)
    /// - hash_function: SHA-256
    pub fn new() -> Self {
        Self {
            expected_items: 100_000,
            sizing: FilterSizing::Probabilistic {
                false_positive_rate: 0.01,
            },
            max_memory_bytes: None,
            hash_function: HashFunction::Sha256,
        }
    }

    /// Set the expected number of items to be inserted into the filter.
    pub fn with_expected_items(mut self, expected_items: u32) -> Self {
        self.expected_items = expected_items;
        self
    }

    /// Size the filter for the given false positive rate.
    ///
    /// Replaces any explicit sizing set earlier.
    pub fn with_false_positive_rate(mut self, false_positive_rate: f64) -> Self {
        self.sizing = FilterSizing::Probabilistic { false_positive_rate };
        self
    }

    /// Size the filter with a fixed byte size and hash count.
    ///
    /// Replaces any target false positive rate set earlier.
    pub fn with_explicit_size(mut self, size_bytes: usize, hash_count: usize) -> Self {
        self.sizing = FilterSizing::Explicit {
            size_bytes,
            hash_count,
        };
        self
    }

    /// Refuse to allocate a bit store larger than `max_memory_bytes`.
    pub fn with_max_memory_bytes(mut self, max_memory_bytes: u64) -> Self {
        self.max_memory_bytes = Some(max_memory_bytes);
        self
    }

    /// Select the digest algorithm.
    pub fn with_hash_function(mut self, hash_function: HashFunction) -> Self {
        self.hash_function = hash_function;
        self
    }

    /// Get the expected number of items
    pub fn expected_items(&self) -> u32 {
        self.expected_items
    }

    /// Get the sizing path
    pub fn sizing(&self) -> FilterSizing {
        self.sizing
    }

    /// Get the memory ceiling, if any
    pub fn max_memory_bytes(&self) -> Option<u64> {
        self.max_memory_bytes
    }

    /// Get the digest algorithm
    pub fn hash_function(&self) -> HashFunction {
        self.hash_function
    }

    /// Compute the filter parameters and check them against the memory ceiling.
    pub fn resolve(&self) -> Result<FilterParameters> {
        let params = match self.sizing {
            FilterSizing::Probabilistic { false_positive_rate } => {
                FilterParameters::probabilistic(self.expected_items, false_positive_rate)?
            }
            FilterSizing::Explicit {
                size_bytes,
                hash_count,
            } => FilterParameters::explicit(size_bytes, hash_count, self.expected_items)?,
        }
        .with_hash_function(self.hash_function);

        if let Some(limit) = self.max_memory_bytes {
            if params.footprint_bytes() > limit {
                return Err(HokuBloomFilterError::Resource {
                    requested_bytes: params.footprint_bytes(),
                });
            }
        }

        Ok(params)
    }
}

impl Default for HokuBloomFilterConfig {
    fn default() -> Self {
        Self::new()
    }
}
