// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Sizing mathematics for the Hoku Bloom Filter.
//!
//! A filter is sized through one of two paths:
//!
//! - **Explicit**: a byte budget, a hash count and the number of elements the
//!   filter is expected to hold. The false positive rate is derived.
//! - **Probabilistic**: the expected number of elements and the target false
//!   positive rate. Bit capacity and hash count are derived.
//!
//! Either way the bit capacity is a whole number of 32-bit storage words.

use std::f64::consts::LN_2;

use crate::data_structures::hoku_bloom_filter::error::{HokuBloomFilterError, Result};
use crate::data_structures::hoku_bloom_filter::hash::HashFunction;

/// Width of one storage word in bits.
pub const WORD_BITS: u32 = u32::BITS;

/// Width of one storage word in bytes.
pub const WORD_BYTES: usize = std::mem::size_of::<u32>();

/// Largest hash count representable by the one-byte probe seed.
pub const MAX_HASH_COUNT: usize = u8::MAX as usize;

/// Largest word count representable by the signed 32-bit `wordCount` field.
pub const MAX_WORD_COUNT: usize = i32::MAX as usize;

/// Largest defined capacity or insertion count representable by the signed
/// 32-bit header fields.
pub const MAX_ITEM_COUNT: u32 = i32::MAX as u32;

/// Resolved, immutable sizing of a filter.
///
/// Produced once at construction, either from user input or from a persisted
/// header, and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParameters {
    hash_count: u8,
    word_count: usize,
    false_positive_rate: f32,
    defined_capacity: u32,
    hash_function_id: u8,
}

impl FilterParameters {
    /// Size a filter from an explicit byte budget and hash count.
    ///
    /// The byte size is rounded up to whole storage words and the false
    /// positive rate is computed as `p = (1 - e^(-k*n/m))^k`.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Requested size of the bit store in bytes
    /// * `hash_count` - Number of probes per element (1 to 255)
    /// * `expected_items` - Number of elements the filter is designed for
    pub fn explicit(size_bytes: usize, hash_count: usize, expected_items: u32) -> Result<Self> {
        if size_bytes == 0 {
            return Err(HokuBloomFilterError::Configuration(
                "size must be greater than 0 bytes".to_string(),
            ));
        }
        let hash_count = validate_hash_count(hash_count)?;
        let expected_items = validate_item_count(expected_items)?;
        let word_count = validate_word_count(size_bytes.div_ceil(WORD_BYTES))?;
        let bit_capacity = bits_for_words(word_count);
        let false_positive_rate = false_positive_rate(
            bit_capacity,
            u64::from(expected_items),
            u32::from(hash_count),
        );

        Ok(Self {
            hash_count,
            word_count,
            false_positive_rate: false_positive_rate as f32,
            defined_capacity: expected_items,
            hash_function_id: HashFunction::default().id(),
        })
    }

    /// Size a filter for `expected_items` elements at the target `probability`.
    ///
    /// Uses `m = ceil(n*ln(p) / ln(1/2^ln2))`, rounded up to whole words (at
    /// least one), and `k = max(1, round(m/n * ln2))`.
    pub fn probabilistic(expected_items: u32, probability: f64) -> Result<Self> {
        if expected_items == 0 {
            return Err(HokuBloomFilterError::Configuration(
                "expected items must be greater than 0".to_string(),
            ));
        }
        let expected_items = validate_item_count(expected_items)?;
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(HokuBloomFilterError::Configuration(format!(
                "false positive rate must be in (0, 1], got {probability}"
            )));
        }

        let bits = optimal_bit_count(u64::from(expected_items), probability);
        if !bits.is_finite() || bits < 0.0 {
            return Err(HokuBloomFilterError::Configuration(format!(
                "cannot size a filter for {expected_items} items at rate {probability}"
            )));
        }

        let words = (bits / f64::from(WORD_BITS)).ceil().max(1.0);
        if words > MAX_WORD_COUNT as f64 {
            return Err(HokuBloomFilterError::Configuration(format!(
                "{bits} bits exceed the maximum of {} words",
                MAX_WORD_COUNT
            )));
        }
        let word_count = words as usize;

        let k = optimal_hash_count(bits_for_words(word_count), u64::from(expected_items));
        if !k.is_finite() || k > MAX_HASH_COUNT as f64 {
            return Err(HokuBloomFilterError::Configuration(format!(
                "rate {probability} needs {k} hash functions, at most {MAX_HASH_COUNT} are supported"
            )));
        }

        Ok(Self {
            hash_count: k as u8,
            word_count,
            false_positive_rate: probability as f32,
            defined_capacity: expected_items,
            hash_function_id: HashFunction::default().id(),
        })
    }

    /// Rebuild parameters from a persisted header.
    ///
    /// The bit capacity is implied by `word_count`.
    pub(crate) fn from_parts(
        hash_count: u8,
        hash_function_id: u8,
        false_positive_rate: f32,
        defined_capacity: u32,
        word_count: usize,
    ) -> Result<Self> {
        let hash_count = validate_hash_count(usize::from(hash_count))?;
        if word_count == 0 {
            return Err(HokuBloomFilterError::Configuration(
                "a filter needs at least one storage word".to_string(),
            ));
        }
        let word_count = validate_word_count(word_count)?;
        let defined_capacity = validate_item_count(defined_capacity)?;

        Ok(Self {
            hash_count,
            word_count,
            false_positive_rate,
            defined_capacity,
            hash_function_id,
        })
    }

    /// Select the digest algorithm recorded with the filter.
    pub fn with_hash_function(mut self, function: HashFunction) -> Self {
        self.hash_function_id = function.id();
        self
    }

    /// Number of probes per element (k).
    pub fn hash_count(&self) -> u8 {
        self.hash_count
    }

    /// Number of 32-bit storage words.
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    /// Total addressable bits (m).
    pub fn bit_capacity(&self) -> u64 {
        bits_for_words(self.word_count)
    }

    /// Target false positive rate (p).
    pub fn false_positive_rate(&self) -> f32 {
        self.false_positive_rate
    }

    /// Number of elements the filter is designed for (n).
    pub fn defined_capacity(&self) -> u32 {
        self.defined_capacity
    }

    /// Identifier of the digest algorithm.
    pub fn hash_function_id(&self) -> u8 {
        self.hash_function_id
    }

    /// Size of the bit store in bytes.
    pub fn footprint_bytes(&self) -> u64 {
        self.word_count as u64 * WORD_BYTES as u64
    }
}

/// Probability of a false positive for `items` elements in `bits` bits probed
/// `hash_count` times: `(1 - e^(-k*n/m))^k`.
pub fn false_positive_rate(bits: u64, items: u64, hash_count: u32) -> f64 {
    if bits == 0 {
        return 1.0;
    }
    let k = f64::from(hash_count);
    let exponent = -(k * items as f64) / bits as f64;
    (1.0 - exponent.exp()).powf(k)
}

/// Bits needed for `items` elements at rate `probability`, before word rounding.
pub fn optimal_bit_count(items: u64, probability: f64) -> f64 {
    let denominator = (1.0 / 2f64.powf(LN_2)).ln();
    (items as f64 * probability.ln() / denominator).ceil()
}

/// Hash count minimizing the false positive rate for `bits` bits and `items` elements.
pub fn optimal_hash_count(bits: u64, items: u64) -> f64 {
    (bits as f64 / items as f64 * LN_2).round().max(1.0)
}

fn bits_for_words(word_count: usize) -> u64 {
    word_count as u64 * u64::from(WORD_BITS)
}

fn validate_hash_count(hash_count: usize) -> Result<u8> {
    match hash_count {
        0 => Err(HokuBloomFilterError::Configuration(
            "hash count must be greater than 0".to_string(),
        )),
        k if k > MAX_HASH_COUNT => Err(HokuBloomFilterError::Configuration(format!(
            "hash count must be at most {MAX_HASH_COUNT}, got {k}"
        ))),
        k => Ok(k as u8),
    }
}

fn validate_item_count(items: u32) -> Result<u32> {
    if items > MAX_ITEM_COUNT {
        return Err(HokuBloomFilterError::Configuration(format!(
            "{items} items exceed the maximum of {MAX_ITEM_COUNT}"
        )));
    }
    Ok(items)
}

fn validate_word_count(word_count: usize) -> Result<usize> {
    if word_count > MAX_WORD_COUNT {
        return Err(HokuBloomFilterError::Configuration(format!(
            "{word_count} words exceed the maximum of {MAX_WORD_COUNT}"
        )));
    }
    Ok(word_count)
}
