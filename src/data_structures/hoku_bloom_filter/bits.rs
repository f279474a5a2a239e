// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Word-packed atomic bit store.
//!
//! Bits are packed into 32-bit words with bit 0 of a word being its most
//! significant bit. Bits are only ever set, never cleared, so every mutation
//! is a single `fetch_or` and concurrent readers can only observe a store that
//! is at least as full as any serial execution would produce.

use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use crate::data_structures::hoku_bloom_filter::error::{HokuBloomFilterError, Result};
use crate::data_structures::hoku_bloom_filter::params::{WORD_BITS, WORD_BYTES};

/// Fixed-size array of atomic words plus the insertion counter.
#[derive(Debug)]
pub(crate) struct AtomicBitStore {
    words: Vec<AtomicU32>,
    inserted: AtomicU64,
}

impl AtomicBitStore {
    /// Allocate `word_count` zeroed words.
    ///
    /// The allocation is reserved up front; a refusal is reported as
    /// [`HokuBloomFilterError::Resource`] and nothing is kept.
    pub fn zeroed(word_count: usize) -> Result<Self> {
        let mut words = Vec::new();
        words
            .try_reserve_exact(word_count)
            .map_err(|_| HokuBloomFilterError::Resource {
                requested_bytes: word_count as u64 * WORD_BYTES as u64,
            })?;
        words.resize_with(word_count, || AtomicU32::new(0));

        Ok(Self {
            words,
            inserted: AtomicU64::new(0),
        })
    }

    /// Rebuild a store verbatim from persisted words and count.
    pub fn from_words(words: Vec<u32>, inserted: u64) -> Self {
        Self {
            words: words.into_iter().map(AtomicU32::new).collect(),
            inserted: AtomicU64::new(inserted),
        }
    }

    /// Set bit `index`.
    pub fn set(&self, index: u64) {
        let (word, mask) = locate(index);
        self.words[word].fetch_or(mask, Ordering::Release);
    }

    /// Returns true if bit `index` is set.
    pub fn test(&self, index: u64) -> bool {
        let (word, mask) = locate(index);
        self.words[word].load(Ordering::Acquire) & mask == mask
    }

    /// Count one insertion and return the new total.
    pub fn record_insertion(&self) -> u64 {
        self.inserted.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Number of insertions recorded so far.
    pub fn inserted(&self) -> u64 {
        self.inserted.load(Ordering::Acquire)
    }

    /// Number of storage words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> u64 {
        self.words
            .iter()
            .map(|word| u64::from(word.load(Ordering::Relaxed).count_ones()))
            .sum()
    }

    /// Copy of the current word contents, in order.
    pub fn snapshot(&self) -> Vec<u32> {
        self.words
            .iter()
            .map(|word| word.load(Ordering::Acquire))
            .collect()
    }
}

/// Word index and mask for bit `index`, most significant bit first.
fn locate(index: u64) -> (usize, u32) {
    let word = (index / u64::from(WORD_BITS)) as usize;
    let offset = (index % u64::from(WORD_BITS)) as u32;
    (word, 1u32 << (WORD_BITS - 1 - offset))
}
