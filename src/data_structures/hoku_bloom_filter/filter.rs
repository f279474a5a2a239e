// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Main implementation of the Hoku Bloom Filter.

use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

use serde::Serialize;

use crate::data_structures::hoku_bloom_filter::bits::AtomicBitStore;
use crate::data_structures::hoku_bloom_filter::codec::{self, FilterState, HEADER_BYTES};
use crate::data_structures::hoku_bloom_filter::config::HokuBloomFilterConfig;
use crate::data_structures::hoku_bloom_filter::error::Result;
use crate::data_structures::hoku_bloom_filter::events::{
    SaturationEvent, SaturationObserver, TracingSaturationObserver,
};
use crate::data_structures::hoku_bloom_filter::hash::{DigestProbeHasher, ProbeHasher};
use crate::data_structures::hoku_bloom_filter::params::{
    self, FilterParameters, MAX_HASH_COUNT, WORD_BYTES,
};

/// An insert-only Bloom filter over byte strings.
///
/// `HokuBloomFilter` is lock-free: every bit is set with a single atomic
/// `fetch_or` and the insertion counter is an atomic add, so one instance can
/// be shared between threads behind an `Arc` and used through `&self`.
///
/// # Examples
///
/// ```
/// use hoku_lib::data_structures::hoku_bloom_filter::HokuBloomFilter;
///
/// let filter = HokuBloomFilter::with_probability(1_000, 0.01).unwrap();
/// filter.add(b"hello_world").unwrap();
///
/// assert!(filter.might_contain(b"hello_world").unwrap());
/// assert_eq!(filter.current_count(), 1);
///
/// let mut bytes = Vec::new();
/// filter.write_to(&mut bytes).unwrap();
/// let restored = HokuBloomFilter::read_from(bytes.as_slice()).unwrap();
/// assert!(restored.might_contain(b"hello_world").unwrap());
/// ```
pub struct HokuBloomFilter {
    /// Sizing fixed at construction
    params: FilterParameters,

    /// Bit words and insertion counter
    store: AtomicBitStore,

    /// Receives an event for each insertion past the defined capacity
    observer: Arc<dyn SaturationObserver>,
}

/// Read-only description of a filter, suitable for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSummary {
    /// Number of probes per element (k)
    pub hash_count: u8,
    /// Digest algorithm identifier
    pub hash_function_id: u8,
    /// Total addressable bits (m)
    pub bit_capacity: u64,
    /// Size of the bit store in bytes
    pub size_bytes: u64,
    /// Target false positive rate (p)
    pub false_positive_rate: f32,
    /// Number of elements the filter was designed for (n)
    pub defined_capacity: u32,
    /// Number of insertions so far
    pub current_count: u64,
    /// Fraction of bits set
    pub fill_ratio: f64,
    /// False positive rate predicted at the current load
    pub estimated_false_positive_rate: f64,
}

impl HokuBloomFilter {
    /// Create a filter with an explicit byte size and hash count.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Size of the bit store, rounded up to whole 32-bit words
    /// * `hash_count` - Number of probes per element, 1 to 255
    /// * `expected_items` - Number of elements the filter is designed for
    pub fn with_size(size_bytes: usize, hash_count: usize, expected_items: u32) -> Result<Self> {
        Self::from_parameters(FilterParameters::explicit(
            size_bytes,
            hash_count,
            expected_items,
        )?)
    }

    /// Create a filter sized for `expected_items` at the target false positive rate.
    pub fn with_probability(expected_items: u32, false_positive_rate: f64) -> Result<Self> {
        Self::from_parameters(FilterParameters::probabilistic(
            expected_items,
            false_positive_rate,
        )?)
    }

    /// Create a filter from a builder configuration.
    pub fn with_config(config: HokuBloomFilterConfig) -> Result<Self> {
        Self::from_parameters(config.resolve()?)
    }

    /// Create an empty filter with already resolved parameters.
    pub fn from_parameters(params: FilterParameters) -> Result<Self> {
        let store = AtomicBitStore::zeroed(params.word_count())?;
        tracing::debug!(
            bit_capacity = params.bit_capacity(),
            hash_count = params.hash_count(),
            defined_capacity = params.defined_capacity(),
            false_positive_rate = params.false_positive_rate(),
            "Created bloom filter"
        );

        Ok(Self {
            params,
            store,
            observer: Arc::new(TracingSaturationObserver),
        })
    }

    /// Read a filter from its persisted form.
    pub fn read_from<R: Read>(reader: R) -> Result<Self> {
        let FilterState {
            params,
            words,
            current_count,
        } = codec::decode(reader)?;
        tracing::debug!(
            bit_capacity = params.bit_capacity(),
            hash_count = params.hash_count(),
            current_count,
            "Loaded bloom filter"
        );

        Ok(Self {
            params,
            store: AtomicBitStore::from_words(words, current_count),
            observer: Arc::new(TracingSaturationObserver),
        })
    }

    /// Read a filter from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::read_from(bytes)
    }

    /// Replace the state of this filter with a persisted one.
    ///
    /// On error the current state is left untouched. The observer is kept.
    pub fn reload_from<R: Read>(&mut self, reader: R) -> Result<()> {
        let loaded = Self::read_from(reader)?;
        self.params = loaded.params;
        self.store = loaded.store;
        Ok(())
    }

    /// Route saturation events to `observer` instead of the tracing log.
    pub fn with_observer(mut self, observer: Arc<dyn SaturationObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Insert an element.
    ///
    /// All probe positions are derived before any bit is touched, so a hash
    /// failure leaves the filter unchanged. Each insertion past the defined
    /// capacity is reported to the observer.
    pub fn add(&self, element: &[u8]) -> Result<()> {
        let mut buffer = [0u64; MAX_HASH_COUNT];
        let positions = &mut buffer[..usize::from(self.params.hash_count())];
        self.hasher()?.fill_probes(element, positions);
        for &position in positions.iter() {
            self.store.set(position);
        }

        let count = self.store.record_insertion();
        if count > u64::from(self.params.defined_capacity()) {
            self.observer.on_saturation(&SaturationEvent {
                current_count: count,
                defined_capacity: self.params.defined_capacity(),
                target_false_positive_rate: self.params.false_positive_rate(),
                estimated_false_positive_rate: self.estimate_at(count),
            });
        }

        Ok(())
    }

    /// Returns true if the element might have been inserted.
    ///
    /// False positives are possible, false negatives are not. Stops at the
    /// first probe whose bit is unset.
    pub fn might_contain(&self, element: &[u8]) -> Result<bool> {
        let hasher = self.hasher()?;
        Ok((0..self.params.hash_count()).all(|seed| self.store.test(hasher.probe(element, seed))))
    }

    /// Write the filter in the binary persistence format.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let words = self.store.snapshot();
        codec::encode(writer, &self.params, &words, self.store.inserted())?;
        tracing::debug!(words = words.len(), "Persisted bloom filter");
        Ok(())
    }

    /// Serialize the filter into a new buffer.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(HEADER_BYTES + self.store.word_count() * WORD_BYTES);
        self.write_to(&mut bytes)?;
        Ok(bytes)
    }

    /// Target false positive rate (p).
    pub fn false_positive_rate(&self) -> f32 {
        self.params.false_positive_rate()
    }

    /// Number of probes per element (k).
    pub fn hash_count(&self) -> u8 {
        self.params.hash_count()
    }

    /// Total addressable bits (m).
    pub fn bit_capacity(&self) -> u64 {
        self.params.bit_capacity()
    }

    /// Number of elements the filter is designed for (n).
    pub fn defined_capacity(&self) -> u32 {
        self.params.defined_capacity()
    }

    /// Number of `add` calls so far, duplicates included.
    pub fn current_count(&self) -> u64 {
        self.store.inserted()
    }

    /// Identifier of the digest algorithm.
    pub fn hash_function_id(&self) -> u8 {
        self.params.hash_function_id()
    }

    /// Sizing of this filter.
    pub fn parameters(&self) -> &FilterParameters {
        &self.params
    }

    /// Copy of the raw storage words.
    pub fn words(&self) -> Vec<u32> {
        self.store.snapshot()
    }

    /// Fraction of bits currently set, between 0.0 and 1.0.
    pub fn fill_ratio(&self) -> f64 {
        self.store.count_ones() as f64 / self.bit_capacity() as f64
    }

    /// False positive rate predicted for the current number of insertions.
    pub fn estimated_false_positive_rate(&self) -> f64 {
        self.estimate_at(self.current_count())
    }

    /// Snapshot of parameters and load.
    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            hash_count: self.hash_count(),
            hash_function_id: self.hash_function_id(),
            bit_capacity: self.bit_capacity(),
            size_bytes: self.params.footprint_bytes(),
            false_positive_rate: self.false_positive_rate(),
            defined_capacity: self.defined_capacity(),
            current_count: self.current_count(),
            fill_ratio: self.fill_ratio(),
            estimated_false_positive_rate: self.estimated_false_positive_rate(),
        }
    }

    fn hasher(&self) -> Result<DigestProbeHasher> {
        DigestProbeHasher::new(self.params.hash_function_id(), self.params.bit_capacity())
    }

    fn estimate_at(&self, count: u64) -> f64 {
        params::false_positive_rate(
            self.params.bit_capacity(),
            count,
            u32::from(self.params.hash_count()),
        )
    }
}

impl fmt::Debug for HokuBloomFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HokuBloomFilter")
            .field("params", &self.params)
            .field("current_count", &self.current_count())
            .finish_non_exhaustive()
    }
}
