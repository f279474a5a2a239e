// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Probe index derivation for the Hoku Bloom Filter.
//!
//! Every probe is an independent digest: the element bytes followed by a single
//! seed byte `i` are hashed, the digest is read as an unsigned big-endian
//! integer and reduced modulo the bit capacity. Indices depend only on the
//! element, the seed, the bit capacity and the digest algorithm, so two
//! filters with the same parameters agree bit for bit.

use std::num::NonZeroU64;

use sha2::{Digest, Sha256};

use crate::data_structures::hoku_bloom_filter::error::{HokuBloomFilterError, Result};

/// Digest algorithms a filter can record in its `hashFunctionId` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum HashFunction {
    /// SHA-256 over `element ‖ seed`
    #[default]
    Sha256 = 0,
}

impl HashFunction {
    /// Identifier stored in the persisted header.
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Resolve a persisted identifier.
    ///
    /// Fails with [`HokuBloomFilterError::Hash`] for identifiers this build
    /// does not implement.
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Sha256),
            other => Err(HokuBloomFilterError::Hash(format!(
                "unsupported hash function id {other}"
            ))),
        }
    }

    /// Bit index of probe `seed` for `element` in a store of `bit_capacity` bits.
    pub fn bit_index(self, element: &[u8], seed: u8, bit_capacity: NonZeroU64) -> u64 {
        match self {
            Self::Sha256 => {
                let mut hasher = Sha256::new();
                hasher.update(element);
                hasher.update([seed]);
                reduce_digest(&hasher.finalize(), bit_capacity)
            }
        }
    }
}

/// Computes the probe positions of one element.
pub(crate) trait ProbeHasher {
    /// Position of probe `seed`.
    fn probe(&self, element: &[u8], seed: u8) -> u64;

    /// Fill `positions` with the first `positions.len()` probes, seed `i` at index `i`.
    ///
    /// `positions` must not be longer than 256 entries.
    fn fill_probes(&self, element: &[u8], positions: &mut [u64]) {
        for (seed, position) in (0..=u8::MAX).zip(positions.iter_mut()) {
            *position = self.probe(element, seed);
        }
    }
}

/// A [`HashFunction`] bound to the bit capacity of one filter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DigestProbeHasher {
    function: HashFunction,
    bit_capacity: NonZeroU64,
}

impl DigestProbeHasher {
    /// Bind the algorithm named by `hash_function_id` to `bit_capacity`.
    pub fn new(hash_function_id: u8, bit_capacity: u64) -> Result<Self> {
        let bit_capacity = NonZeroU64::new(bit_capacity).ok_or_else(|| {
            HokuBloomFilterError::Configuration("bit capacity must be greater than 0".to_string())
        })?;
        Ok(Self {
            function: HashFunction::from_id(hash_function_id)?,
            bit_capacity,
        })
    }
}

impl ProbeHasher for DigestProbeHasher {
    fn probe(&self, element: &[u8], seed: u8) -> u64 {
        self.function.bit_index(element, seed, self.bit_capacity)
    }
}

/// Reduce a big-endian unsigned integer modulo `modulus`.
fn reduce_digest(digest: &[u8], modulus: NonZeroU64) -> u64 {
    let modulus = u128::from(modulus.get());
    let remainder = digest
        .iter()
        .fold(0u128, |acc, &byte| ((acc << 8) | u128::from(byte)) % modulus);
    remainder as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn bits(count: u64) -> NonZeroU64 {
        NonZeroU64::new(count).unwrap()
    }

    fn probes(hasher: &DigestProbeHasher, element: &[u8], hash_count: usize) -> Vec<u64> {
        let mut positions = vec![0; hash_count];
        hasher.fill_probes(element, &mut positions);
        positions
    }

    #[test]
    fn test_known_digest_index() {
        // SHA-256(0x00) ends in 0x1d.
        assert_eq!(HashFunction::Sha256.bit_index(b"", 0, bits(32)), 29);
        assert_eq!(HashFunction::Sha256.bit_index(b"", 0, bits(256)), 29);
    }

    #[test]
    fn test_reduce_digest() {
        assert_eq!(reduce_digest(&[0x01, 0x00], bits(7)), 256 % 7);
        assert_eq!(reduce_digest(&[0xff; 32], bits(1)), 0);
        assert_eq!(
            reduce_digest(&[0x12, 0x34, 0x56, 0x78], bits(1_000_003)),
            0x1234_5678 % 1_000_003
        );
    }

    #[test]
    fn test_hash_stability() {
        let hasher = DigestProbeHasher::new(0, 9600).unwrap();
        let first_run = probes(&hasher, b"stable_hash_test", 7);
        let second_run = probes(&hasher, b"stable_hash_test", 7);

        assert_eq!(first_run.len(), 7);
        assert_eq!(first_run, second_run);
    }

    #[test]
    fn test_indices_within_capacity() {
        for bits in [32u64, 96, 9600, 1 << 33] {
            let hasher = DigestProbeHasher::new(0, bits).unwrap();
            for index in probes(&hasher, b"bounded", 255) {
                assert!(index < bits);
            }
        }
    }

    #[test]
    fn test_seeds_produce_distinct_probes() {
        let hasher = DigestProbeHasher::new(0, 1 << 20).unwrap();
        let unique = probes(&hasher, b"spread", 10).into_iter().collect::<HashSet<_>>();
        assert!(unique.len() >= 9);
    }

    #[test]
    fn test_unknown_hash_function() {
        assert_eq!(HashFunction::from_id(0).unwrap(), HashFunction::Sha256);
        assert!(matches!(
            HashFunction::from_id(7),
            Err(HokuBloomFilterError::Hash(_))
        ));
        assert!(DigestProbeHasher::new(7, 64).is_err());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(
            DigestProbeHasher::new(0, 0),
            Err(HokuBloomFilterError::Configuration(_))
        ));
    }

    #[test]
    fn test_filled_positions_match_single_lookups() {
        let hasher = DigestProbeHasher::new(0, 4096).unwrap();
        let mut positions = [0u64; 12];
        hasher.fill_probes(b"buffered", &mut positions[..5]);

        for (seed, &position) in positions[..5].iter().enumerate() {
            assert_eq!(position, hasher.probe(b"buffered", seed as u8));
        }
        assert_eq!(&positions[5..], &[0; 7]);

        let mut all = [0u64; 256];
        hasher.fill_probes(b"buffered", &mut all);
        assert_eq!(all[255], hasher.probe(b"buffered", 255));
    }
}
