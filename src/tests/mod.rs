//! Test modules for Hoku.
//!
//! This module contains the in-crate test suites:
//! - Configuration loading and validation
//! - Error conversion and formatting
//! - Bloom filter behaviour, including property-based tests using proptest
//! - Shared fixtures and strategies

pub mod hoku_bloom_filter_tests;

// Re-export commonly used testing tools to simplify imports in test modules
pub use test_utils::{create_test_dir, distinct_elements_strategy, element_strategy, CountingObserver};
