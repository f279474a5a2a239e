// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

use crate::data_structures::hoku_bloom_filter::{
    HokuBloomFilter, HokuBloomFilterConfig, HokuBloomFilterError, NoOpSaturationObserver,
};
use crate::tests::{create_test_dir, distinct_elements_strategy, element_strategy, CountingObserver};
use proptest::prelude::*;
use std::fs::File;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use test_case::test_case;

// Constants for testing
const EXPECTED_ITEMS: u32 = 10_000;
const FALSE_POSITIVE_RATE: f64 = 0.01;
const THREAD_COUNT: usize = 8;
const ITEMS_PER_THREAD: usize = 1_000;

/// Setup a test filter with specific configuration
fn setup_test_filter() -> HokuBloomFilter {
    let config = HokuBloomFilterConfig::new()
        .with_expected_items(EXPECTED_ITEMS)
        .with_false_positive_rate(FALSE_POSITIVE_RATE);

    HokuBloomFilter::with_config(config)
        .unwrap()
        .with_observer(Arc::new(NoOpSaturationObserver))
}

#[test_case(1_000, 0.01, 9_600, 7 ; "one percent")]
#[test_case(10_000, 0.001, 143_776, 10 ; "one in a thousand")]
#[test_case(100, 0.5, 160, 1 ; "coin flip")]
#[test_case(1, 1.0, 32, 22 ; "certain rate keeps one word")]
fn test_probabilistic_sizing(items: u32, rate: f64, bit_capacity: u64, hash_count: u8) {
    let filter = HokuBloomFilter::with_probability(items, rate).unwrap();
    assert_eq!(filter.bit_capacity(), bit_capacity);
    assert_eq!(filter.hash_count(), hash_count);
    assert_eq!(filter.false_positive_rate(), rate as f32);
}

#[test_case(1, 1, 32 ; "one byte is one word")]
#[test_case(4, 3, 32 ; "exact word")]
#[test_case(5, 3, 64 ; "rounded up")]
#[test_case(1200, 255, 9_600 ; "largest hash count")]
fn test_explicit_sizing(size_bytes: usize, hash_count: usize, bit_capacity: u64) {
    let filter = HokuBloomFilter::with_size(size_bytes, hash_count, 100).unwrap();
    assert_eq!(filter.bit_capacity(), bit_capacity);
    assert_eq!(usize::from(filter.hash_count()), hash_count);
}

#[test]
fn test_explicit_sizing_without_elements() {
    let filter = HokuBloomFilter::with_size(64, 3, 0).unwrap();
    assert_eq!(filter.false_positive_rate(), 0.0);
    assert_eq!(filter.defined_capacity(), 0);
}

#[test]
fn test_rejected_sizing() {
    assert!(matches!(
        HokuBloomFilter::with_size(64, 256, 10),
        Err(HokuBloomFilterError::Configuration(_))
    ));
    assert!(matches!(
        HokuBloomFilter::with_size(0, 3, 10),
        Err(HokuBloomFilterError::Configuration(_))
    ));
    assert!(matches!(
        HokuBloomFilter::with_probability(10, 0.0),
        Err(HokuBloomFilterError::Configuration(_))
    ));
}

/// Test basic insertion and lookup operations
#[test]
fn test_basic_operations() {
    let filter = setup_test_filter();
    let values: [&[u8]; 3] = [b"test1", b"test2", b"test3"];

    for val in values {
        assert!(!filter.might_contain(val).unwrap(), "Value should not be in filter initially");
    }

    for val in values {
        filter.add(val).unwrap();
        assert!(filter.might_contain(val).unwrap(), "Value should be in filter after insertion");
    }

    assert!(!filter.might_contain(b"not_inserted").unwrap());
    assert_eq!(filter.current_count(), 3);
}

#[test]
fn test_empty_element() {
    let filter = setup_test_filter();
    filter.add(b"").unwrap();
    assert!(filter.might_contain(b"").unwrap());
}

/// Test the filter's fill ratio
#[test]
fn test_fill_ratio() {
    let filter = setup_test_filter();
    assert_eq!(filter.fill_ratio(), 0.0);

    for i in 0..1000u32 {
        filter.add(&i.to_le_bytes()).unwrap();
    }

    let ratio = filter.fill_ratio();
    assert!(ratio > 0.0);
    assert!(ratio < 1.0);
    assert!(filter.estimated_false_positive_rate() < FALSE_POSITIVE_RATE);
}

#[test]
fn test_saturation_events() {
    let observer = Arc::new(CountingObserver::default());
    let filter = HokuBloomFilter::with_probability(10, 0.01)
        .unwrap()
        .with_observer(observer.clone());

    for i in 0..10u8 {
        filter.add(&[i]).unwrap();
    }
    assert_eq!(observer.count(), 0);

    filter.add(&[10]).unwrap();
    filter.add(&[11]).unwrap();
    assert_eq!(observer.count(), 2);

    let events = observer.events();
    assert_eq!(events[0].current_count, 11);
    assert_eq!(events[1].current_count, 12);
    assert_eq!(events[0].defined_capacity, 10);
    assert_eq!(events[0].target_false_positive_rate, 0.01);
    assert!(events[1].estimated_false_positive_rate > events[0].estimated_false_positive_rate);

    for i in 0..12u8 {
        assert!(filter.might_contain(&[i]).unwrap());
    }
}

#[test]
fn test_duplicates_count_towards_saturation() {
    let observer = Arc::new(CountingObserver::default());
    let filter = HokuBloomFilter::with_size(64, 3, 2)
        .unwrap()
        .with_observer(observer.clone());

    for _ in 0..3 {
        filter.add(b"same").unwrap();
    }

    assert_eq!(filter.current_count(), 3);
    assert_eq!(observer.count(), 1);
}

#[test]
fn test_persist_to_file() {
    let dir = create_test_dir().unwrap();
    let path = dir.path().join("filter.hoku");

    let filter = setup_test_filter();
    for i in 0..500u32 {
        filter.add(&i.to_be_bytes()).unwrap();
    }
    filter.write_to(File::create(&path).unwrap()).unwrap();

    let restored = HokuBloomFilter::read_from(File::open(&path).unwrap()).unwrap();
    assert_eq!(restored.summary(), filter.summary());
    assert_eq!(restored.words(), filter.words());
    for i in 0..500u32 {
        assert!(restored.might_contain(&i.to_be_bytes()).unwrap());
    }

    let mut reloaded = HokuBloomFilter::with_size(4, 1, 1).unwrap();
    reloaded.reload_from(File::open(&path).unwrap()).unwrap();
    assert_eq!(reloaded.parameters(), filter.parameters());
    assert_eq!(reloaded.current_count(), 500);
}

/// Test concurrent insertions and lookups from multiple threads
#[test]
fn test_concurrent_insertions_and_lookups() {
    let filter = Arc::new(setup_test_filter());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT * 2 + 1)); // Writers + readers + main
    let found_count = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::new();

    for t in 0..THREAD_COUNT {
        let filter = Arc::clone(&filter);
        let barrier = Arc::clone(&barrier);

        handles.push(thread::spawn(move || {
            let start = t * ITEMS_PER_THREAD;
            barrier.wait();
            for i in start..start + ITEMS_PER_THREAD {
                filter.add(&(i as u64).to_be_bytes()).unwrap();
            }
        }));
    }

    for t in 0..THREAD_COUNT {
        let filter = Arc::clone(&filter);
        let barrier = Arc::clone(&barrier);
        let found_count = Arc::clone(&found_count);

        handles.push(thread::spawn(move || {
            let start = t * ITEMS_PER_THREAD;
            barrier.wait();
            // May or may not see values, depending on timing
            for i in start..start + ITEMS_PER_THREAD {
                if filter.might_contain(&(i as u64).to_be_bytes()).unwrap() {
                    found_count.fetch_add(1, Ordering::Relaxed);
                }
            }
        }));
    }

    // Start all threads at once
    barrier.wait();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(found_count.load(Ordering::Relaxed) <= THREAD_COUNT * ITEMS_PER_THREAD);
    assert_eq!(filter.current_count(), (THREAD_COUNT * ITEMS_PER_THREAD) as u64);
    for i in 0..THREAD_COUNT * ITEMS_PER_THREAD {
        assert!(
            filter.might_contain(&(i as u64).to_be_bytes()).unwrap(),
            "Value {i} should be in the filter after all threads complete"
        );
    }
}

/// Test high contention scenario where every thread inserts the same values
#[test]
fn test_high_contention() {
    let filter = Arc::new(setup_test_filter());
    let barrier = Arc::new(Barrier::new(THREAD_COUNT + 1));
    const SHARED_VALUE_COUNT: u32 = 100;

    let handles = (0..THREAD_COUNT)
        .map(|_| {
            let filter = Arc::clone(&filter);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..SHARED_VALUE_COUNT {
                    filter.add(&i.to_be_bytes()).unwrap();
                }
            })
        })
        .collect::<Vec<_>>();

    barrier.wait();
    for handle in handles {
        handle.join().unwrap();
    }

    let serial = setup_test_filter();
    for i in 0..SHARED_VALUE_COUNT {
        serial.add(&i.to_be_bytes()).unwrap();
    }

    assert_eq!(filter.words(), serial.words());
    assert_eq!(
        filter.current_count(),
        u64::from(SHARED_VALUE_COUNT) * THREAD_COUNT as u64
    );
}

// Property-based tests
proptest! {
    /// Any inserted element is always reported as possibly present
    #[test]
    fn proptest_no_false_negatives(values in distinct_elements_strategy(200)) {
        let filter = setup_test_filter();

        for val in &values {
            filter.add(val).unwrap();
        }

        for val in &values {
            prop_assert!(filter.might_contain(val).unwrap());
        }
        prop_assert_eq!(filter.current_count(), values.len() as u64);
    }

    /// Two filters with the same parameters agree bit for bit
    #[test]
    fn proptest_deterministic_bits(values in prop::collection::vec(element_strategy(), 1..50)) {
        let first = HokuBloomFilter::with_size(128, 5, 50).unwrap();
        let second = HokuBloomFilter::with_size(128, 5, 50).unwrap();

        for val in &values {
            first.add(val).unwrap();
            second.add(val).unwrap();
        }

        prop_assert_eq!(first.words(), second.words());
    }

    /// Repeating an insertion never changes the bits
    #[test]
    fn proptest_idempotent_bits(value in element_strategy()) {
        let filter = HokuBloomFilter::with_size(64, 4, 10).unwrap();
        filter.add(&value).unwrap();
        let once = filter.words();

        filter.add(&value).unwrap();
        prop_assert_eq!(filter.words(), once);
        prop_assert_eq!(filter.current_count(), 2);
    }

    /// A restored filter answers every query exactly like its source
    #[test]
    fn proptest_restored_filter_answers_alike(
        inserted in prop::collection::vec(element_strategy(), 0..50),
        probes in prop::collection::vec(element_strategy(), 1..50),
    ) {
        let filter = HokuBloomFilter::with_size(64, 3, 20)
            .unwrap()
            .with_observer(Arc::new(NoOpSaturationObserver));
        for val in &inserted {
            filter.add(val).unwrap();
        }

        let restored = HokuBloomFilter::from_bytes(&filter.to_bytes().unwrap()).unwrap();
        for probe in probes.iter().chain(&inserted) {
            prop_assert_eq!(
                restored.might_contain(probe).unwrap(),
                filter.might_contain(probe).unwrap()
            );
        }
        prop_assert_eq!(restored.to_bytes().unwrap(), filter.to_bytes().unwrap());
    }
}
