// Copyright (c) 2025 Hoku Authors
//
// Licensed under dual license:
// - MIT License (LICENSE-MIT or https://opensource.org/licenses/MIT)
// - Apache License, Version 2.0 (LICENSE-APACHE or https://www.apache.org/licenses/LICENSE-2.0)

//! Saturation signalling.
//!
//! Inserting more elements than a filter was sized for is allowed, but the
//! false positive rate then drifts above its target. Each such insertion is
//! reported to the [`SaturationObserver`] the filter was built with.

/// Emitted for every insertion past the defined capacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaturationEvent {
    /// Number of insertions including the one that triggered the event
    pub current_count: u64,

    /// Number of elements the filter was designed for
    pub defined_capacity: u32,

    /// False positive rate the filter was designed for
    pub target_false_positive_rate: f32,

    /// False positive rate predicted for the current load
    pub estimated_false_positive_rate: f64,
}

/// Receives saturation events from a filter.
pub trait SaturationObserver: Send + Sync {
    /// Handle one saturation event.
    ///
    /// # Arguments
    ///
    /// * `event` - Load details at the time of the insertion
    fn on_saturation(&self, event: &SaturationEvent);
}

impl<F> SaturationObserver for F
where
    F: Fn(&SaturationEvent) + Send + Sync,
{
    fn on_saturation(&self, event: &SaturationEvent) {
        self(event)
    }
}

/// Reports saturation as a `tracing` warning.
#[derive(Default, Debug, Clone, Copy)]
pub struct TracingSaturationObserver;

impl SaturationObserver for TracingSaturationObserver {
    fn on_saturation(&self, event: &SaturationEvent) {
        tracing::warn!(
            current_count = event.current_count,
            defined_capacity = event.defined_capacity,
            target_false_positive_rate = event.target_false_positive_rate,
            estimated_false_positive_rate = event.estimated_false_positive_rate,
            "Bloom filter is saturated, false positive rate exceeds its target"
        );
    }
}

/// Discards saturation events.
#[derive(Default, Debug, Clone, Copy)]
pub struct NoOpSaturationObserver;

impl SaturationObserver for NoOpSaturationObserver {
    fn on_saturation(&self, _event: &SaturationEvent) {}
}
