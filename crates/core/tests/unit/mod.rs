//! # Unit Components
//!
//! Tests grouped by the component they exercise: configuration, the cache
//! side (codec, policies, levels, hierarchy), the backing store, the
//! simulation driver, and the statistics report.

/// Cache codec, set policies, levels, and hierarchy propagation.
pub mod cache;


/// Footprint tracker and backing-store events.
pub mod memory;


/// Statistics snapshots and the text report.
pub mod stats;
