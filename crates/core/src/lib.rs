//! Trace-driven multi-level cache simulator library.
//!
//! This crate replays memory-access streams through a configurable hierarchy
//! of set-associative caches with the following:
//! 1. **Cache:** Tag codec, replacement policies, cache levels, and the inclusive hierarchy.
//! 2. **Memory:** Backing store with a per-epoch footprint tracker and an event stream.
//! 3. **Simulation:** Clock, trace reader, and the epoch-aware driver.
//! 4. **Configuration and statistics:** JSON configuration and counter reports.

/// Set-associative caches (codec, tags, policies, levels, hierarchy).
pub mod cache;
/// Common types and constants (addresses, access types, errors).
pub mod common;
/// Simulator configuration (defaults, policies, level and memory settings).
pub mod config;
/// Backing store, footprint tracker, and memory events.
pub mod memory;
/// Simulation clock, trace reader, and driver.
pub mod sim;
/// Statistics snapshots and reporting.
pub mod stats;

/// Ordered cache levels over the backing store; build with `Hierarchy::new`.
pub use crate::cache::Hierarchy;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Trace replay driver; owns a hierarchy and its clock.
pub use crate::sim::Simulator;
