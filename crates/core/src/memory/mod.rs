//! Backing store (main memory) at the bottom of the hierarchy.
//!
//! This module models the final sink of cache traffic. It provides:
//! 1. **Footprint:** A hashed page table approximating the working set per epoch.
//! 2. **Events:** The `(delta, type, line address)` stream handed to downstream consumers.
//! 3. **BackingStore:** Glue that stamps each access with the simulation clock and applies the warm-up threshold.
//!
//! Epochs close where pages are stamped: an access whose clock has moved past
//! the footprint's epoch first closes that epoch, and the report is queued
//! until the driver takes it.

/// Backing-store event types and sinks.
pub mod events;

/// Hashed per-page footprint tracker.
pub mod footprint;

use serde::Serialize;
use tracing::debug;

use self::events::{EventSink, MemoryEvent};
use self::footprint::{EpochReport, FootprintTracker};
use crate::common::addr::LineAddr;
use crate::common::data::AccessType;
use crate::config::MemoryConfig;
use crate::sim::context::SimContext;

/// Backing-store traffic counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BackingStats {
    /// Line fills (loads) that reached memory.
    pub reads: u64,
    /// Line writes that reached memory, write-backs included.
    pub writes: u64,
    /// Dirty victims written back by the last cache level.
    pub write_backs: u64,
    /// Accesses at or before the warm-up threshold (no event emitted).
    pub before_warmup: u64,
    /// Accesses after the warm-up threshold (one event each).
    pub after_warmup: u64,
}

/// Main memory: footprint tracker plus event emission.
#[derive(Debug)]
pub struct BackingStore<S> {
    footprint: FootprintTracker,
    sink: S,
    line_bytes: u64,
    warmup_cycles: u64,
    last_access_cycle: u64,
    ended_epochs: Vec<EpochReport>,
    stats: BackingStats,
}

impl<S: EventSink> BackingStore<S> {
    /// Builds an empty backing store for `line_bytes`-byte lines.
    pub fn new(config: &MemoryConfig, line_bytes: usize, sink: S) -> Self {
        Self {
            footprint: FootprintTracker::new(config),
            sink,
            line_bytes: line_bytes as u64,
            warmup_cycles: config.warmup_cycles,
            last_access_cycle: 0,
            ended_epochs: Vec::new(),
            stats: BackingStats::default(),
        }
    }

    /// Records a line brought in from memory for an access of `access_type` at `addr`.
    pub fn fill(&mut self, ctx: &SimContext, addr: u64, access_type: AccessType) {
        self.access(ctx, addr, access_type);
    }

    /// Records a dirty victim written back to memory.
    pub fn write_back(&mut self, ctx: &SimContext, line_addr: u64) {
        self.stats.write_backs += 1;
        debug!(addr = format_args!("{line_addr:#x}"), cycle = ctx.cycles(), "write-back to memory");
        self.access(ctx, line_addr, AccessType::Store);
    }

    fn access(&mut self, ctx: &SimContext, addr: u64, access_type: AccessType) {
        let now = ctx.cycles();
        match access_type {
            AccessType::Load => self.stats.reads += 1,
            AccessType::Store => self.stats.writes += 1,
        }
        self.sync_epoch(ctx);
        self.footprint.access(addr, access_type, ctx.epoch());

        if now > self.warmup_cycles {
            self.stats.after_warmup += 1;
            // Back-to-back accesses on the same cycle are one cycle apart.
            self.sink.record(MemoryEvent {
                delta: (now - self.last_access_cycle).max(1),
                access_type,
                line_addr: LineAddr::containing(addr, self.line_bytes),
            });
        } else {
            self.stats.before_warmup += 1;
        }
        self.last_access_cycle = now;
    }

    /// Footprint tracker.
    pub const fn footprint(&self) -> &FootprintTracker {
        &self.footprint
    }

    /// Closes the footprint's epoch if the clock has moved past it.
    pub fn sync_epoch(&mut self, ctx: &SimContext) {
        if let Some(report) = self.footprint.roll_over(ctx.epoch()) {
            self.ended_epochs.push(report);
        }
    }

    /// Removes and returns the reports of closed epochs, oldest first.
    pub fn take_ended_epochs(&mut self) -> Vec<EpochReport> {
        std::mem::take(&mut self.ended_epochs)
    }

    /// Traffic counters.
    pub const fn stats(&self) -> BackingStats {
        self.stats
    }

    /// Event sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutable event sink.
    pub const fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consumes the store, returning the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }
}
