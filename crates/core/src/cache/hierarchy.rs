//! Inclusive multi-level cache hierarchy.
//!
//! Levels are held top first in a `Vec`; the level below `k` is `k + 1` and
//! the last level is backed by the [`BackingStore`]. A request enters at the
//! top, is split into the lines it spans, and each line is propagated down
//! until some level hits or memory supplies it.
//!
//! Miss handling at level `k`, when the access type allocates there:
//! 1. Install the line, possibly evicting a victim.
//! 2. Invalidate the victim in every level above `k`. An upper copy that was
//!    dirty makes the victim dirty.
//! 3. A dirty victim is marked dirty in level `k + 1` (or written back to
//!    memory when `k` is the last level).
//! 4. The requested line is fetched from level `k + 1` (or memory).
//!
//! Step 2 keeps the hierarchy inclusive: every line resident in level `k` is
//! also resident in `k + 1`, so step 3 always finds the victim below.

use tracing::{error, info, trace};

use super::level::CacheLevel;
use super::tag::CacheTag;
use crate::common::data::{AccessType, MemAccess};
use crate::common::error::{ConfigError, SimError};
use crate::config::Config;
use crate::memory::BackingStore;
use crate::memory::events::{EventSink, NullSink};
use crate::memory::footprint::EpochReport;
use crate::sim::context::SimContext;
use crate::stats::HierarchyStats;

/// Ordered cache levels over a backing store.
#[derive(Debug)]
pub struct Hierarchy<S = NullSink> {
    levels: Vec<CacheLevel>,
    memory: BackingStore<S>,
}

impl Hierarchy<NullSink> {
    /// Builds a hierarchy that discards backing-store events.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_sink(config, NullSink)
    }
}

impl<S: EventSink> Hierarchy<S> {
    /// Validates `config` and builds the levels, handing backing-store events to `sink`.
    pub fn with_sink(config: &Config, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let levels = config
            .levels
            .iter()
            .map(CacheLevel::new)
            .collect::<Result<Vec<_>, _>>()?;
        let line_bytes = levels.first().map_or(0, CacheLevel::line_bytes);
        for level in &levels {
            info!(
                level = level.name(),
                size_bytes = level.size_bytes(),
                line_bytes = level.line_bytes(),
                ways = level.ways(),
                sets = level.num_sets(),
                policy = ?level.policy(),
                "built cache level"
            );
        }
        Ok(Self {
            levels,
            memory: BackingStore::new(&config.memory, line_bytes, sink),
        })
    }

    /// Simulates one access entering at the top level.
    ///
    /// Returns `true` iff every line the access spans hit in the top level.
    /// The outcome is counted once in the top level's request counters.
    pub fn access(&mut self, ctx: &mut SimContext, access: MemAccess) -> Result<bool, SimError> {
        let lines = self.levels[0].codec().lines(access.addr, access.size);
        let mut all_hit = true;
        for line in lines {
            all_hit &= self.access_single_line(ctx, 0, line, access.access_type)?;
        }
        self.levels[0].record_request(access.access_type, all_hit);
        Ok(all_hit)
    }

    /// Simulates a single-line access at level `k`, propagating misses downward.
    ///
    /// Returns whether level `k` hit. Levels below `k` that are consulted on a
    /// miss count the probe in their own line counters.
    pub fn access_single_line(
        &mut self,
        ctx: &mut SimContext,
        k: usize,
        addr: u64,
        access_type: AccessType,
    ) -> Result<bool, SimError> {
        let level = self.level_mut(k)?;
        let hit = level.probe(ctx, addr, access_type);
        level.record_line(access_type, hit);

        if hit || !level.allocates(access_type) {
            return Ok(hit);
        }

        let victim = level
            .install(addr, access_type)
            .map(|victim| self.evict_from_above(k, victim));

        if k + 1 < self.levels.len() {
            if let Some(victim) = victim.filter(CacheTag::is_dirty) {
                let victim_addr = self.levels[k].line_addr(&victim);
                self.set_dirty(k + 1, victim_addr)?;
            }
            let _ = self.access_single_line(ctx, k + 1, addr, access_type)?;
        } else {
            self.memory.fill(ctx, addr, access_type);
            if let Some(victim) = victim.filter(CacheTag::is_dirty) {
                let victim_addr = self.levels[k].line_addr(&victim);
                self.memory.write_back(ctx, victim_addr);
            }
        }

        Ok(hit)
    }

    /// Marks the line at `addr` dirty in level `k`.
    ///
    /// Fails with [`SimError::ConsistencyViolation`] if level `k` does not
    /// hold the line; with inclusion maintained this never happens for a
    /// victim written back from level `k - 1`.
    pub fn set_dirty(&mut self, k: usize, addr: u64) -> Result<(), SimError> {
        let level = self.level_mut(k)?;
        if level.set_dirty(addr) {
            return Ok(());
        }
        error!(level = level.name(), addr = format_args!("{addr:#x}"), "write-back target not resident");
        Err(SimError::ConsistencyViolation {
            level: level.name().to_string(),
            addr,
        })
    }

    fn level_mut(&mut self, k: usize) -> Result<&mut CacheLevel, SimError> {
        let levels = self.levels.len();
        self.levels
            .get_mut(k)
            .ok_or(SimError::NoSuchLevel { index: k, levels })
    }

    /// Drops `victim` (evicted from level `k`) from every level above `k`,
    /// folding the dirty bits of the dropped copies into the returned victim.
    fn evict_from_above(&mut self, k: usize, victim: CacheTag) -> CacheTag {
        let addr = self.levels[k].line_addr(&victim);
        let mut dirty = victim.is_dirty();
        for upper in &mut self.levels[..k] {
            if let Some(copy) = upper.invalidate(addr) {
                trace!(level = upper.name(), addr = format_args!("{addr:#x}"), dirty = copy.is_dirty(), "back-invalidated");
                dirty |= copy.is_dirty();
            }
        }
        trace!(level = self.levels[k].name(), addr = format_args!("{addr:#x}"), dirty, "evicted");
        CacheTag::with_state(victim.tag(), true, dirty)
    }

    /// Returns `true` iff every line resident in each level is resident in the
    /// level below it.
    pub fn is_inclusive(&self) -> bool {
        self.levels.windows(2).all(|pair| {
            pair[0]
                .resident_lines()
                .into_iter()
                .all(|addr| pair[1].contains(addr))
        })
    }

    /// Cache levels, top first.
    pub fn levels(&self) -> &[CacheLevel] {
        &self.levels
    }

    /// Level `k`, if it exists.
    pub fn level(&self, k: usize) -> Option<&CacheLevel> {
        self.levels.get(k)
    }

    /// Level whose name is `name`.
    pub fn level_by_name(&self, name: &str) -> Option<&CacheLevel> {
        self.levels.iter().find(|level| level.name() == name)
    }

    /// Backing store below the last level.
    pub const fn memory(&self) -> &BackingStore<S> {
        &self.memory
    }

    /// Closes the footprint epoch if `ctx` has moved past it and returns
    /// every epoch report closed since the last call.
    pub fn take_ended_epochs(&mut self, ctx: &SimContext) -> Vec<EpochReport> {
        self.memory.sync_epoch(ctx);
        self.memory.take_ended_epochs()
    }

    /// Zeroes every level's hit/miss counters; resident lines are kept.
    pub fn reset_stats(&mut self) {
        for level in &mut self.levels {
            level.reset_stats();
        }
    }

    /// Event sink.
    pub const fn sink(&self) -> &S {
        self.memory.sink()
    }

    /// Mutable event sink.
    pub const fn sink_mut(&mut self) -> &mut S {
        self.memory.sink_mut()
    }

    /// Consumes the hierarchy, returning the event sink.
    pub fn into_sink(self) -> S {
        self.memory.into_sink()
    }

    /// Snapshot of every counter, stamped with the clock in `ctx`.
    pub fn stats(&self, ctx: &SimContext) -> HierarchyStats {
        HierarchyStats {
            levels: self.levels.iter().map(CacheLevel::stats).collect(),
            memory: self.memory.stats(),
            footprint: self.memory.footprint().stats(),
            cycles: ctx.cycles(),
        }
    }
}
