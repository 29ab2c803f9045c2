//! One level of the cache hierarchy.
//!
//! A `CacheLevel` owns its sets, its tag codec, and its counters. It answers
//! single-line questions (probe, install, mark dirty, invalidate) about lines
//! that map into it. Moving a line between levels is the job of
//! [`Hierarchy`](super::Hierarchy), which holds the levels in order and knows
//! which one is next.

use super::codec::TagCodec;
use super::policies::SetArray;
use super::tag::CacheTag;
use crate::common::data::AccessType;
use crate::common::error::ConfigError;
use crate::config::{CacheLevelConfig, ReplacementPolicy};
use crate::sim::context::SimContext;
use crate::stats::{AccessCounters, LevelStats};

/// A set-associative cache level.
#[derive(Debug)]
pub struct CacheLevel {
    name: String,
    size_bytes: usize,
    ways: usize,
    policy: ReplacementPolicy,
    hit_latency: u64,
    miss_latency: u64,
    allocate_on_store_miss: bool,
    codec: TagCodec,
    sets: SetArray,
    requests: AccessCounters,
    lines: AccessCounters,
}

impl CacheLevel {
    /// Validates `config` and builds an empty level.
    pub fn new(config: &CacheLevelConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let num_sets = config.num_sets();
        Ok(Self {
            name: config.name.clone(),
            size_bytes: config.size_bytes,
            ways: config.ways,
            policy: config.policy,
            hit_latency: config.hit_latency,
            miss_latency: config.miss_latency,
            allocate_on_store_miss: config.allocate_on_store_miss,
            codec: TagCodec::new(config.line_bytes, num_sets),
            sets: SetArray::new(config.policy, num_sets, config.ways),
            requests: AccessCounters::default(),
            lines: AccessCounters::default(),
        })
    }

    /// Level name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Capacity in bytes.
    pub const fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Line size in bytes.
    pub const fn line_bytes(&self) -> usize {
        self.codec.line_bytes() as usize
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    /// Replacement policy.
    pub const fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    /// Address codec for this level's geometry.
    pub const fn codec(&self) -> &TagCodec {
        &self.codec
    }

    /// Whether a miss of `access_type` installs the line here.
    #[inline(always)]
    pub const fn allocates(&self, access_type: AccessType) -> bool {
        !access_type.is_store() || self.allocate_on_store_miss
    }

    /// Looks up the line holding `addr` and charges the hit or miss latency to `ctx`.
    ///
    /// A hit updates recency and, for a store, marks the line dirty. Nothing is
    /// installed on a miss.
    #[inline]
    pub fn probe(&mut self, ctx: &mut SimContext, addr: u64, access_type: AccessType) -> bool {
        let split = self.codec.split(addr);
        let hit = self.sets.find(split.set_index, split.tag, access_type);
        ctx.advance(if hit { self.hit_latency } else { self.miss_latency });
        hit
    }

    /// Installs the line holding `addr`, returning the evicted line if the
    /// chosen way was occupied.
    pub fn install(&mut self, addr: u64, access_type: AccessType) -> Option<CacheTag> {
        let split = self.codec.split(addr);
        self.sets.replace(split.set_index, split.tag, access_type)
    }

    /// Marks the resident line holding `addr` dirty. Returns `false` if the line
    /// is not resident.
    pub fn set_dirty(&mut self, addr: u64) -> bool {
        let split = self.codec.split(addr);
        self.sets.set_dirty(split.set_index, split.tag)
    }

    /// Drops the line holding `addr`, returning it if it was resident.
    pub fn invalidate(&mut self, addr: u64) -> Option<CacheTag> {
        let split = self.codec.split(addr);
        self.sets.invalidate(split.set_index, split.tag)
    }

    /// Residency check that leaves recency state untouched.
    pub fn contains(&self, addr: u64) -> bool {
        let split = self.codec.split(addr);
        self.sets.contains(split.set_index, split.tag)
    }

    /// Base address of the line identified by `tag`.
    #[inline(always)]
    pub const fn line_addr(&self, tag: &CacheTag) -> u64 {
        self.codec.recover(tag.tag())
    }

    /// Base addresses of every resident line, in set then way order.
    pub fn resident_lines(&self) -> Vec<u64> {
        self.sets
            .resident()
            .iter()
            .map(|tag| self.line_addr(tag))
            .collect()
    }

    /// Counts one access-level outcome.
    pub const fn record_request(&mut self, access_type: AccessType, hit: bool) {
        self.requests.record(access_type, hit);
    }

    /// Counts one line-level outcome.
    pub const fn record_line(&mut self, access_type: AccessType, hit: bool) {
        self.lines.record(access_type, hit);
    }

    /// Access-level counters.
    pub const fn requests(&self) -> &AccessCounters {
        &self.requests
    }

    /// Line-level counters.
    pub const fn lines(&self) -> &AccessCounters {
        &self.lines
    }

    /// Request hits of `access_type`.
    pub const fn hits(&self, access_type: AccessType) -> u64 {
        self.requests.hits(access_type)
    }

    /// Request misses of `access_type`.
    pub const fn misses(&self, access_type: AccessType) -> u64 {
        self.requests.misses(access_type)
    }

    /// Requests of `access_type`.
    pub const fn accesses(&self, access_type: AccessType) -> u64 {
        self.requests.accesses(access_type)
    }

    /// Zeroes both counter sets; resident lines are kept.
    pub const fn reset_stats(&mut self) {
        self.requests.reset();
        self.lines.reset();
    }

    /// Snapshot of geometry and counters.
    pub fn stats(&self) -> LevelStats {
        LevelStats {
            name: self.name.clone(),
            size_bytes: self.size_bytes,
            line_bytes: self.line_bytes(),
            ways: self.ways,
            policy: self.policy,
            requests: self.requests,
            lines: self.lines,
        }
    }
}
