//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters a run produces. It provides:
//! 1. **Access counters:** Hits and misses split by access type, kept per level.
//! 2. **Level snapshot:** Geometry plus request-level and line-level counters.
//! 3. **Hierarchy snapshot:** Every level, the backing store, and the footprint totals.
//! 4. **Reporting:** A fixed-width text report (`Display`) and JSON (`Serialize`).
//!
//! Request-level counters see one outcome per access fed to the top of the
//! hierarchy (a hit only if every line it spans hit). Line-level counters see
//! one outcome per line probe, so an access spanning three lines adds three.

use std::fmt;

use serde::Serialize;

use crate::common::constants::ACCESS_TYPE_COUNT;
use crate::common::data::AccessType;
use crate::config::ReplacementPolicy;
use crate::memory::BackingStats;
use crate::memory::footprint::FootprintStats;

/// Hit and miss counts split by access type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccessCounters {
    /// Hits, indexed by [`AccessType::index`].
    pub hits: [u64; ACCESS_TYPE_COUNT],
    /// Misses, indexed by [`AccessType::index`].
    pub misses: [u64; ACCESS_TYPE_COUNT],
}

impl AccessCounters {
    /// Counts one outcome.
    #[inline(always)]
    pub const fn record(&mut self, access_type: AccessType, hit: bool) {
        let i = access_type.index();
        if hit {
            self.hits[i] += 1;
        } else {
            self.misses[i] += 1;
        }
    }

    /// Hits of `access_type`.
    pub const fn hits(&self, access_type: AccessType) -> u64 {
        self.hits[access_type.index()]
    }

    /// Misses of `access_type`.
    pub const fn misses(&self, access_type: AccessType) -> u64 {
        self.misses[access_type.index()]
    }

    /// Hits plus misses of `access_type`.
    pub const fn accesses(&self, access_type: AccessType) -> u64 {
        self.hits(access_type) + self.misses(access_type)
    }

    /// Hits over both access types.
    pub fn total_hits(&self) -> u64 {
        self.hits.iter().sum()
    }

    /// Misses over both access types.
    pub fn total_misses(&self) -> u64 {
        self.misses.iter().sum()
    }

    /// Accesses over both access types.
    pub fn total_accesses(&self) -> u64 {
        self.total_hits() + self.total_misses()
    }

    /// Fraction of accesses that hit, or `0.0` before any access.
    pub fn hit_rate(&self) -> f64 {
        ratio(self.total_hits(), self.total_accesses())
    }

    /// Zeroes every counter.
    pub const fn reset(&mut self) {
        *self = Self {
            hits: [0; ACCESS_TYPE_COUNT],
            misses: [0; ACCESS_TYPE_COUNT],
        };
    }
}

/// Snapshot of one cache level.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LevelStats {
    /// Level name.
    pub name: String,
    /// Capacity in bytes.
    pub size_bytes: usize,
    /// Line size in bytes.
    pub line_bytes: usize,
    /// Associativity.
    pub ways: usize,
    /// Replacement policy.
    pub policy: ReplacementPolicy,
    /// One outcome per access entering this level.
    pub requests: AccessCounters,
    /// One outcome per line probe at this level.
    pub lines: AccessCounters,
}

/// Snapshot of the whole hierarchy after (or during) a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HierarchyStats {
    /// Cache levels, top first.
    pub levels: Vec<LevelStats>,
    /// Backing-store traffic.
    pub memory: BackingStats,
    /// Footprint tracker totals.
    pub footprint: FootprintStats,
    /// Simulation clock at the time of the snapshot.
    pub cycles: u64,
}

impl HierarchyStats {
    /// Serializes the snapshot as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

const HEADER_WIDTH: usize = 19;
const NUMBER_WIDTH: usize = 12;

fn counter_line(
    f: &mut fmt::Formatter<'_>,
    prefix: &str,
    label: &str,
    value: u64,
    whole: u64,
) -> fmt::Result {
    writeln!(
        f,
        "{prefix}{label:<HEADER_WIDTH$}{value:>NUMBER_WIDTH$}  {:>6.2}%",
        100.0 * ratio(value, whole)
    )
}

fn write_counters(f: &mut fmt::Formatter<'_>, prefix: &str, counters: &AccessCounters) -> fmt::Result {
    for ty in AccessType::ALL {
        let whole = counters.accesses(ty);
        let label = ty.label();
        counter_line(f, prefix, &format!("{label}-Hits:"), counters.hits(ty), whole)?;
        counter_line(f, prefix, &format!("{label}-Misses:"), counters.misses(ty), whole)?;
        counter_line(f, prefix, &format!("{label}-Accesses:"), whole, whole)?;
        writeln!(f, "{prefix}")?;
    }
    let whole = counters.total_accesses();
    counter_line(f, prefix, "Total-Hits:", counters.total_hits(), whole)?;
    counter_line(f, prefix, "Total-Misses:", counters.total_misses(), whole)?;
    counter_line(f, prefix, "Total-Accesses:", whole, whole)
}

impl fmt::Display for LevelStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {}: {} bytes, {}-byte lines, {} ways, {:?}",
            self.name, self.size_bytes, self.line_bytes, self.ways, self.policy
        )?;
        writeln!(f, "# requests")?;
        write_counters(f, "#   ", &self.requests)?;
        writeln!(f, "# lines")?;
        write_counters(f, "#   ", &self.lines)
    }
}

impl fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==========================================================")?;
        writeln!(f, "CACHE HIERARCHY")?;
        for level in &self.levels {
            writeln!(f, "----------------------------------------------------------")?;
            write!(f, "{level}")?;
        }
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "BACKING STORE")?;
        writeln!(f, "  mem.reads              {}", self.memory.reads)?;
        writeln!(f, "  mem.writes             {}", self.memory.writes)?;
        writeln!(f, "  mem.write_backs        {}", self.memory.write_backs)?;
        writeln!(f, "  mem.events             {}", self.memory.after_warmup)?;
        writeln!(f, "  mem.warmup_accesses    {}", self.memory.before_warmup)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "FOOTPRINT")?;
        writeln!(f, "  pages.total            {}", self.footprint.total_pages)?;
        writeln!(f, "  pages.epoch            {}", self.footprint.epoch_pages)?;
        writeln!(f, "  accesses.total         {}", self.footprint.total_accesses)?;
        writeln!(f, "  accesses.epoch         {}", self.footprint.epoch_accesses)?;
        writeln!(f, "  accesses.stores        {}", self.footprint.total_stores)?;
        writeln!(f, "----------------------------------------------------------")?;
        writeln!(f, "  sim.cycles             {}", self.cycles)?;
        writeln!(f, "==========================================================")
    }
}
