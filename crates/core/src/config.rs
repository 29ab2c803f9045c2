//! Configuration system for the cache simulator.
//!
//! This module defines all configuration structures and enums used to parameterize
//! the simulator. It provides:
//! 1. **Defaults:** Baseline geometry for a two-level L1/L2 hierarchy and the backing store.
//! 2. **Structures:** Per-level cache config and backing-store (footprint) config.
//! 3. **Validation:** Power-of-two and tiling checks, run once before any access is simulated.
//!
//! Configuration is supplied as JSON (the CLI's `--config` flag) or built with `Config::default()`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::constants::{KIB, MAX_ASSOCIATIVITY, MIB};
use crate::common::error::ConfigError;

/// Default configuration constants for the simulator.
mod defaults {
    use super::{KIB, MIB};

    /// Default cache size in bytes for a level without an explicit size (32 KiB).
    pub const CACHE_SIZE: usize = 32 * KIB;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: usize = 64;

    /// Default associativity of an unspecified level (direct-mapped).
    pub const CACHE_WAYS: usize = 1;

    /// Default hit latency weight in cycles.
    pub const HIT_LATENCY: u64 = 1;

    /// Default miss latency weight in cycles.
    pub const MISS_LATENCY: u64 = 4;

    /// L1 data cache size in the default hierarchy.
    pub const L1_SIZE: usize = 32 * KIB;

    /// L1 associativity in the default hierarchy.
    pub const L1_WAYS: usize = 4;

    /// L2 cache size in the default hierarchy.
    pub const L2_SIZE: usize = MIB;

    /// L2 associativity in the default hierarchy.
    pub const L2_WAYS: usize = 8;

    /// L2 hit latency weight in cycles.
    pub const L2_HIT_LATENCY: u64 = 4;

    /// L2 miss latency weight in cycles (main memory round trip).
    pub const L2_MISS_LATENCY: u64 = 150;

    /// Footprint page size in bytes (4 KiB).
    pub const PAGE_SIZE: u64 = 4096;

    /// Epoch length in cycles.
    pub const EPOCH_LENGTH: u64 = 500_000_000;

    /// Sub-region counters per page.
    pub const MICRO_PAGES: usize = 4;

    /// Hash buckets in the footprint page table.
    pub const BUCKETS: usize = 32 * KIB;
}

/// Cache replacement policy algorithms.
///
/// Selected once per level at configuration time; every set in the level uses
/// the same variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReplacementPolicy {
    /// Single-way sets; the resident line is always the victim.
    #[serde(alias = "DIRECT_MAPPED", alias = "Direct")]
    DirectMapped,
    /// Fixed cyclic victim pointer that walks the ways downward.
    #[serde(alias = "ROUND_ROBIN", alias = "Fifo")]
    RoundRobin,
    /// True least-recently-used replacement.
    #[default]
    #[serde(rename = "LRU", alias = "Lru")]
    Lru,
}

/// Root configuration structure containing all simulator settings.
///
/// # Examples
///
/// Creating a default configuration:
///
/// ```
/// use cachesim_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.levels.len(), 2);
/// assert_eq!(config.levels[0].size_bytes, 32 * 1024);
/// assert!(config.validate().is_ok());
/// ```
///
/// Deserializing from JSON:
///
/// ```
/// use cachesim_core::config::{Config, ReplacementPolicy};
///
/// let json = r#"{
///     "levels": [
///         { "name": "L1", "size_bytes": 4096, "line_bytes": 64, "ways": 2,
///           "policy": "RoundRobin", "hit_latency": 1, "miss_latency": 10 },
///         { "name": "L2", "size_bytes": 65536, "line_bytes": 64, "ways": 8 }
///     ],
///     "memory": { "page_size": 8192, "epoch_length": 1000000 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.levels[0].policy, ReplacementPolicy::RoundRobin);
/// assert_eq!(config.levels[1].policy, ReplacementPolicy::Lru);
/// assert_eq!(config.memory.page_size, 8192);
/// assert_eq!(config.memory.micro_pages, 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Cache levels, top (closest to the access stream) first.
    pub levels: Vec<CacheLevelConfig>,
    /// Backing-store and footprint settings
    #[serde(default)]
    pub memory: MemoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            levels: vec![
                CacheLevelConfig {
                    name: "L1".to_string(),
                    size_bytes: defaults::L1_SIZE,
                    ways: defaults::L1_WAYS,
                    ..CacheLevelConfig::default()
                },
                CacheLevelConfig {
                    name: "L2".to_string(),
                    size_bytes: defaults::L2_SIZE,
                    ways: defaults::L2_WAYS,
                    hit_latency: defaults::L2_HIT_LATENCY,
                    miss_latency: defaults::L2_MISS_LATENCY,
                    ..CacheLevelConfig::default()
                },
            ],
            memory: MemoryConfig::default(),
        }
    }
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// Only the syntax is checked here; call [`Config::validate`] (or build a
    /// [`Hierarchy`](crate::cache::Hierarchy), which validates) for the geometry.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))
    }

    /// Validates every level, the relations between adjacent levels, and the
    /// backing-store settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Some(top) = self.levels.first() else {
            return Err(ConfigError::NoLevels);
        };

        for level in &self.levels {
            level.validate()?;
            if level.line_bytes != top.line_bytes {
                return Err(ConfigError::LineSizeMismatch {
                    level: level.name.clone(),
                    line_bytes: level.line_bytes,
                    expected: top.line_bytes,
                });
            }
        }

        for pair in self.levels.windows(2) {
            let (upper, lower) = (&pair[0], &pair[1]);
            if upper.allocate_on_store_miss && !lower.allocate_on_store_miss {
                return Err(ConfigError::AllocationOrder {
                    upper: upper.name.clone(),
                    lower: lower.name.clone(),
                });
            }
        }

        self.memory.validate()
    }
}

/// Configuration of a single cache level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    /// Level name used in reports and errors (e.g. `"L1"`)
    pub name: String,

    /// Total cache size in bytes
    #[serde(default = "CacheLevelConfig::default_size")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheLevelConfig::default_line")]
    pub line_bytes: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheLevelConfig::default_ways")]
    pub ways: usize,

    /// Replacement policy
    #[serde(default)]
    pub policy: ReplacementPolicy,

    /// Cycles charged to the simulation clock for a hit at this level
    #[serde(default = "CacheLevelConfig::default_hit_latency")]
    pub hit_latency: u64,

    /// Cycles charged to the simulation clock for a miss at this level
    #[serde(default = "CacheLevelConfig::default_miss_latency")]
    pub miss_latency: u64,

    /// Install the line on a store miss (write-allocate); loads always allocate
    #[serde(default = "CacheLevelConfig::default_allocate")]
    pub allocate_on_store_miss: bool,
}

impl CacheLevelConfig {
    /// Returns the default cache size in bytes.
    fn default_size() -> usize {
        defaults::CACHE_SIZE
    }

    /// Returns the default cache line size in bytes.
    fn default_line() -> usize {
        defaults::CACHE_LINE
    }

    /// Returns the default cache associativity (number of ways).
    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_hit_latency() -> u64 {
        defaults::HIT_LATENCY
    }

    fn default_miss_latency() -> u64 {
        defaults::MISS_LATENCY
    }

    fn default_allocate() -> bool {
        true
    }

    /// Number of sets implied by the geometry.
    ///
    /// Only meaningful once [`CacheLevelConfig::validate`] has succeeded.
    pub const fn num_sets(&self) -> usize {
        self.size_bytes / (self.line_bytes * self.ways)
    }

    /// Validates this level's geometry in isolation.
    ///
    /// Checks, in order: non-zero size/line/ways, power-of-two line size, the
    /// associativity limit, the direct-mapped way count, exact tiling of the
    /// size into sets, and a power-of-two set count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check_geometry();
        if let Err(ref e) = result {
            debug!(level = %self.name, error = %e, "rejected cache level configuration");
        }
        result
    }

    fn check_geometry(&self) -> Result<(), ConfigError> {
        let level = || self.name.clone();

        for (field, value) in [
            ("size_bytes", self.size_bytes),
            ("line_bytes", self.line_bytes),
            ("ways", self.ways),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSized {
                    level: level(),
                    field,
                });
            }
        }

        if !self.line_bytes.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                level: level(),
                field: "line_bytes",
                value: self.line_bytes as u64,
            });
        }

        if self.ways > MAX_ASSOCIATIVITY {
            return Err(ConfigError::TooManyWays {
                level: level(),
                ways: self.ways,
                max: MAX_ASSOCIATIVITY,
            });
        }

        if self.policy == ReplacementPolicy::DirectMapped && self.ways != 1 {
            return Err(ConfigError::DirectMappedWays {
                level: level(),
                ways: self.ways,
            });
        }

        let tiles = self
            .line_bytes
            .checked_mul(self.ways)
            .is_some_and(|set_bytes| self.size_bytes % set_bytes == 0 && self.size_bytes >= set_bytes);
        if !tiles {
            return Err(ConfigError::InvalidGeometry {
                level: level(),
                detail: format!(
                    "{} bytes is not a whole number of {}-way sets of {}-byte lines",
                    self.size_bytes, self.ways, self.line_bytes
                ),
            });
        }

        let num_sets = self.num_sets();
        if !num_sets.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                level: level(),
                field: "num_sets",
                value: num_sets as u64,
            });
        }

        Ok(())
    }
}

impl Default for CacheLevelConfig {
    /// Creates a default level: 32 KiB, 64-byte lines, direct-mapped
    /// associativity, LRU selector, write-allocate.
    fn default() -> Self {
        Self {
            name: "L1".to_string(),
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            policy: ReplacementPolicy::default(),
            hit_latency: defaults::HIT_LATENCY,
            miss_latency: defaults::MISS_LATENCY,
            allocate_on_store_miss: true,
        }
    }
}

/// Backing-store configuration: footprint tracking and event emission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Page size in bytes used by the footprint tracker
    #[serde(default = "MemoryConfig::default_page_size")]
    pub page_size: u64,

    /// Epoch length in cycles; footprint counters are bucketed per epoch
    #[serde(default = "MemoryConfig::default_epoch_length")]
    pub epoch_length: u64,

    /// Sub-region counters per page
    #[serde(default = "MemoryConfig::default_micro_pages")]
    pub micro_pages: usize,

    /// Hash buckets in the page table
    #[serde(default = "MemoryConfig::default_buckets")]
    pub buckets: usize,

    /// Backing-store events are only emitted once the clock has passed this cycle
    #[serde(default)]
    pub warmup_cycles: u64,
}

impl MemoryConfig {
    fn default_page_size() -> u64 {
        defaults::PAGE_SIZE
    }

    fn default_epoch_length() -> u64 {
        defaults::EPOCH_LENGTH
    }

    fn default_micro_pages() -> usize {
        defaults::MICRO_PAGES
    }

    fn default_buckets() -> usize {
        defaults::BUCKETS
    }

    /// Validates the footprint geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let memory = || "memory".to_string();

        if self.epoch_length == 0 {
            return Err(ConfigError::ZeroSized {
                level: memory(),
                field: "epoch_length",
            });
        }

        for (field, value) in [
            ("page_size", self.page_size),
            ("micro_pages", self.micro_pages as u64),
            ("buckets", self.buckets as u64),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroSized {
                    level: memory(),
                    field,
                });
            }
            if !value.is_power_of_two() {
                return Err(ConfigError::NotPowerOfTwo {
                    level: memory(),
                    field,
                    value,
                });
            }
        }

        if self.micro_pages as u64 > self.page_size {
            return Err(ConfigError::InvalidGeometry {
                level: memory(),
                detail: format!(
                    "{} micro-pages do not fit in a {}-byte page",
                    self.micro_pages, self.page_size
                ),
            });
        }

        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            page_size: defaults::PAGE_SIZE,
            epoch_length: defaults::EPOCH_LENGTH,
            micro_pages: defaults::MICRO_PAGES,
            buckets: defaults::BUCKETS,
            warmup_cycles: 0,
        }
    }
}
