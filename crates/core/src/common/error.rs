//! Error definitions.
//!
//! This module defines the error taxonomy of the simulator. It provides:
//! 1. **Configuration Errors:** Invalid geometry or inconsistent levels, raised once at construction.
//! 2. **Consistency Violations:** A broken inclusion invariant discovered while propagating a write-back.
//! 3. **Trace Errors:** I/O and parse failures while reading an access trace.
//! 4. **Sink Errors:** Deferred write failures of the backing-store event stream.
//!
//! An ordinary cache miss is not an error. It is reported through the boolean
//! hit/miss return values on the hot path.

use std::io;

use thiserror::Error;

/// Error raised while validating a [`Config`](crate::config::Config).
///
/// Configuration errors are fatal and never retried; they are reported before
/// any access is simulated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The hierarchy has no cache levels.
    #[error("cache hierarchy must contain at least one level")]
    NoLevels,

    /// A size or count that must be non-zero is zero.
    #[error("{level}: {field} must be non-zero")]
    ZeroSized {
        /// Level name (or `memory` for backing-store settings).
        level: String,
        /// Offending field.
        field: &'static str,
    },

    /// A size or count that must be a power of two is not.
    #[error("{level}: {field} = {value} is not a power of two")]
    NotPowerOfTwo {
        /// Level name (or `memory` for backing-store settings).
        level: String,
        /// Offending field.
        field: &'static str,
        /// Configured value.
        value: u64,
    },

    /// The level's size, line size, and associativity do not tile into whole sets.
    #[error("{level}: invalid geometry: {detail}")]
    InvalidGeometry {
        /// Level name.
        level: String,
        /// Human-readable reason.
        detail: String,
    },

    /// The level asks for more ways than a set can hold.
    #[error("{level}: associativity {ways} exceeds the maximum of {max} ways")]
    TooManyWays {
        /// Level name.
        level: String,
        /// Configured associativity.
        ways: usize,
        /// Supported maximum.
        max: usize,
    },

    /// A direct-mapped level was configured with more than one way.
    #[error("{level}: direct-mapped sets hold exactly one way, got {ways}")]
    DirectMappedWays {
        /// Level name.
        level: String,
        /// Configured associativity.
        ways: usize,
    },

    /// Levels disagree on line size.
    #[error("{level}: line size {line_bytes} differs from the top level's {expected}")]
    LineSizeMismatch {
        /// Level name.
        level: String,
        /// Configured line size.
        line_bytes: usize,
        /// Line size of the top level.
        expected: usize,
    },

    /// A store-allocating level sits above a level that does not allocate on stores.
    #[error("{upper} allocates on store misses but the level below it, {lower}, does not")]
    AllocationOrder {
        /// Store-allocating upper level.
        upper: String,
        /// Non-allocating lower level.
        lower: String,
    },

    /// The configuration document could not be parsed.
    #[error("malformed configuration: {0}")]
    Json(String),
}

/// Error raised while simulating.
#[derive(Debug, Error)]
pub enum SimError {
    /// The hierarchy could not be built.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A lower level did not hold a line that an upper level wrote back.
    ///
    /// This indicates a defect in eviction/propagation ordering, never a
    /// data-dependent condition.
    #[error("inclusion invariant violated: {level} does not hold line {addr:#x} written back from above")]
    ConsistencyViolation {
        /// Name of the level that was expected to hold the line.
        level: String,
        /// Line base address.
        addr: u64,
    },

    /// A level index past the bottom of the hierarchy.
    #[error("no cache level {index}: the hierarchy has {levels}")]
    NoSuchLevel {
        /// Requested level index.
        index: usize,
        /// Number of levels in the hierarchy.
        levels: usize,
    },

    /// The access trace could not be read.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// The backing-store event sink failed to write.
    #[error("event sink write failed: {0}")]
    EventSink(#[source] io::Error),
}

/// Error raised while reading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// Underlying read failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] io::Error),

    /// A trace line could not be parsed.
    #[error("trace line {line}: {detail}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Human-readable reason.
        detail: String,
    },
}
