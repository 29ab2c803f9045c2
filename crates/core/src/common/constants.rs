//! Global Simulator Constants.
//!
//! This module defines limits that configuration validation enforces and the
//! byte-size units used by the default configuration.

/// One kibibyte.
pub const KIB: usize = 1024;

/// One mebibyte.
pub const MIB: usize = KIB * KIB;

/// Maximum number of ways a single cache set may hold.
///
/// Configurations asking for more ways are rejected with
/// [`ConfigError::TooManyWays`](crate::common::ConfigError::TooManyWays).
pub const MAX_ASSOCIATIVITY: usize = 256;

/// Number of access types tracked by the per-level counters (load, store).
pub const ACCESS_TYPE_COUNT: usize = 2;
