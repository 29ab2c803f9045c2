//! Common types shared by every part of the cache simulator.
//!
//! This module provides the building blocks that the cache levels, the
//! backing store, and the trace driver all agree on:
//! 1. **Address Types:** A line-address newtype for backing-store traffic.
//! 2. **Constants:** Compile-time limits and the byte-size units.
//! 3. **Memory Access:** The load/store classification and the access request type.
//! 4. **Error Handling:** Configuration, consistency, and trace errors.

/// Line address type.
pub mod addr;

/// Compile-time limits and units.
pub mod constants;

/// Memory access type definitions.
pub mod data;

/// Error taxonomy.
pub mod error;

pub use addr::LineAddr;
pub use constants::{KIB, MAX_ASSOCIATIVITY, MIB};
pub use data::{AccessType, MemAccess};
pub use error::{ConfigError, SimError, TraceError};
