//! Memory Access Types.
//!
//! This module defines the classification of memory accesses consumed by the
//! simulator. These types are used for the following:
//! 1. **Dirty Tracking:** Stores mark resident lines dirty; loads leave them clean.
//! 2. **Allocation:** Loads always allocate on a miss, stores only when the level allows it.
//! 3. **Statistics Tracking:** Hit/miss counters are kept per access type.

use serde::{Deserialize, Serialize};

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessType {
    /// Data read access.
    Load,

    /// Data write access.
    ///
    /// Marks the touched line dirty at every level it is installed or hit in.
    Store,
}

impl AccessType {
    /// Both access types, in counter-index order.
    pub const ALL: [Self; 2] = [Self::Load, Self::Store];

    /// Returns the counter index for this access type.
    #[inline(always)]
    pub const fn index(self) -> usize {
        match self {
            Self::Load => 0,
            Self::Store => 1,
        }
    }

    /// Returns `true` for [`AccessType::Store`].
    #[inline(always)]
    pub const fn is_store(self) -> bool {
        matches!(self, Self::Store)
    }

    /// Label used by the statistics report.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Load => "Load",
            Self::Store => "Store",
        }
    }

    /// Single-letter code used by the backing-store event stream (`R` / `W`).
    pub const fn code(self) -> char {
        match self {
            Self::Load => 'R',
            Self::Store => 'W',
        }
    }
}

/// A single memory access request fed into the top of the hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemAccess {
    /// First byte touched by the access.
    pub addr: u64,
    /// Number of bytes touched; always at least one.
    pub size: u32,
    /// Load or store.
    pub access_type: AccessType,
}

impl MemAccess {
    /// Creates a load of `size` bytes at `addr`.
    pub const fn load(addr: u64, size: u32) -> Self {
        Self {
            addr,
            size,
            access_type: AccessType::Load,
        }
    }

    /// Creates a store of `size` bytes at `addr`.
    pub const fn store(addr: u64, size: u32) -> Self {
        Self {
            addr,
            size,
            access_type: AccessType::Store,
        }
    }
}
