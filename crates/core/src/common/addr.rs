//! Line address type.
//!
//! Backing-store traffic is always line-granular. `LineAddr` is the base
//! address of a cache line, as recovered from a tag, and is what the event
//! stream and the footprint tracker are fed.

use std::fmt;

use serde::Serialize;

/// Base address of a cache line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct LineAddr(pub u64);

impl LineAddr {
    /// Aligns `addr` down to the start of its `line_bytes`-sized line.
    ///
    /// `line_bytes` must be a power of two.
    #[inline(always)]
    pub const fn containing(addr: u64, line_bytes: u64) -> Self {
        Self(addr & !(line_bytes - 1))
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
