//! Set-Associative Cache Hierarchy.
//!
//! This module implements the cache side of the simulator. It provides:
//! 1. **Codec:** Address to (tag, set, offset) decomposition for one geometry.
//! 2. **Tags:** The per-way tag with its valid and dirty bits.
//! 3. **Policies:** Direct-mapped, round-robin, and LRU set variants.
//! 4. **Levels:** One cache level with its counters and latency weights.
//! 5. **Hierarchy:** Ordered inclusive levels over the backing store.

/// Address decomposition.
pub mod codec;

/// Inclusive multi-level propagation.
pub mod hierarchy;

/// A single cache level.
pub mod level;

/// Cache set replacement policies.
pub mod policies;

/// Tag plus valid/dirty metadata.
pub mod tag;

pub use codec::{LineSpan, SplitAddr, TagCodec};
pub use hierarchy::Hierarchy;
pub use level::CacheLevel;
pub use policies::{CacheSet, DirectMappedSet, LruSet, RoundRobinSet, SetArray};
pub use tag::CacheTag;
