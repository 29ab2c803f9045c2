//! Round-Robin Replacement Policy.
//!
//! This policy evicts ways in a fixed cyclic order, regardless of how recently
//! they were accessed. Each set keeps one pointer that starts at the last way
//! and moves down by one (wrapping to the last way after way 0) on every
//! replacement. Hits never move it.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find()`: O(W) where W is the number of ways (associativity)
//!   - `replace()`: O(1)
//! - **Space Complexity:** O(W) per set plus one pointer
//! - **Hardware Cost:** Minimal - single counter per set
//! - **Best Case:** Streaming accesses where all lines have equal importance
//! - **Worst Case:** Workloads with strong temporal locality (may evict frequently-used lines)

use super::CacheSet;
use crate::cache::tag::CacheTag;
use crate::common::data::AccessType;

/// Round-robin set state.
#[derive(Debug)]
pub struct RoundRobinSet {
    ways: Vec<CacheTag>,
    /// Way evicted by the next `replace`.
    next_victim: usize,
}

impl RoundRobinSet {
    /// Way the next replacement will use.
    pub const fn next_victim(&self) -> usize {
        self.next_victim
    }

    fn last_way(&self) -> usize {
        self.ways.len() - 1
    }
}

impl CacheSet for RoundRobinSet {
    fn with_ways(ways: usize) -> Self {
        Self {
            ways: vec![CacheTag::default(); ways],
            next_victim: ways - 1,
        }
    }

    fn find(&mut self, tag: u64, access_type: AccessType) -> bool {
        match self.ways.iter_mut().find(|slot| slot.holds(tag)) {
            Some(slot) => {
                if access_type.is_store() {
                    slot.mark_dirty();
                }
                true
            }
            None => false,
        }
    }

    /// Evicts the way under the pointer, then decrements the pointer.
    fn replace(&mut self, tag: u64, access_type: AccessType) -> Option<CacheTag> {
        let index = self.next_victim;
        let victim = std::mem::replace(&mut self.ways[index], CacheTag::installed(tag, access_type));
        self.next_victim = if index == 0 { self.last_way() } else { index - 1 };
        victim.as_victim()
    }

    fn set_dirty(&mut self, tag: u64) -> bool {
        match self.ways.iter_mut().find(|slot| slot.holds(tag)) {
            Some(slot) => {
                slot.mark_dirty();
                true
            }
            None => false,
        }
    }

    fn invalidate(&mut self, tag: u64) -> Option<CacheTag> {
        self.ways
            .iter_mut()
            .find(|slot| slot.holds(tag))
            .and_then(CacheTag::invalidate)
    }

    fn slots(&self) -> &[CacheTag] {
        &self.ways
    }
}
