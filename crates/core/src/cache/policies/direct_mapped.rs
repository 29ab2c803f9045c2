//! Direct-Mapped Sets.
//!
//! A single way per set. Every miss replaces the resident line, so the victim
//! is whatever the set held, if anything.

use super::CacheSet;
use crate::cache::tag::CacheTag;
use crate::common::data::AccessType;

/// Single-slot set.
#[derive(Debug, Default)]
pub struct DirectMappedSet {
    slot: [CacheTag; 1],
}

impl CacheSet for DirectMappedSet {
    /// Associativity is fixed at one; configuration rejects any other way count.
    fn with_ways(ways: usize) -> Self {
        debug_assert_eq!(ways, 1, "direct-mapped sets hold one way");
        Self::default()
    }

    #[inline(always)]
    fn find(&mut self, tag: u64, access_type: AccessType) -> bool {
        let slot = &mut self.slot[0];
        if slot.holds(tag) {
            if access_type.is_store() {
                slot.mark_dirty();
            }
            true
        } else {
            false
        }
    }

    #[inline(always)]
    fn replace(&mut self, tag: u64, access_type: AccessType) -> Option<CacheTag> {
        std::mem::replace(&mut self.slot[0], CacheTag::installed(tag, access_type)).as_victim()
    }

    fn set_dirty(&mut self, tag: u64) -> bool {
        let slot = &mut self.slot[0];
        let found = slot.holds(tag);
        if found {
            slot.mark_dirty();
        }
        found
    }

    fn invalidate(&mut self, tag: u64) -> Option<CacheTag> {
        let slot = &mut self.slot[0];
        if slot.holds(tag) { slot.invalidate() } else { None }
    }

    fn slots(&self) -> &[CacheTag] {
        &self.slot
    }
}
