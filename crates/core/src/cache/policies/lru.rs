//! Least Recently Used (LRU) Replacement Policy.
//!
//! This policy evicts the cache line that has not been accessed for the longest time.
//! It keeps a staleness counter per way: every access to the set increments the
//! counter of every way except the touched one, which is reset to zero. The way
//! with the largest counter is the Least Recently Used line.
//!
//! Replacement prefers empty ways (lowest index first) before evicting anything.
//! Among valid ways with equal staleness the highest-index way is chosen, so
//! eviction order is deterministic.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `find()`: O(W) where W is the number of ways (associativity)
//!   - `replace()`: O(W)
//! - **Space Complexity:** O(W) per set
//! - **Hardware Cost:** High - requires a counter per way and a max-reduction
//! - **Best Case:** Sequential/streaming accesses with good temporal locality
//! - **Worst Case:** Scanning patterns larger than cache capacity (thrashing)

use super::CacheSet;
use crate::cache::tag::CacheTag;
use crate::common::data::AccessType;

/// LRU set state.
#[derive(Debug)]
pub struct LruSet {
    ways: Vec<CacheTag>,
    /// Accesses to this set since each way was last touched.
    staleness: Vec<u64>,
}

impl LruSet {
    /// Staleness counters in way order.
    pub fn staleness(&self) -> &[u64] {
        &self.staleness
    }

    /// Makes `way` the most recently used.
    fn touch(&mut self, way: usize) {
        for (i, age) in self.staleness.iter_mut().enumerate() {
            if i == way {
                *age = 0;
            } else {
                *age = age.saturating_add(1);
            }
        }
    }

    fn position(&self, tag: u64) -> Option<usize> {
        self.ways.iter().position(|slot| slot.holds(tag))
    }

    /// First invalid way, otherwise the stalest valid way (ties go to the highest index).
    fn victim_way(&self) -> usize {
        if let Some(empty) = self.ways.iter().position(|slot| !slot.is_valid()) {
            return empty;
        }
        let mut victim = 0;
        let mut oldest = 0;
        for (way, &age) in self.staleness.iter().enumerate() {
            if age >= oldest {
                oldest = age;
                victim = way;
            }
        }
        victim
    }
}

impl CacheSet for LruSet {
    fn with_ways(ways: usize) -> Self {
        Self {
            ways: vec![CacheTag::default(); ways],
            staleness: vec![0; ways],
        }
    }

    fn find(&mut self, tag: u64, access_type: AccessType) -> bool {
        let Some(way) = self.position(tag) else {
            return false;
        };
        if access_type.is_store() {
            self.ways[way].mark_dirty();
        }
        self.touch(way);
        true
    }

    fn replace(&mut self, tag: u64, access_type: AccessType) -> Option<CacheTag> {
        let way = self.victim_way();
        let victim = std::mem::replace(&mut self.ways[way], CacheTag::installed(tag, access_type));
        self.touch(way);
        victim.as_victim()
    }

    /// A write-back from the level above counts as a use of the line.
    fn set_dirty(&mut self, tag: u64) -> bool {
        let Some(way) = self.position(tag) else {
            return false;
        };
        self.ways[way].mark_dirty();
        self.touch(way);
        true
    }

    fn invalidate(&mut self, tag: u64) -> Option<CacheTag> {
        let way = self.position(tag)?;
        self.ways[way].invalidate()
    }

    fn slots(&self) -> &[CacheTag] {
        &self.ways
    }
}
