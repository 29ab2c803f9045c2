//! Cache Set Replacement Policies.
//!
//! Implements the set variants a cache level can be built from. Each variant
//! owns its ways and answers hit/miss queries itself; the level only picks the
//! set and acts on the reported victim.
//!
//! # Policies
//!
//! - `DirectMapped`: one way, the resident line is always the victim.
//! - `RoundRobin`: fixed cyclic victim pointer, blind to recency.
//! - `Lru`: true Least Recently Used via per-way staleness counters.

/// Single-way sets.
pub mod direct_mapped;

/// Least Recently Used replacement policy.
pub mod lru;

/// Round-robin (cyclic pointer) replacement policy.
pub mod round_robin;

pub use direct_mapped::DirectMappedSet;
pub use lru::LruSet;
pub use round_robin::RoundRobinSet;

use super::tag::CacheTag;
use crate::common::data::AccessType;
use crate::config::ReplacementPolicy;

/// Capability interface shared by every set variant.
///
/// Tags passed in are raw tag values (`addr >> log2(line_bytes)`); a set never
/// holds two valid slots with the same tag.
pub trait CacheSet {
    /// Creates an empty set with `ways` slots.
    fn with_ways(ways: usize) -> Self
    where
        Self: Sized;

    /// Looks up `tag`.
    ///
    /// On a hit the slot is marked dirty for a store and the policy's recency
    /// state is updated.
    fn find(&mut self, tag: u64, access_type: AccessType) -> bool;

    /// Installs `tag`, returning the previous occupant of the chosen slot if
    /// it held a valid line.
    ///
    /// The new slot is dirty iff `access_type` is a store.
    fn replace(&mut self, tag: u64, access_type: AccessType) -> Option<CacheTag>;

    /// Marks a resident `tag` dirty. Returns `false` if it is not resident.
    fn set_dirty(&mut self, tag: u64) -> bool;

    /// Drops a resident `tag`, returning it (with its dirty bit) if it was resident.
    fn invalidate(&mut self, tag: u64) -> Option<CacheTag>;

    /// Read-only residency check; does not touch recency state.
    fn contains(&self, tag: u64) -> bool {
        self.slots().iter().any(|slot| slot.holds(tag))
    }

    /// All slots, valid or not, in way order.
    fn slots(&self) -> &[CacheTag];
}

/// The sets of one cache level, all of the variant chosen at configuration time.
#[derive(Debug)]
pub enum SetArray {
    /// Direct-mapped sets.
    DirectMapped(Vec<DirectMappedSet>),
    /// Round-robin sets.
    RoundRobin(Vec<RoundRobinSet>),
    /// LRU sets.
    Lru(Vec<LruSet>),
}

fn build<S: CacheSet>(num_sets: usize, ways: usize) -> Vec<S> {
    (0..num_sets).map(|_| S::with_ways(ways)).collect()
}

/// Runs `$body` with `$set` bound to set `$index` of whichever variant `$sets` holds.
macro_rules! on_set {
    ($sets:expr, $index:expr, |$set:ident| $body:expr) => {
        match $sets {
            SetArray::DirectMapped(sets) => {
                let $set = &mut sets[$index];
                $body
            }
            SetArray::RoundRobin(sets) => {
                let $set = &mut sets[$index];
                $body
            }
            SetArray::Lru(sets) => {
                let $set = &mut sets[$index];
                $body
            }
        }
    };
}

impl SetArray {
    /// Allocates `num_sets` empty sets of `ways` ways under `policy`.
    pub fn new(policy: ReplacementPolicy, num_sets: usize, ways: usize) -> Self {
        match policy {
            ReplacementPolicy::DirectMapped => Self::DirectMapped(build(num_sets, ways)),
            ReplacementPolicy::RoundRobin => Self::RoundRobin(build(num_sets, ways)),
            ReplacementPolicy::Lru => Self::Lru(build(num_sets, ways)),
        }
    }

    /// Number of sets.
    pub fn len(&self) -> usize {
        match self {
            Self::DirectMapped(sets) => sets.len(),
            Self::RoundRobin(sets) => sets.len(),
            Self::Lru(sets) => sets.len(),
        }
    }

    /// Returns `true` if the array holds no sets (never the case for a validated level).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// [`CacheSet::find`] on set `index`.
    #[inline]
    pub fn find(&mut self, index: usize, tag: u64, access_type: AccessType) -> bool {
        on_set!(self, index, |set| set.find(tag, access_type))
    }

    /// [`CacheSet::replace`] on set `index`.
    #[inline]
    pub fn replace(&mut self, index: usize, tag: u64, access_type: AccessType) -> Option<CacheTag> {
        on_set!(self, index, |set| set.replace(tag, access_type))
    }

    /// [`CacheSet::set_dirty`] on set `index`.
    pub fn set_dirty(&mut self, index: usize, tag: u64) -> bool {
        on_set!(self, index, |set| set.set_dirty(tag))
    }

    /// [`CacheSet::invalidate`] on set `index`.
    pub fn invalidate(&mut self, index: usize, tag: u64) -> Option<CacheTag> {
        on_set!(self, index, |set| set.invalidate(tag))
    }

    /// [`CacheSet::contains`] on set `index`.
    pub fn contains(&self, index: usize, tag: u64) -> bool {
        match self {
            Self::DirectMapped(sets) => sets[index].contains(tag),
            Self::RoundRobin(sets) => sets[index].contains(tag),
            Self::Lru(sets) => sets[index].contains(tag),
        }
    }

    /// Every valid tag across all sets.
    pub fn resident(&self) -> Vec<CacheTag> {
        fn collect<S: CacheSet>(sets: &[S]) -> Vec<CacheTag> {
            sets.iter()
                .flat_map(|set| set.slots().iter().copied().filter(CacheTag::is_valid))
                .collect()
        }
        match self {
            Self::DirectMapped(sets) => collect(sets),
            Self::RoundRobin(sets) => collect(sets),
            Self::Lru(sets) => collect(sets),
        }
    }
}
