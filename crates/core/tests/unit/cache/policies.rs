//! # Replacement Policy Tests
//!
//! Exercises each set variant on its own and through `SetArray`, the way a
//! level drives them: `find` first, `replace` on a miss.

use proptest::prelude::*;
use rstest::rstest;

use cachesim_core::cache::{CacheSet, DirectMappedSet, LruSet, RoundRobinSet, SetArray};
use cachesim_core::common::AccessType::{Load, Store};
use cachesim_core::config::ReplacementPolicy;

/// `find`, then `replace` on a miss; returns the evicted tag, if any.
fn touch<S: CacheSet>(set: &mut S, tag: u64) -> Option<u64> {
    if set.find(tag, Load) {
        None
    } else {
        set.replace(tag, Load).map(|victim| victim.tag())
    }
}

// ──────────────────────────────────────────────────────────
// Direct-mapped
// ──────────────────────────────────────────────────────────

#[test]
fn direct_mapped_always_evicts_resident_line() {
    let mut set = DirectMappedSet::with_ways(1);
    assert_eq!(touch(&mut set, 1), None);
    assert_eq!(touch(&mut set, 2), Some(1));
    assert_eq!(touch(&mut set, 2), None);
    assert_eq!(touch(&mut set, 1), Some(2));
}

#[test]
fn replace_reports_dirty_victim() {
    let mut set = DirectMappedSet::with_ways(1);
    assert!(set.replace(7, Store).is_none());
    let victim = set.replace(8, Load).unwrap();
    assert_eq!(victim.tag(), 7);
    assert!(victim.is_dirty());
    let victim = set.replace(9, Load).unwrap();
    assert!(!victim.is_dirty());
}

// ──────────────────────────────────────────────────────────
// Round-robin
// ──────────────────────────────────────────────────────────

/// Victims follow the decrementing pointer even when the victim was just hit.
#[test]
fn round_robin_ignores_recency() {
    let mut set = RoundRobinSet::with_ways(3);
    for tag in [10, 11, 12] {
        assert_eq!(touch(&mut set, tag), None);
    }
    // Ways are now [12, 11, 10]; the pointer is back at way 2.
    assert!(set.find(10, Load));
    assert_eq!(touch(&mut set, 13), Some(10));
    assert!(set.find(11, Load));
    assert_eq!(touch(&mut set, 14), Some(11));
    assert_eq!(touch(&mut set, 15), Some(12));
    assert_eq!(touch(&mut set, 16), Some(13));
}

// ──────────────────────────────────────────────────────────
// LRU
// ──────────────────────────────────────────────────────────

/// Two ways: A, B, A, C evicts B.
#[test]
fn lru_evicts_least_recent() {
    let (a, b, c) = (0xa, 0xb, 0xc);
    let mut set = LruSet::with_ways(2);
    assert_eq!(touch(&mut set, a), None);
    assert_eq!(touch(&mut set, b), None);
    assert_eq!(touch(&mut set, a), None);
    assert_eq!(touch(&mut set, c), Some(b));
    assert!(set.contains(a));
    assert!(!set.contains(b));
}

#[test]
fn lru_fills_invalid_ways_lowest_first() {
    let mut set = LruSet::with_ways(4);
    for tag in 1..=4 {
        assert_eq!(touch(&mut set, tag), None);
    }
    let tags: Vec<u64> = set.slots().iter().map(|slot| slot.tag()).collect();
    assert_eq!(tags, vec![1, 2, 3, 4]);
}

#[test]
fn lru_fills_invalidated_way_before_evicting() {
    let mut set = LruSet::with_ways(2);
    let _ = touch(&mut set, 1);
    let _ = touch(&mut set, 2);
    assert!(set.invalidate(2).is_some());
    assert_eq!(touch(&mut set, 3), None);
    assert!(set.contains(1) && set.contains(3));
}

#[test]
fn lru_set_dirty_counts_as_use() {
    let mut set = LruSet::with_ways(2);
    let _ = touch(&mut set, 1);
    let _ = touch(&mut set, 2);
    assert!(set.set_dirty(1));
    assert_eq!(touch(&mut set, 3), Some(2));
}

proptest! {
    /// k distinct tags, re-access the first, then k-1 fresh misses: the first survives.
    #[test]
    fn prop_lru_retains_reaccessed_line(ways in 1usize..=16, base in 0u64..1_000_000) {
        let mut set = LruSet::with_ways(ways);
        let tags: Vec<u64> = (0..ways as u64).map(|i| base + i).collect();
        for &tag in &tags {
            prop_assert_eq!(touch(&mut set, tag), None);
        }
        prop_assert!(set.find(tags[0], Load));
        for i in 0..ways as u64 - 1 {
            let _ = touch(&mut set, base + 1_000_000 + i);
        }
        prop_assert!(set.contains(tags[0]));
    }

    /// No variant ever holds two valid slots with the same tag, or more valid slots than ways.
    #[test]
    fn prop_sets_hold_distinct_tags(
        ways in 1usize..=8,
        tags in prop::collection::vec(0u64..12, 1..200),
    ) {
        let mut lru = LruSet::with_ways(ways);
        let mut rr = RoundRobinSet::with_ways(ways);
        for &tag in &tags {
            let _ = touch(&mut lru, tag);
            let _ = touch(&mut rr, tag);
        }
        for slots in [lru.slots(), rr.slots()] {
            let mut valid: Vec<u64> = slots.iter().filter(|s| s.is_valid()).map(|s| s.tag()).collect();
            let count = valid.len();
            valid.sort_unstable();
            valid.dedup();
            prop_assert_eq!(valid.len(), count);
            prop_assert!(count <= ways);
        }
    }
}

// ──────────────────────────────────────────────────────────
// SetArray dispatch
// ──────────────────────────────────────────────────────────

#[rstest]
#[case(ReplacementPolicy::DirectMapped, 1)]
#[case(ReplacementPolicy::RoundRobin, 4)]
#[case(ReplacementPolicy::Lru, 4)]
fn set_array_keeps_sets_independent(#[case] policy: ReplacementPolicy, #[case] ways: usize) {
    let mut sets = SetArray::new(policy, 4, ways);
    assert_eq!(sets.len(), 4);
    assert!(sets.replace(0, 100, Store).is_none());
    assert!(sets.contains(0, 100));
    assert!(!sets.contains(1, 100));
    assert!(sets.find(0, 100, Load));
    assert!(!sets.find(1, 100, Load));

    assert!(sets.set_dirty(0, 100));
    assert!(!sets.set_dirty(2, 100));

    let dropped = sets.invalidate(0, 100).unwrap();
    assert!(dropped.is_dirty());
    assert!(sets.resident().is_empty());
}
