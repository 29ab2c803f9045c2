//! # Footprint Tracker Tests
//!
//! Page identification, micro-page selection, chaining, and per-epoch
//! distinct-page counting.

use rstest::rstest;

use cachesim_core::common::AccessType::{Load, Store};
use cachesim_core::config::MemoryConfig;
use cachesim_core::memory::footprint::FootprintTracker;

fn tracker(buckets: usize) -> FootprintTracker {
    FootprintTracker::new(&MemoryConfig {
        buckets,
        ..MemoryConfig::default()
    })
}

#[test]
fn same_page_twice_in_one_epoch_counts_once() {
    let mut fp = tracker(1024);
    fp.access(0x1000, Load, 0);
    fp.access(0x1ff8, Load, 0);
    let stats = fp.stats();
    assert_eq!(stats.epoch_pages, 1);
    assert_eq!(stats.epoch_accesses, 2);
    assert_eq!(stats.total_pages, 1);
}

#[test]
fn same_page_in_a_later_epoch_counts_again() {
    let mut fp = tracker(1024);
    fp.access(0x1000, Load, 0);
    fp.reset_epoch_counters();
    fp.access(0x1000, Load, 1);
    fp.access(0x1040, Store, 1);

    let stats = fp.stats();
    assert_eq!(stats.epoch_pages, 1);
    assert_eq!(stats.epoch_accesses, 2);
    assert_eq!(stats.total_pages, 1);
    assert_eq!(stats.total_accesses, 3);
    assert_eq!(stats.total_stores, 1);
    assert_eq!(fp.page(1).map(|p| p.last_epoch), Some(1));
}

#[test]
fn roll_over_closes_the_current_epoch_once() {
    let mut fp = tracker(1024);
    fp.access(0x1000, Load, 0);
    fp.access(0x2000, Store, 0);
    assert_eq!(fp.roll_over(0), None);

    let report = fp.roll_over(2).unwrap();
    assert_eq!(
        (report.epoch, report.distinct_pages, report.accesses, report.total_pages),
        (0, 2, 2, 2)
    );
    assert_eq!(fp.epoch(), 2);
    assert_eq!((fp.stats().epoch_pages, fp.stats().epoch_accesses), (0, 0));
    assert_eq!(fp.roll_over(2), None);
    assert_eq!(fp.roll_over(1), None);
}

#[test]
fn reset_keeps_records() {
    let mut fp = tracker(1024);
    fp.access(0x5000, Load, 0);
    fp.reset_epoch_counters();
    let stats = fp.stats();
    assert_eq!((stats.epoch_pages, stats.epoch_accesses), (0, 0));
    assert_eq!(fp.page(5).map(|p| p.accesses()), Some(1));
}

#[rstest]
#[case(0x0000, 0)]
#[case(0x03ff, 0)]
#[case(0x0400, 1)]
#[case(0x0bff, 2)]
#[case(0x0fff, 3)]
#[case(0x7c00, 3)]
fn micro_page_is_equal_quarter_of_page(#[case] addr: u64, #[case] expected: usize) {
    let fp = tracker(1024);
    assert_eq!(fp.micro_index(addr), expected);
}

#[test]
fn micro_counters_accumulate_per_region() {
    let mut fp = tracker(1024);
    for addr in [0x2000, 0x2010, 0x2c00, 0x2fff] {
        fp.access(addr, Load, 0);
    }
    let page = fp.page(2).unwrap();
    assert_eq!(&*page.counters, &[2, 0, 0, 2]);
    assert_eq!(page.accesses(), 4);
}

/// Pages whose ids collide in the bucket hash share a chain but stay distinct.
#[test]
fn colliding_pages_are_chained() {
    let mut fp = tracker(4);
    for page_id in [1u64, 5, 9, 13] {
        fp.access(page_id << 12, Load, 0);
    }
    fp.access(5 << 12, Load, 0);

    assert_eq!(fp.longest_chain(), 4);
    assert_eq!(fp.stats().total_pages, 4);
    assert_eq!(fp.stats().epoch_pages, 4);
    assert_eq!(fp.page(5).map(|p| p.accesses()), Some(2));
    assert!(fp.page(17).is_none());
}

#[test]
fn page_id_uses_page_size() {
    let fp = FootprintTracker::new(&MemoryConfig {
        page_size: 8192,
        ..MemoryConfig::default()
    });
    assert_eq!(fp.page_id(0x3fff), 1);
    assert_eq!(fp.page_id(0x4000), 2);
}
