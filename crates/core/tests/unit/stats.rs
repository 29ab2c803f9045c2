//! # Statistics Tests
//!
//! Snapshot contents after a short run and the two report formats.

use cachesim_core::Simulator;
use cachesim_core::common::AccessType::{Load, Store};
use cachesim_core::common::MemAccess;
use cachesim_core::config::Config;

fn run_small() -> Simulator {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    for access in [
        MemAccess::load(0x1000, 8),
        MemAccess::load(0x1008, 8),
        MemAccess::store(0x2000, 4),
        MemAccess::store(0x2000, 4),
    ] {
        let _ = sim.access(access).unwrap();
    }
    sim
}

#[test]
fn snapshot_counts() {
    let stats = run_small().stats();
    assert_eq!(stats.levels.len(), 2);

    let l1 = &stats.levels[0];
    assert_eq!(l1.name, "L1");
    assert_eq!((l1.requests.hits(Load), l1.requests.misses(Load)), (1, 1));
    assert_eq!((l1.requests.hits(Store), l1.requests.misses(Store)), (1, 1));

    let l2 = &stats.levels[1];
    assert_eq!(l2.lines.total_accesses(), 2);
    assert_eq!(l2.lines.total_misses(), 2);
    assert_eq!(l2.requests.total_accesses(), 0);

    assert_eq!((stats.memory.reads, stats.memory.writes), (1, 1));
    assert_eq!(stats.footprint.total_pages, 2);
    // L1: two hits (1) and two misses (4). L2: two misses (150).
    assert_eq!(stats.cycles, 1 + 4 + 1 + 4 + 150 + 150);
}

#[test]
fn text_report_layout() {
    let report = run_small().stats().to_string();
    for needle in [
        "CACHE HIERARCHY",
        "# L1: 32768 bytes, 64-byte lines, 4 ways, Lru",
        "# L2: 1048576 bytes, 64-byte lines, 8 ways, Lru",
        "Load-Hits:",
        "Store-Misses:",
        "Total-Accesses:",
        "50.00%",
        "BACKING STORE",
        "FOOTPRINT",
    ] {
        assert!(report.contains(needle), "missing {needle:?} in\n{report}");
    }
}

#[test]
fn json_report_is_structured() {
    let json = run_small().stats().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["levels"][0]["name"], "L1");
    assert_eq!(value["levels"][0]["policy"], "LRU");
    assert_eq!(value["levels"][0]["requests"]["hits"][0], 1);
    assert_eq!(value["memory"]["reads"], 1);
    assert_eq!(value["footprint"]["total_pages"], 2);
}
