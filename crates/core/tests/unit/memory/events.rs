//! # Backing Store Event Tests
//!
//! Event deltas, the warm-up threshold, and the provided sinks.

use pretty_assertions::assert_eq;

use cachesim_core::common::AccessType::{Load, Store};
use cachesim_core::common::LineAddr;
use cachesim_core::config::MemoryConfig;
use cachesim_core::memory::BackingStore;
use cachesim_core::memory::events::{EventSink, MemoryEvent, NullSink, TextSink};
use cachesim_core::memory::footprint::EpochReport;
use cachesim_core::sim::SimContext;

fn store_with_warmup(warmup_cycles: u64) -> BackingStore<Vec<MemoryEvent>> {
    let config = MemoryConfig {
        warmup_cycles,
        ..MemoryConfig::default()
    };
    BackingStore::new(&config, 64, Vec::new())
}

/// Two accesses on the same cycle are reported one cycle apart.
#[test]
fn deltas_measure_time_since_previous_access() {
    let mut mem = store_with_warmup(0);
    let mut ctx = SimContext::new(1_000_000);

    ctx.advance(10);
    mem.fill(&ctx, 0x1234, Load);
    ctx.advance(5);
    mem.write_back(&ctx, 0x8000);
    mem.fill(&ctx, 0x8040, Store);

    assert_eq!(
        mem.sink().as_slice(),
        &[
            MemoryEvent { delta: 10, access_type: Load, line_addr: LineAddr(0x1200) },
            MemoryEvent { delta: 5, access_type: Store, line_addr: LineAddr(0x8000) },
            MemoryEvent { delta: 1, access_type: Store, line_addr: LineAddr(0x8040) },
        ]
    );
    let stats = mem.stats();
    assert_eq!((stats.reads, stats.writes, stats.write_backs), (1, 2, 1));
}

#[test]
fn no_events_until_warmup_has_passed() {
    let mut mem = store_with_warmup(100);
    let mut ctx = SimContext::new(1_000_000);

    ctx.advance(40);
    mem.fill(&ctx, 0x0, Load);
    ctx.advance(60);
    mem.fill(&ctx, 0x40, Load);
    assert!(mem.sink().is_empty());

    ctx.advance(1);
    mem.fill(&ctx, 0x80, Load);
    // The delta still measures from the last (suppressed) access.
    assert_eq!(mem.sink().as_slice(), &[MemoryEvent { delta: 1, access_type: Load, line_addr: LineAddr(0x80) }]);

    let stats = mem.stats();
    assert_eq!((stats.before_warmup, stats.after_warmup), (2, 1));
    // The footprint sees every access regardless.
    assert_eq!(mem.footprint().stats().total_accesses, 3);
}

#[test]
fn footprint_is_stamped_with_context_epoch() {
    let mut mem = store_with_warmup(0);
    let mut ctx = SimContext::new(100);
    ctx.advance(1);
    mem.fill(&ctx, 0x1000, Load);
    ctx.advance(100);
    mem.fill(&ctx, 0x1000, Load);
    assert_eq!(mem.footprint().page(1).map(|p| p.last_epoch), Some(1));
    assert_eq!(mem.footprint().epoch(), 1);
    assert_eq!(mem.footprint().stats().epoch_pages, 1);
    assert_eq!(
        mem.take_ended_epochs(),
        vec![EpochReport {
            epoch: 0,
            distinct_pages: 1,
            accesses: 1,
            total_pages: 1,
        }]
    );
}

#[test]
fn clock_alone_closes_an_epoch_on_sync() {
    let mut mem = store_with_warmup(0);
    let mut ctx = SimContext::new(100);
    mem.fill(&ctx, 0x0, Load);
    ctx.advance(50);
    mem.sync_epoch(&ctx);
    assert!(mem.take_ended_epochs().is_empty());

    ctx.advance(250);
    mem.sync_epoch(&ctx);
    mem.sync_epoch(&ctx);
    let ended = mem.take_ended_epochs();
    assert_eq!(ended.len(), 1);
    assert_eq!((ended[0].epoch, ended[0].distinct_pages), (0, 1));
    assert_eq!(mem.footprint().epoch(), 3);
    assert!(mem.take_ended_epochs().is_empty());
}

#[test]
fn text_sink_writes_meta_lines() {
    let mut sink = TextSink::new(Vec::new());
    sink.record(MemoryEvent {
        delta: 7,
        access_type: Store,
        line_addr: LineAddr(0xdead_bec0),
    });
    EventSink::flush(&mut sink).unwrap();
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();
    assert_eq!(text, "META 7 W deadbec0\n");
}

#[test]
fn boxed_sinks_forward() {
    let mut sink: Box<dyn EventSink> = Box::new(NullSink);
    sink.record(MemoryEvent {
        delta: 0,
        access_type: Load,
        line_addr: LineAddr(0),
    });
    assert!(sink.flush().is_ok());
}

#[test]
fn display_matches_text_sink() {
    let event = MemoryEvent {
        delta: 3,
        access_type: Load,
        line_addr: LineAddr(0x40),
    };
    assert_eq!(event.to_string(), "META 3 R 40");
}
