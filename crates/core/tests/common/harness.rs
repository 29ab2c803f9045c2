//! Hierarchy harness.
//!
//! `TestContext` owns a hierarchy whose backing-store events are recorded in
//! a `Vec`, plus the clock every access is charged to.

use cachesim_core::cache::Hierarchy;
use cachesim_core::common::MemAccess;
use cachesim_core::config::Config;
use cachesim_core::memory::events::MemoryEvent;
use cachesim_core::sim::SimContext;

/// Installs a test-writer subscriber once per process so `RUST_LOG` works in tests.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct TestContext {
    pub hierarchy: Hierarchy<Vec<MemoryEvent>>,
    pub ctx: SimContext,
}

impl TestContext {
    /// Builds the hierarchy described by `config`; panics if it is rejected.
    pub fn new(config: &Config) -> Self {
        init_tracing();
        let hierarchy = Hierarchy::with_sink(config, Vec::new())
            .unwrap_or_else(|e| panic!("test configuration rejected: {e}"));
        Self {
            hierarchy,
            ctx: SimContext::new(config.memory.epoch_length),
        }
    }

    /// One-byte load at `addr`; returns whether the top level hit.
    pub fn load(&mut self, addr: u64) -> bool {
        self.access(MemAccess::load(addr, 1))
    }

    /// One-byte store at `addr`; returns whether the top level hit.
    pub fn store(&mut self, addr: u64) -> bool {
        self.access(MemAccess::store(addr, 1))
    }

    pub fn access(&mut self, access: MemAccess) -> bool {
        self.hierarchy
            .access(&mut self.ctx, access)
            .unwrap_or_else(|e| panic!("access {access:?} failed: {e}"))
    }

    /// Recorded backing-store events.
    pub fn events(&self) -> &[MemoryEvent] {
        self.hierarchy.sink()
    }

    /// Whether level `k` holds the line containing `addr`.
    pub fn resident(&self, k: usize, addr: u64) -> bool {
        self.hierarchy.levels()[k].contains(addr)
    }
}
