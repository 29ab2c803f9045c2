//! Simulation driver.
//!
//! Provides the clock every access is charged to, the trace reader that
//! produces accesses, and the simulator that replays them with epoch handling.

/// Simulation clock and epoch arithmetic.
pub mod context;

/// Trace replay driver.
pub mod simulator;

/// Text trace reader.
pub mod trace;

pub use context::SimContext;
pub use crate::memory::footprint::EpochReport;
pub use simulator::Simulator;
pub use trace::{TraceReader, TraceRecord};
