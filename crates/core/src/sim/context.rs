//! Simulation context.
//!
//! Owns the running clock that every access is charged to. Cache levels add
//! their hit/miss latency weights to it; the trace driver advances it by the
//! instruction gap between accesses. Epoch numbers and backing-store event
//! deltas are both derived from this one counter.

/// Global clock and epoch arithmetic for one simulation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimContext {
    cycles: u64,
    epoch_length: u64,
}

impl SimContext {
    /// Creates a context at cycle zero. `epoch_length` must be non-zero.
    pub const fn new(epoch_length: u64) -> Self {
        Self {
            cycles: 0,
            epoch_length,
        }
    }

    /// Current cycle count.
    #[inline(always)]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Epoch length in cycles.
    pub const fn epoch_length(&self) -> u64 {
        self.epoch_length
    }

    /// Current epoch (`cycles / epoch_length`).
    #[inline(always)]
    pub const fn epoch(&self) -> u64 {
        self.cycles / self.epoch_length
    }

    /// Advances the clock by `cycles`.
    #[inline(always)]
    pub const fn advance(&mut self, cycles: u64) {
        self.cycles = self.cycles.saturating_add(cycles);
    }
}
