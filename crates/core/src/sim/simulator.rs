//! Simulator: owns the hierarchy and the clock side by side.
//!
//! Each trace record advances the clock by its gap and is then fed to the
//! top of the hierarchy. The backing store closes an epoch as soon as a page
//! reaches it on a later epoch's clock; after each record the driver closes
//! the epoch if the clock alone has moved on, and collects the reports.

use tracing::info;

use super::context::SimContext;
use super::trace::TraceRecord;
use crate::cache::Hierarchy;
use crate::common::data::MemAccess;
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::Config;
use crate::memory::events::{EventSink, NullSink};
use crate::memory::footprint::EpochReport;
use crate::stats::HierarchyStats;

/// Top-level simulator: hierarchy plus simulation context.
#[derive(Debug)]
pub struct Simulator<S = NullSink> {
    hierarchy: Hierarchy<S>,
    ctx: SimContext,
    accesses: u64,
}

impl Simulator<NullSink> {
    /// Creates a simulator that discards backing-store events.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        Self::with_sink(config, NullSink)
    }
}

impl<S: EventSink> Simulator<S> {
    /// Creates a simulator whose backing-store events go to `sink`.
    pub fn with_sink(config: &Config, sink: S) -> Result<Self, ConfigError> {
        Ok(Self {
            hierarchy: Hierarchy::with_sink(config, sink)?,
            ctx: SimContext::new(config.memory.epoch_length),
            accesses: 0,
        })
    }

    /// Replays one trace record.
    ///
    /// Returns the reports of the epochs that ended while it was replayed,
    /// oldest first.
    pub fn step(&mut self, record: &TraceRecord) -> Result<Vec<EpochReport>, SimError> {
        self.ctx.advance(record.gap);
        let _ = self.access(record.access)?;
        Ok(self.close_epochs())
    }

    /// Feeds one access to the hierarchy without advancing the clock first.
    pub fn access(&mut self, access: MemAccess) -> Result<bool, SimError> {
        self.accesses += 1;
        self.hierarchy.access(&mut self.ctx, access)
    }

    /// Replays every record of `records`, stopping at the first error.
    ///
    /// Returns the reports of every epoch that ended during the replay.
    pub fn run<I>(&mut self, records: I) -> Result<Vec<EpochReport>, SimError>
    where
        I: IntoIterator<Item = Result<TraceRecord, TraceError>>,
    {
        let mut reports = Vec::new();
        for record in records {
            reports.extend(self.step(&record?)?);
        }
        Ok(reports)
    }

    fn close_epochs(&mut self) -> Vec<EpochReport> {
        let reports = self.hierarchy.take_ended_epochs(&self.ctx);
        for report in &reports {
            info!(
                epoch = report.epoch,
                distinct_pages = report.distinct_pages,
                accesses = report.accesses,
                total_pages = report.total_pages,
                cycle = self.ctx.cycles(),
                "epoch complete"
            );
        }
        reports
    }

    /// Flushes the event sink, surfacing any deferred write error.
    pub fn flush(&mut self) -> Result<(), SimError> {
        self.hierarchy.sink_mut().flush().map_err(SimError::EventSink)
    }

    /// Accesses fed to the hierarchy so far.
    pub const fn accesses(&self) -> u64 {
        self.accesses
    }

    /// The cache hierarchy.
    pub const fn hierarchy(&self) -> &Hierarchy<S> {
        &self.hierarchy
    }

    /// Mutable cache hierarchy.
    pub const fn hierarchy_mut(&mut self) -> &mut Hierarchy<S> {
        &mut self.hierarchy
    }

    /// Simulation clock.
    pub const fn context(&self) -> &SimContext {
        &self.ctx
    }

    /// Snapshot of every counter.
    pub fn stats(&self) -> HierarchyStats {
        self.hierarchy.stats(&self.ctx)
    }

    /// Consumes the simulator, returning the event sink.
    pub fn into_sink(self) -> S {
        self.hierarchy.into_sink()
    }
}
