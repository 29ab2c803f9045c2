//! Backing-store event stream.
//!
//! Every line that travels to or from main memory produces one
//! [`MemoryEvent`]. Events are handed to an [`EventSink`], which a downstream
//! consumer (a DRAM model, a trace file) owns.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::common::addr::LineAddr;
use crate::common::data::AccessType;

/// One backing-store access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct MemoryEvent {
    /// Cycles since the previous backing-store access.
    pub delta: u64,
    /// `Load` for a line fill, `Store` for a write (write-back or non-allocating store fill).
    pub access_type: AccessType,
    /// Base address of the line.
    pub line_addr: LineAddr,
}

impl fmt::Display for MemoryEvent {
    /// Formats as `META <delta> R|W <hex line address>`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "META {} {} {:x}",
            self.delta,
            self.access_type.code(),
            self.line_addr.val()
        )
    }
}

/// Consumer of backing-store events.
pub trait EventSink {
    /// Receives one event. Called on the access hot path.
    fn record(&mut self, event: MemoryEvent);

    /// Flushes buffered output, reporting any deferred write error.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    #[inline(always)]
    fn record(&mut self, _event: MemoryEvent) {}
}

impl EventSink for Vec<MemoryEvent> {
    fn record(&mut self, event: MemoryEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn record(&mut self, event: MemoryEvent) {
        (**self).record(event);
    }

    fn flush(&mut self) -> io::Result<()> {
        (**self).flush()
    }
}

/// Writes events one per line in the `META` text format.
///
/// The first write error is kept and reported by [`EventSink::flush`]; later
/// events are dropped.
#[derive(Debug)]
pub struct TextSink<W: Write> {
    out: W,
    error: Option<io::Error>,
    written: u64,
}

impl<W: Write> TextSink<W> {
    /// Wraps `out`. Callers should pass a buffered writer.
    pub const fn new(out: W) -> Self {
        Self {
            out,
            error: None,
            written: 0,
        }
    }

    /// Number of events written so far.
    pub const fn written(&self) -> u64 {
        self.written
    }

    /// Flushes and returns the writer.
    pub fn into_inner(mut self) -> io::Result<W> {
        EventSink::flush(&mut self)?;
        Ok(self.out)
    }
}

impl<W: Write> EventSink for TextSink<W> {
    fn record(&mut self, event: MemoryEvent) {
        if self.error.is_some() {
            return;
        }
        match writeln!(self.out, "{event}") {
            Ok(()) => self.written += 1,
            Err(e) => self.error = Some(e),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.out.flush()
    }
}
