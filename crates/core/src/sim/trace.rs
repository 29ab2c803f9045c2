//! Access trace reader.
//!
//! A trace is plain text, one access per line:
//!
//! ```text
//! <op> <addr> <size> [gap]
//! ```
//!
//! - `op`: `L`, `R`, or `LOAD` for a load; `S`, `W`, or `STORE` for a store (any case).
//! - `addr`: hexadecimal with a `0x` prefix, otherwise decimal.
//! - `size`: bytes touched, at least one.
//! - `gap`: cycles elapsed since the previous access (default zero).
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::common::data::{AccessType, MemAccess};
use crate::common::error::TraceError;

/// One parsed trace line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraceRecord {
    /// The access to simulate.
    pub access: MemAccess,
    /// Cycles to advance the clock by before the access.
    pub gap: u64,
}

impl TraceRecord {
    /// Parses one non-comment line. `line_no` is only used for error messages.
    pub fn parse(text: &str, line_no: usize) -> Result<Self, TraceError> {
        let fail = |detail: String| TraceError::Parse {
            line: line_no,
            detail,
        };

        let mut fields = text.split_whitespace();
        let (Some(op), Some(addr), Some(size)) = (fields.next(), fields.next(), fields.next()) else {
            return Err(fail(format!("expected `<op> <addr> <size> [gap]`, got `{text}`")));
        };

        let access_type = match op.to_ascii_uppercase().as_str() {
            "L" | "R" | "LOAD" => AccessType::Load,
            "S" | "W" | "STORE" => AccessType::Store,
            other => return Err(fail(format!("unknown operation `{other}`"))),
        };
        let addr = parse_u64(addr).ok_or_else(|| fail(format!("bad address `{addr}`")))?;
        let size = size
            .parse::<u32>()
            .ok()
            .filter(|&s| s > 0)
            .ok_or_else(|| fail(format!("bad size `{size}`")))?;
        let gap = match fields.next() {
            Some(gap) => gap
                .parse::<u64>()
                .map_err(|_| fail(format!("bad gap `{gap}`")))?,
            None => 0,
        };
        if let Some(extra) = fields.next() {
            return Err(fail(format!("unexpected trailing field `{extra}`")));
        }

        Ok(Self {
            access: MemAccess {
                addr,
                size,
                access_type,
            },
            gap,
        })
    }
}

fn parse_u64(text: &str) -> Option<u64> {
    match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => text.parse().ok(),
    }
}

/// Streaming iterator of [`TraceRecord`]s over a buffered reader.
#[derive(Debug)]
pub struct TraceReader<R> {
    input: R,
    buf: String,
    line_no: usize,
}

impl TraceReader<BufReader<File>> {
    /// Opens the trace file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TraceError> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Reads records from `input`.
    pub const fn new(input: R) -> Self {
        Self {
            input,
            buf: String::new(),
            line_no: 0,
        }
    }

    /// Number of lines consumed so far, comments included.
    pub const fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, TraceError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line_no += 1,
                Err(e) => return Some(Err(e.into())),
            }
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Some(TraceRecord::parse(text, self.line_no));
        }
    }
}
