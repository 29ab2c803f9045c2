//! Tag/address codec.
//!
//! Pure functions mapping an address to `(tag, set index, line offset)` for a
//! fixed line size and set count, and mapping a tag back to its line's base
//! address. The codec holds only precomputed shifts and masks.

use std::iter::FusedIterator;

/// Address decomposition for one cache geometry.
///
/// Both `line_bytes` and `num_sets` must be powers of two; [`TagCodec::new`]
/// is only called after [`CacheLevelConfig::validate`](crate::config::CacheLevelConfig::validate)
/// has checked that.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TagCodec {
    line_shift: u32,
    line_mask: u64,
    set_mask: u64,
}

/// Result of [`TagCodec::split`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SplitAddr {
    /// `addr >> log2(line_bytes)`.
    pub tag: u64,
    /// `tag & (num_sets - 1)`.
    pub set_index: usize,
    /// `addr & (line_bytes - 1)`.
    pub line_offset: u64,
}

impl TagCodec {
    /// Builds the codec for `line_bytes`-byte lines spread over `num_sets` sets.
    pub const fn new(line_bytes: usize, num_sets: usize) -> Self {
        Self {
            line_shift: line_bytes.trailing_zeros(),
            line_mask: line_bytes as u64 - 1,
            set_mask: num_sets as u64 - 1,
        }
    }

    /// Line size in bytes.
    #[inline(always)]
    pub const fn line_bytes(&self) -> u64 {
        self.line_mask + 1
    }

    /// Decomposes `addr` into tag, set index, and line offset.
    #[inline(always)]
    pub const fn split(&self, addr: u64) -> SplitAddr {
        let tag = addr >> self.line_shift;
        SplitAddr {
            tag,
            set_index: (tag & self.set_mask) as usize,
            line_offset: addr & self.line_mask,
        }
    }

    /// Returns the base address of the line identified by `tag`.
    ///
    /// The offset within the line is not recoverable; write-backs
    /// operate on whole lines.
    #[inline(always)]
    pub const fn recover(&self, tag: u64) -> u64 {
        tag << self.line_shift
    }

    /// Base addresses of every line overlapped by `[addr, addr + size)`.
    ///
    /// The first line is `addr` aligned down; each next line starts one line
    /// size further. A zero `size` is treated as one byte.
    pub const fn lines(&self, addr: u64, size: u32) -> LineSpan {
        let first = addr & !self.line_mask;
        let last_byte = addr.saturating_add((if size == 0 { 1 } else { size }) as u64 - 1);
        LineSpan {
            next: first,
            last: last_byte & !self.line_mask,
            step: self.line_mask + 1,
            done: false,
        }
    }
}

/// Iterator over line base addresses produced by [`TagCodec::lines`].
#[derive(Clone, Debug)]
pub struct LineSpan {
    next: u64,
    last: u64,
    step: u64,
    done: bool,
}

impl Iterator for LineSpan {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.done {
            return None;
        }
        let line = self.next;
        if line >= self.last {
            self.done = true;
        } else {
            self.next = line + self.step;
        }
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            return (0, Some(0));
        }
        let remaining = ((self.last - self.next) / self.step + 1) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LineSpan {}

impl FusedIterator for LineSpan {}
