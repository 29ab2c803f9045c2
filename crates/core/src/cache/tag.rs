//! Cache tag.
//!
//! A resident line is identified by its tag value alone. The valid and dirty
//! bits are metadata: two tags compare equal whenever their tag values do.

use crate::common::data::AccessType;

/// Tag of a cache line plus its valid and dirty bits.
#[derive(Clone, Copy, Debug, Default, Eq)]
pub struct CacheTag {
    tag: u64,
    valid: bool,
    dirty: bool,
}

impl CacheTag {
    /// Creates a valid tag, dirty iff `access_type` is a store.
    #[inline(always)]
    pub const fn installed(tag: u64, access_type: AccessType) -> Self {
        Self {
            tag,
            valid: true,
            dirty: access_type.is_store(),
        }
    }

    /// Creates a tag with explicit metadata.
    pub const fn with_state(tag: u64, valid: bool, dirty: bool) -> Self {
        Self { tag, valid, dirty }
    }

    /// Tag value (`addr >> log2(line_bytes)`).
    #[inline(always)]
    pub const fn tag(&self) -> u64 {
        self.tag
    }

    /// Returns `true` if the slot holds a line.
    #[inline(always)]
    pub const fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns `true` if the line was written since it was installed.
    #[inline(always)]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns `true` if this slot holds `tag`.
    #[inline(always)]
    pub const fn holds(&self, tag: u64) -> bool {
        self.valid && self.tag == tag
    }

    /// Marks the line dirty.
    #[inline(always)]
    pub const fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Drops the line, returning the previous occupant if it was valid.
    pub const fn invalidate(&mut self) -> Option<Self> {
        if self.valid {
            let old = *self;
            self.valid = false;
            self.dirty = false;
            Some(old)
        } else {
            None
        }
    }

    /// Returns the occupant if it is valid, the value a `replace` reports as victim.
    #[inline(always)]
    pub const fn as_victim(self) -> Option<Self> {
        if self.valid { Some(self) } else { None }
    }
}

impl PartialEq for CacheTag {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag
    }
}
