//! Backing-store footprint tracker.
//!
//! A hashed, chained page table recording how often each page (and each
//! equal-sized sub-region of a page, a "micro-page") reaches main memory. It
//! approximates the working set per epoch: a page counts once per epoch in
//! which it is touched.
//!
//! Page records are created lazily on first touch and never removed. Each
//! bucket is a chain (a `Vec`) in which page ids are pairwise distinct.
//!
//! The tracker knows which epoch its per-epoch counters belong to. Moving it
//! to a later epoch closes the current one and yields an [`EpochReport`].

use serde::Serialize;

use crate::common::data::AccessType;
use crate::config::MemoryConfig;

/// Per-page access record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRecord {
    /// `addr >> log2(page_size)`.
    pub page_id: u64,
    /// Epoch of the most recent access.
    pub last_epoch: u64,
    /// Access count per micro-page, in address order.
    pub counters: Box<[u32]>,
}

impl PageRecord {
    /// Total accesses recorded for this page.
    pub fn accesses(&self) -> u64 {
        self.counters.iter().map(|&c| u64::from(c)).sum()
    }
}

/// Snapshot of the tracker's counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FootprintStats {
    /// Distinct pages touched in the current epoch.
    pub epoch_pages: u64,
    /// Accesses in the current epoch.
    pub epoch_accesses: u64,
    /// Page records ever created.
    pub total_pages: u64,
    /// Accesses ever recorded.
    pub total_accesses: u64,
    /// Store accesses ever recorded.
    pub total_stores: u64,
}

/// Footprint of one completed epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EpochReport {
    /// Epoch number that ended.
    pub epoch: u64,
    /// Distinct pages that reached memory during the epoch.
    pub distinct_pages: u64,
    /// Backing-store accesses during the epoch.
    pub accesses: u64,
    /// Page records created up to the end of the epoch.
    pub total_pages: u64,
}

/// Hashed page table of [`PageRecord`]s.
#[derive(Debug)]
pub struct FootprintTracker {
    buckets: Vec<Vec<PageRecord>>,
    epoch: u64,
    page_shift: u32,
    micro_shift: u32,
    micro_mask: u64,
    bucket_mask: u64,
    micro_pages: usize,
    stats: FootprintStats,
}

impl FootprintTracker {
    /// Builds an empty tracker; `config` must already be validated.
    pub fn new(config: &MemoryConfig) -> Self {
        let page_shift = config.page_size.trailing_zeros();
        let micro_bits = config.micro_pages.trailing_zeros();
        Self {
            buckets: vec![Vec::new(); config.buckets],
            epoch: 0,
            page_shift,
            micro_shift: page_shift - micro_bits,
            micro_mask: config.micro_pages as u64 - 1,
            bucket_mask: config.buckets as u64 - 1,
            micro_pages: config.micro_pages,
            stats: FootprintStats::default(),
        }
    }

    /// Page id of `addr`.
    #[inline]
    pub const fn page_id(&self, addr: u64) -> u64 {
        addr >> self.page_shift
    }

    /// Micro-page index of `addr` within its page.
    #[inline]
    pub const fn micro_index(&self, addr: u64) -> usize {
        ((addr >> self.micro_shift) & self.micro_mask) as usize
    }

    /// Records one access at `addr` during `epoch`.
    pub fn access(&mut self, addr: u64, access_type: AccessType, epoch: u64) {
        let page_id = self.page_id(addr);
        let micro = self.micro_index(addr);
        let bucket = (page_id & self.bucket_mask) as usize;

        self.stats.epoch_accesses += 1;
        self.stats.total_accesses += 1;
        if access_type.is_store() {
            self.stats.total_stores += 1;
        }

        let chain = &mut self.buckets[bucket];
        if let Some(page) = chain.iter_mut().find(|p| p.page_id == page_id) {
            page.counters[micro] = page.counters[micro].saturating_add(1);
            if page.last_epoch != epoch {
                self.stats.epoch_pages += 1;
            }
            page.last_epoch = epoch;
            return;
        }

        let mut counters = vec![0; self.micro_pages].into_boxed_slice();
        counters[micro] = 1;
        chain.push(PageRecord {
            page_id,
            last_epoch: epoch,
            counters,
        });
        self.stats.epoch_pages += 1;
        self.stats.total_pages += 1;
    }

    /// Epoch the per-epoch counters belong to.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Moves the tracker to `epoch`.
    ///
    /// If `epoch` is later than the current one, the current epoch is closed:
    /// its report is returned and the per-epoch counters are zeroed.
    pub const fn roll_over(&mut self, epoch: u64) -> Option<EpochReport> {
        if epoch <= self.epoch {
            return None;
        }
        let report = EpochReport {
            epoch: self.epoch,
            distinct_pages: self.stats.epoch_pages,
            accesses: self.stats.epoch_accesses,
            total_pages: self.stats.total_pages,
        };
        self.reset_epoch_counters();
        self.epoch = epoch;
        Some(report)
    }

    /// Zeroes the per-epoch counters; page records are kept.
    pub const fn reset_epoch_counters(&mut self) {
        self.stats.epoch_pages = 0;
        self.stats.epoch_accesses = 0;
    }

    /// Current counters.
    pub const fn stats(&self) -> FootprintStats {
        self.stats
    }

    /// Looks up the record for `page_id`.
    pub fn page(&self, page_id: u64) -> Option<&PageRecord> {
        let bucket = (page_id & self.bucket_mask) as usize;
        self.buckets[bucket].iter().find(|p| p.page_id == page_id)
    }

    /// Length of the longest bucket chain.
    pub fn longest_chain(&self) -> usize {
        self.buckets.iter().map(Vec::len).max().unwrap_or(0)
    }
}
