//! Memoization of pairwise overlap costs.
//!
//! Overlap costs depend only on a session and the set of sessions that
//! overlap it. Keys hold that set in sorted order, so any change to the
//! schedule mapping produces a different key and never hits a stale entry.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use slotforge_core::CostReport;
use smallvec::SmallVec;

/// Default number of entries kept before the cache is flushed.
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;

/// Which overlap computation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlapCheck {
    /// Double-booking, declared group conflicts and key people.
    Conflicts,
    /// BOF and area-meeting rules and shared responsible people.
    BusinessLogic,
}

/// Order-independent identity of one overlap evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OverlapKey {
    check: OverlapCheck,
    session: usize,
    overlapping: SmallVec<[usize; 8]>,
}

impl OverlapKey {
    pub fn new(
        check: OverlapCheck,
        session: usize,
        overlapping: impl IntoIterator<Item = usize>,
    ) -> Self {
        let mut overlapping: SmallVec<[usize; 8]> = overlapping.into_iter().collect();
        overlapping.sort_unstable();
        overlapping.dedup();
        Self {
            check,
            session,
            overlapping,
        }
    }
}

/// Bounded overlap-cost cache.
#[derive(Debug, Clone)]
pub struct OverlapCostCache {
    entries: HashMap<OverlapKey, CostReport>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl Default for OverlapCostCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl OverlapCostCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            capacity: capacity.max(1),
            hits: 0,
            misses: 0,
        }
    }

    /// Returns the cached report for `key`, computing it on a miss.
    pub fn get_or_insert_with(
        &mut self,
        key: OverlapKey,
        compute: impl FnOnce() -> CostReport,
    ) -> &CostReport {
        if self.entries.len() >= self.capacity && !self.entries.contains_key(&key) {
            self.entries.clear();
        }
        match self.entries.entry(key) {
            Entry::Occupied(entry) => {
                self.hits += 1;
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                self.misses += 1;
                entry.insert(compute())
            }
        }
    }

    /// Drops every entry. Needed when session attributes change.
    pub fn invalidate(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}
