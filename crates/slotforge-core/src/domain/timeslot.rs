//! Timeslots and their precomputed relations.

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta, Weekday};

use super::{LocationId, TimeRange, TimeSlotId};

/// A dated, located unit of schedulable time.
///
/// Relation sets hold slot indices and are filled by [`link_timeslots`]
/// once every slot of the run is known. They never change afterwards.
#[derive(Debug, Clone)]
pub struct TimeSlot {
    /// Position of this slot in the run's slot list.
    pub index: usize,
    pub id: TimeSlotId,
    pub location: LocationId,
    /// Room capacity.
    pub capacity: u32,
    pub start: NaiveDateTime,
    pub duration: TimeDelta,
    /// Saturates at `NaiveDateTime::MAX`.
    pub end: NaiveDateTime,
    pub time_range: TimeRange,
    /// Part of an immovable base schedule.
    pub is_fixed: bool,
    overlaps: Vec<usize>,
    full_overlaps: Vec<usize>,
    adjacent: Vec<usize>,
}

impl TimeSlot {
    pub fn new(
        index: usize,
        id: TimeSlotId,
        location: LocationId,
        capacity: u32,
        start: NaiveDateTime,
        duration: TimeDelta,
    ) -> Self {
        Self {
            index,
            id,
            location,
            capacity,
            start,
            duration,
            end: start.checked_add_signed(duration).unwrap_or(NaiveDateTime::MAX),
            time_range: TimeRange::of(start),
            is_fixed: false,
            overlaps: Vec::new(),
            full_overlaps: Vec::new(),
            adjacent: Vec::new(),
        }
    }

    pub fn day(&self) -> Weekday {
        self.start.weekday()
    }

    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Slots whose time ranges intersect this one, including this slot.
    pub fn overlaps(&self) -> &[usize] {
        &self.overlaps
    }

    /// Slots with identical start and end, including this slot.
    pub fn full_overlaps(&self) -> &[usize] {
        &self.full_overlaps
    }

    /// Other slots in the same room on the same day within the adjacency gap.
    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }

    fn intersects(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }

    fn same_period(&self, other: &TimeSlot) -> bool {
        self.start == other.start && self.end == other.end
    }

    fn is_adjacent_to(&self, other: &TimeSlot, gap: TimeDelta) -> bool {
        if self.location != other.location || self.date() != other.date() {
            return false;
        }
        let within = |delta: TimeDelta| delta >= TimeDelta::zero() && delta <= gap;
        within(other.start - self.end) || within(self.start - other.end)
    }
}

/// Computes overlap, full-overlap and adjacency sets across all slots.
///
/// Relations are symmetric. Existing relation sets are replaced, so calling
/// this twice on the same slots yields the same result.
pub fn link_timeslots(slots: &mut [TimeSlot], adjacency_gap: TimeDelta) {
    let n = slots.len();
    let mut overlaps = vec![Vec::new(); n];
    let mut full_overlaps = vec![Vec::new(); n];
    let mut adjacent = vec![Vec::new(); n];

    for i in 0..n {
        for j in 0..n {
            let (a, b) = (&slots[i], &slots[j]);
            if i == j || a.intersects(b) {
                overlaps[i].push(b.index);
            }
            if a.same_period(b) {
                full_overlaps[i].push(b.index);
            }
            if i != j && a.is_adjacent_to(b, adjacency_gap) {
                adjacent[i].push(b.index);
            }
        }
    }

    for (slot, ((o, f), a)) in slots
        .iter_mut()
        .zip(overlaps.into_iter().zip(full_overlaps).zip(adjacent))
    {
        slot.overlaps = o;
        slot.full_overlaps = f;
        slot.adjacent = a;
    }
}
