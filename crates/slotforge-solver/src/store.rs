//! Persistence hand-off for finished schedules.

use std::collections::BTreeMap;
use std::convert::Infallible;

use slotforge_core::domain::records::{AssignmentRecord, BaseScheduleRecord};
use slotforge_core::{Cost, SessionId, TimeSlotId};

use crate::runner::ScheduleOutcome;

/// One movable placement of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub timeslot: TimeSlotId,
    pub session: SessionId,
    /// The session's share of the dynamic cost.
    pub cost: Cost,
}

/// Destination for finished schedules.
///
/// Naming and ownership of stored schedules are up to the implementation.
pub trait ScheduleStore {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(&mut self, name: &str, outcome: &ScheduleOutcome) -> Result<(), Self::Error>;
}

/// A stored schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSchedule {
    pub placements: Vec<Placement>,
    pub violations: Vec<String>,
    pub cost: Cost,
}

/// In-memory store keyed by schedule name. Saving under an existing name
/// replaces the previous schedule.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    schedules: BTreeMap<String, StoredSchedule>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&StoredSchedule> {
        self.schedules.get(name)
    }

    pub fn len(&self) -> usize {
        self.schedules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedules.is_empty()
    }

    /// Returns a stored schedule in the form a later run accepts as its
    /// base schedule.
    pub fn base_schedule(&self, name: &str) -> Option<BaseScheduleRecord> {
        self.schedules.get(name).map(|stored| BaseScheduleRecord {
            name: name.to_string(),
            assignments: stored
                .placements
                .iter()
                .map(|p| AssignmentRecord {
                    timeslot: p.timeslot,
                    session: p.session,
                })
                .collect(),
        })
    }
}

impl ScheduleStore for MemoryStore {
    type Error = Infallible;

    fn save(&mut self, name: &str, outcome: &ScheduleOutcome) -> Result<(), Self::Error> {
        self.schedules.insert(
            name.to_string(),
            StoredSchedule {
                placements: outcome.placements.clone(),
                violations: outcome.violations.clone(),
                cost: outcome.cost,
            },
        );
        Ok(())
    }
}
