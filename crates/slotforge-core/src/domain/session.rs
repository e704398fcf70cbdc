//! Sessions and their constraint-derived data.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use super::{PersonId, SessionId, TimeRange, TimeSlot};
use crate::cost::Cost;

/// Required day relation between the first two sessions of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeRelation {
    /// Exactly one day apart.
    SubsequentDays,
    /// Anything but exactly one day apart.
    OneDaySeparation,
}

impl TimeRelation {
    pub fn is_satisfied(&self, days_apart: i64) -> bool {
        match self {
            TimeRelation::SubsequentDays => days_apart == 1,
            TimeRelation::OneDaySeparation => days_apart != 1,
        }
    }

    pub const fn slug(&self) -> &'static str {
        match self {
            TimeRelation::SubsequentDays => "subsequent-days",
            TimeRelation::OneDaySeparation => "one-day-separation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRelationRequirement {
    pub relation: TimeRelation,
    pub penalty: Cost,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyRequirement {
    pub group: String,
    pub penalty: Cost,
}

/// Constraint data extracted once at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionConstraints {
    /// Conflicting group -> accumulated penalty.
    pub conflict_groups: BTreeMap<String, Cost>,
    /// People who must not be double-booked against this session.
    pub conflict_people: BTreeSet<PersonId>,
    pub conflict_people_penalty: Cost,
    pub time_relation: Option<TimeRelationRequirement>,
    pub wg_adjacent: Option<AdjacencyRequirement>,
    pub timeranges_unavailable: HashSet<TimeRange>,
    pub timeranges_unavailable_penalty: Cost,
}

impl SessionConstraints {
    /// Accumulates a conflict penalty towards `group`.
    pub fn add_group_conflict(&mut self, group: impl Into<String>, penalty: Cost) {
        *self.conflict_groups.entry(group.into()).or_default() += penalty;
    }

    /// Adds a key person. The penalty is shared by all key people.
    pub fn add_key_person(&mut self, person: PersonId, penalty: Cost) {
        self.conflict_people.insert(person);
        self.conflict_people_penalty = penalty;
    }

    pub fn set_time_relation(&mut self, relation: TimeRelation, penalty: Cost) {
        self.time_relation = Some(TimeRelationRequirement { relation, penalty });
    }

    pub fn set_adjacent(&mut self, group: impl Into<String>, penalty: Cost) {
        self.wg_adjacent = Some(AdjacencyRequirement {
            group: group.into(),
            penalty,
        });
    }

    pub fn add_unavailable(&mut self, ranges: impl IntoIterator<Item = TimeRange>, penalty: Cost) {
        self.timeranges_unavailable.extend(ranges);
        self.timeranges_unavailable_penalty = penalty;
    }
}

/// A unit of work to be scheduled.
///
/// Load-time attributes are not changed during optimisation, with the
/// exception of capacity trims applied before placement starts.
/// `last_cost` is scratch state owned by the schedule being evaluated.
#[derive(Debug, Clone)]
pub struct Session {
    /// Position of this session in the run's session list.
    pub index: usize,
    pub id: SessionId,
    pub group: String,
    pub parent: Option<String>,
    pub responsible_person: Option<PersonId>,
    pub is_area_meeting: bool,
    pub is_bof: bool,
    pub is_proposed_research_group: bool,
    /// Part of an immovable base schedule.
    pub is_fixed: bool,
    pub attendees: u32,
    pub requested_duration: TimeDelta,
    pub constraints: SessionConstraints,
    complexity: u64,
    /// Most recently computed cost of this session in the live schedule.
    pub last_cost: Option<Cost>,
}

impl Session {
    pub fn new(index: usize, id: SessionId, group: impl Into<String>) -> Self {
        Self {
            index,
            id,
            group: group.into(),
            parent: None,
            responsible_person: None,
            is_area_meeting: false,
            is_bof: false,
            is_proposed_research_group: false,
            is_fixed: false,
            attendees: 0,
            requested_duration: TimeDelta::zero(),
            constraints: SessionConstraints::default(),
            complexity: 0,
            last_cost: None,
        }
    }

    /// Whether both the room and the slot length are large enough.
    pub fn fits_in(&self, slot: &TimeSlot) -> bool {
        self.attendees <= slot.capacity && self.requested_duration <= slot.duration
    }

    /// Heuristic used only to order initial placement.
    pub fn complexity(&self) -> u64 {
        self.complexity
    }

    /// Computes complexity from this session's own requirements.
    ///
    /// Cross-session pressure is added later by [`update_complexities`].
    pub fn compute_complexity(&mut self) {
        let c = &self.constraints;
        let conflict_total: Cost = c.conflict_groups.values().copied().sum();
        let parts = [
            u64::from(self.attendees),
            conflict_total.value(),
            c.conflict_people_penalty
                .times(c.conflict_people.len())
                .value(),
            c.time_relation.map(|t| t.penalty.value()).unwrap_or(0),
            c.wg_adjacent
                .as_ref()
                .map(|a| a.penalty.value().saturating_mul(1000))
                .unwrap_or(0),
            c.timeranges_unavailable_penalty
                .times(c.timeranges_unavailable.len())
                .value(),
            (self.requested_duration.num_seconds().max(0) as u64).saturating_mul(100),
        ];
        self.complexity = parts.iter().fold(0u64, |acc, p| acc.saturating_add(*p));
    }

    // Pressure other sessions put on this one: their declared conflicts
    // towards this group and key people shared with them.
    fn conflict_pressure(&self, others: &[Session]) -> u64 {
        let mut pressure = 0u64;
        for other in others {
            if other.index == self.index {
                continue;
            }
            if let Some(penalty) = other.constraints.conflict_groups.get(&self.group) {
                pressure = pressure.saturating_add(penalty.value());
            }
            let shared = self
                .constraints
                .conflict_people
                .intersection(&other.constraints.conflict_people)
                .count();
            pressure = pressure.saturating_add(
                self.constraints
                    .conflict_people_penalty
                    .times(shared)
                    .value(),
            );
        }
        pressure
    }
}

/// Adds cross-session conflict pressure to every session's complexity.
///
/// Must run once, after all sessions are loaded and their own complexity
/// has been computed.
pub fn update_complexities(sessions: &mut [Session]) {
    let pressures: Vec<u64> = sessions
        .iter()
        .map(|s| s.conflict_pressure(sessions))
        .collect();
    for (session, pressure) in sessions.iter_mut().zip(pressures) {
        session.complexity = session.complexity.saturating_add(pressure);
    }
}
