//! Builders for domain values.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use slotforge_core::domain::{PersonId, SessionId, TimeRelation};
use slotforge_core::{Cost, LocationId, Session, TimeSlot, TimeSlotId};

/// Returns a timestamp in March 2024. Day 18 is a Monday.
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .expect("valid fixture timestamp")
}

/// Creates an unlinked slot with id `index + 1000`.
pub fn slot(
    index: usize,
    location: u64,
    capacity: u32,
    start: NaiveDateTime,
    minutes: i64,
) -> TimeSlot {
    TimeSlot::new(
        index,
        TimeSlotId(index as u64 + 1000),
        LocationId(location),
        capacity,
        start,
        TimeDelta::minutes(minutes),
    )
}

/// Fluent builder for [`Session`] values.
///
/// Defaults to 10 attendees and a 60 minute request.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    session: Session,
}

impl SessionBuilder {
    pub fn new(index: usize, id: u64, group: &str) -> Self {
        let mut session = Session::new(index, SessionId(id), group);
        session.attendees = 10;
        session.requested_duration = TimeDelta::minutes(60);
        Self { session }
    }

    pub fn attendees(mut self, attendees: u32) -> Self {
        self.session.attendees = attendees;
        self
    }

    pub fn duration_minutes(mut self, minutes: i64) -> Self {
        self.session.requested_duration = TimeDelta::minutes(minutes);
        self
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.session.parent = Some(parent.to_string());
        self
    }

    pub fn responsible(mut self, person: u64) -> Self {
        self.session.responsible_person = Some(PersonId(person));
        self
    }

    pub fn bof(mut self) -> Self {
        self.session.is_bof = true;
        self
    }

    pub fn area_meeting(mut self) -> Self {
        self.session.is_area_meeting = true;
        self
    }

    pub fn proposed_research_group(mut self) -> Self {
        self.session.is_proposed_research_group = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.session.is_fixed = true;
        self
    }

    pub fn conflict(mut self, group: &str, penalty: u64) -> Self {
        self.session
            .constraints
            .add_group_conflict(group, Cost::of(penalty));
        self
    }

    pub fn key_person(mut self, person: u64, penalty: u64) -> Self {
        self.session
            .constraints
            .add_key_person(PersonId(person), Cost::of(penalty));
        self
    }

    pub fn time_relation(mut self, relation: TimeRelation, penalty: u64) -> Self {
        self.session
            .constraints
            .set_time_relation(relation, Cost::of(penalty));
        self
    }

    pub fn adjacent_to(mut self, group: &str, penalty: u64) -> Self {
        self.session.constraints.set_adjacent(group, Cost::of(penalty));
        self
    }

    pub fn unavailable(mut self, range: &str, penalty: u64) -> Self {
        let range = range.parse().expect("valid time range");
        self.session
            .constraints
            .add_unavailable([range], Cost::of(penalty));
        self
    }

    pub fn build(mut self) -> Session {
        self.session.compute_complexity();
        self.session
    }
}
