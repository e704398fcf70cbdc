//! Raw record fixtures.

use std::collections::BTreeMap;

use chrono::{NaiveDateTime, TimeDelta};
use slotforge_core::domain::records::{
    ConstraintRecord, MeetingData, SessionRecord, TimeSlotRecord,
};
use slotforge_core::{LocationId, SessionId, TimeSlotId};

use crate::builders::at;
use crate::penalties::standard_penalties;

/// A 60 minute session with 10 attendees.
pub fn session_record(id: u64, group: &str) -> SessionRecord {
    SessionRecord {
        id: SessionId(id),
        group: group.to_string(),
        parent: None,
        responsible_person: None,
        is_area_meeting: false,
        is_bof: false,
        is_proposed_research_group: false,
        attendees: Some(10),
        requested_duration_minutes: 60,
    }
}

pub fn timeslot_record(
    id: u64,
    location: u64,
    capacity: u32,
    start: NaiveDateTime,
    minutes: i64,
) -> TimeSlotRecord {
    TimeSlotRecord {
        id: TimeSlotId(id),
        location: LocationId(location),
        capacity,
        start,
        duration_minutes: minutes,
    }
}

pub fn constraint_record(category: &str, source: &str) -> ConstraintRecord {
    ConstraintRecord {
        category: category.to_string(),
        source: source.to_string(),
        target: None,
        person: None,
        time_relation: None,
        timeranges: Vec::new(),
    }
}

/// Bundles records with the standard penalty table.
pub fn meeting(sessions: Vec<SessionRecord>, timeslots: Vec<TimeSlotRecord>) -> MeetingData {
    MeetingData {
        sessions,
        timeslots,
        constraints: Vec::new(),
        base_schedules: Vec::new(),
        penalties: standard_penalties(),
    }
}

/// `sessions` unconstrained sessions of distinct groups and `slots` 120 minute
/// slots with 100 seats, spread over four rooms from Monday on.
pub fn uniform_meeting(sessions: usize, slots: usize) -> MeetingData {
    let session_records = (0..sessions)
        .map(|i| session_record(i as u64 + 1, &format!("group{i}")))
        .collect();

    let timeslot_records = (0..slots)
        .map(|i| {
            let room = (i % 4) as u64 + 1;
            let period = (i / 4) as i64;
            let day = 18 + (period / 3) as u32;
            let start = at(day, 9, 0) + TimeDelta::minutes(150 * (period % 3));
            timeslot_record(i as u64 + 1000, room, 100, start, 120)
        })
        .collect();

    meeting(session_records, timeslot_records)
}

/// Penalty map with only the mandatory weight.
pub fn minimal_penalties() -> BTreeMap<String, u64> {
    [("session_requires_trim".to_string(), crate::TRIM_PENALTY)]
        .into_iter()
        .collect()
}

/// Parses a meeting fixture written as JSON.
pub fn meeting_from_json(json: &str) -> MeetingData {
    serde_json::from_str(json).expect("valid meeting fixture")
}
