//! Raw input records.
//!
//! These mirror what a data-access collaborator hands to the loader. They
//! carry no derived state; the loader turns them into [`TimeSlot`] and
//! [`Session`] values.
//!
//! # Examples
//!
//! ```
//! use slotforge_core::domain::records::MeetingData;
//!
//! let data: MeetingData = serde_json::from_str(r#"{
//!     "sessions": [
//!         {"id": 1, "group": "quic", "parent": "wit", "attendees": 120,
//!          "requested_duration_minutes": 60}
//!     ],
//!     "timeslots": [
//!         {"id": 10, "location": 1, "capacity": 200,
//!          "start": "2024-03-18T09:30:00", "duration_minutes": 120}
//!     ],
//!     "constraints": [
//!         {"category": "conflict", "source": "quic", "target": "tls"}
//!     ],
//!     "penalties": {"session_requires_trim": 100000, "conflict": 1000}
//! }"#).unwrap();
//!
//! assert_eq!(data.sessions[0].group, "quic");
//! assert!(data.base_schedules.is_empty());
//! ```
//!
//! [`TimeSlot`]: super::TimeSlot
//! [`Session`]: super::Session

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{LocationId, PersonId, SessionId, TimeRelation, TimeSlotId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SessionRecord {
    pub id: SessionId,
    pub group: String,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub responsible_person: Option<PersonId>,
    #[serde(default)]
    pub is_area_meeting: bool,
    #[serde(default)]
    pub is_bof: bool,
    #[serde(default)]
    pub is_proposed_research_group: bool,
    /// Unset means any room is large enough.
    #[serde(default)]
    pub attendees: Option<u32>,
    pub requested_duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeSlotRecord {
    pub id: TimeSlotId,
    pub location: LocationId,
    pub capacity: u32,
    pub start: NaiveDateTime,
    pub duration_minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ConstraintRecord {
    /// Category slug, e.g. `conflict` or `bethere`.
    pub category: String,
    /// Group the constraint applies to.
    pub source: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub person: Option<PersonId>,
    #[serde(default)]
    pub time_relation: Option<TimeRelation>,
    /// `<weekday>-<time-of-day>` buckets.
    #[serde(default)]
    pub timeranges: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub timeslot: TimeSlotId,
    pub session: SessionId,
}

/// A previously persisted, fully fixed schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseScheduleRecord {
    pub name: String,
    pub assignments: Vec<AssignmentRecord>,
}

/// Everything the engine needs for one meeting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MeetingData {
    pub sessions: Vec<SessionRecord>,
    pub timeslots: Vec<TimeSlotRecord>,
    #[serde(default)]
    pub constraints: Vec<ConstraintRecord>,
    #[serde(default)]
    pub base_schedules: Vec<BaseScheduleRecord>,
    /// Penalty weight per business-rule or constraint category slug.
    pub penalties: BTreeMap<String, u64>,
}
