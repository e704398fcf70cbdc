//! Turns raw meeting records into slots, sessions and a base schedule.

use std::collections::HashMap;

use chrono::{Datelike, TimeDelta, Weekday};
use slotforge_config::SchedulerConfig;
use slotforge_core::domain::records::{ConstraintRecord, MeetingData, SessionRecord};
use slotforge_core::domain::{link_timeslots, update_complexities};
use slotforge_core::{
    ConstraintKind, PenaltyTable, Result, ScheduleError, Session, TimeRange, TimeSlot,
};
use slotforge_scoring::{Assignment, Schedule};
use tracing::{debug, warn};

/// Everything the loader derives from one meeting.
#[derive(Debug, Clone)]
pub struct LoadedMeeting {
    pub timeslots: Vec<TimeSlot>,
    pub sessions: Vec<Session>,
    pub penalties: PenaltyTable,
    pub base: Option<Assignment>,
    /// Recoverable data issues, e.g. sessions without an attendee count.
    pub warnings: Vec<String>,
}

impl LoadedMeeting {
    pub fn into_schedule(self) -> Result<Schedule> {
        Schedule::new(self.timeslots, self.sessions, self.penalties, self.base)
    }
}

/// Builds the run's domain model from raw records.
#[derive(Debug, Clone)]
pub struct Loader {
    adjacency_gap: TimeDelta,
}

impl Default for Loader {
    fn default() -> Self {
        Self::from_config(&SchedulerConfig::default())
    }
}

impl Loader {
    pub fn new(adjacency_gap: TimeDelta) -> Self {
        Self { adjacency_gap }
    }

    pub fn from_config(config: &SchedulerConfig) -> Self {
        Self::new(config.adjacency_gap())
    }

    /// Loads `data`, resolving `base_schedule` by name when given.
    ///
    /// # Errors
    ///
    /// Fails on a missing `session_requires_trim` weight, a duration outside
    /// the supported time range, an unknown or incomplete constraint, a base
    /// schedule name that matches zero or several schedules, or a base
    /// schedule that places a slot or session twice.
    pub fn load(&self, data: &MeetingData, base_schedule: Option<&str>) -> Result<LoadedMeeting> {
        let penalties = PenaltyTable::new(data.penalties.clone())?;
        let mut warnings = Vec::new();

        let mut timeslots: Vec<TimeSlot> = data
            .timeslots
            .iter()
            .filter(|record| record.start.weekday() != Weekday::Sun)
            .enumerate()
            .map(|(index, record)| {
                let label = format!("timeslot {}", record.id);
                let duration = minutes(&label, record.duration_minutes)?;
                if record.start.checked_add_signed(duration).is_none() {
                    return Err(ScheduleError::DurationOutOfRange {
                        record: label,
                        minutes: record.duration_minutes,
                    });
                }
                Ok(TimeSlot::new(
                    index,
                    record.id,
                    record.location,
                    record.capacity,
                    record.start,
                    duration,
                ))
            })
            .collect::<Result<_>>()?;
        let excluded = data.timeslots.len() - timeslots.len();
        if excluded > 0 {
            debug!(event = "sunday_slots_excluded", count = excluded);
        }
        link_timeslots(&mut timeslots, self.adjacency_gap);

        let mut sessions: Vec<Session> = data
            .sessions
            .iter()
            .enumerate()
            .map(|(index, record)| session_from_record(index, record, &mut warnings))
            .collect::<Result<_>>()?;

        for record in &data.constraints {
            apply_constraint(record, &penalties, &mut sessions)?;
        }

        for session in &mut sessions {
            session.compute_complexity();
        }
        update_complexities(&mut sessions);

        let base = match base_schedule {
            Some(name) => Some(resolve_base_schedule(
                data,
                name,
                &mut timeslots,
                &mut sessions,
                &mut warnings,
            )?),
            None => None,
        };

        Ok(LoadedMeeting {
            timeslots,
            sessions,
            penalties,
            base,
            warnings,
        })
    }
}

fn minutes(record: &str, minutes: i64) -> Result<TimeDelta> {
    TimeDelta::try_minutes(minutes).ok_or_else(|| ScheduleError::DurationOutOfRange {
        record: record.to_string(),
        minutes,
    })
}

fn session_from_record(
    index: usize,
    record: &SessionRecord,
    warnings: &mut Vec<String>,
) -> Result<Session> {
    let mut session = Session::new(index, record.id, record.group.as_str());
    session.parent = record.parent.clone();
    session.responsible_person = record.responsible_person;
    session.is_area_meeting = record.is_area_meeting;
    session.is_bof = record.is_bof;
    session.is_proposed_research_group = record.is_proposed_research_group;
    session.requested_duration = minutes(
        &format!("session {}", record.id),
        record.requested_duration_minutes,
    )?;
    session.attendees = match record.attendees {
        Some(attendees) => attendees,
        None => {
            warn!(
                event = "missing_attendees",
                session = %record.id,
                group = %record.group,
            );
            warnings.push(format!(
                "{}: no attendee count given, any room is considered large enough",
                record.group
            ));
            0
        }
    };
    Ok(session)
}

fn apply_constraint(
    record: &ConstraintRecord,
    penalties: &PenaltyTable,
    sessions: &mut [Session],
) -> Result<()> {
    let kind = ConstraintKind::from_slug(&record.category).ok_or_else(|| {
        ScheduleError::UnknownConstraint {
            category: record.category.clone(),
            group: record.source.clone(),
        }
    })?;
    let penalty = penalties.weight(&record.category);
    let incomplete = |field: &'static str| ScheduleError::IncompleteConstraint {
        category: record.category.clone(),
        group: record.source.clone(),
        field,
    };

    let targets = sessions.iter_mut().filter(|s| s.group == record.source);
    match kind {
        ConstraintKind::GroupConflict => {
            let target = record.target.as_deref().ok_or_else(|| incomplete("target"))?;
            for session in targets {
                session.constraints.add_group_conflict(target, penalty);
            }
        }
        ConstraintKind::KeyPerson => {
            let person = record.person.ok_or_else(|| incomplete("person"))?;
            for session in targets {
                session.constraints.add_key_person(person, penalty);
            }
        }
        ConstraintKind::TimeRelation => {
            let relation = record.time_relation.ok_or_else(|| incomplete("time_relation"))?;
            for session in targets {
                session.constraints.set_time_relation(relation, penalty);
            }
        }
        ConstraintKind::WgAdjacent => {
            let target = record.target.as_deref().ok_or_else(|| incomplete("target"))?;
            for session in targets {
                session.constraints.set_adjacent(target, penalty);
            }
        }
        ConstraintKind::TimeRange => {
            let ranges = record
                .timeranges
                .iter()
                .map(|range| range.parse::<TimeRange>())
                .collect::<Result<Vec<_>>>()?;
            for session in targets {
                session.constraints.add_unavailable(ranges.iter().copied(), penalty);
            }
        }
    }
    Ok(())
}

fn resolve_base_schedule(
    data: &MeetingData,
    name: &str,
    timeslots: &mut [TimeSlot],
    sessions: &mut [Session],
    warnings: &mut Vec<String>,
) -> Result<Assignment> {
    let mut matches = data.base_schedules.iter().filter(|b| b.name == name);
    let record = match (matches.next(), matches.count()) {
        (None, _) => return Err(ScheduleError::BaseScheduleNotFound(name.to_string())),
        (Some(record), 0) => record,
        (Some(_), more) => {
            return Err(ScheduleError::AmbiguousBaseSchedule {
                name: name.to_string(),
                count: more + 1,
            })
        }
    };

    let slot_index: HashMap<_, _> = timeslots.iter().map(|t| (t.id, t.index)).collect();
    let session_index: HashMap<_, _> = sessions.iter().map(|s| (s.id, s.index)).collect();

    let mut base = Assignment::with_slot_count(timeslots.len());
    for row in &record.assignments {
        match (slot_index.get(&row.timeslot), session_index.get(&row.session)) {
            (Some(&slot), Some(&session)) => {
                let duplicate = |entry: String| ScheduleError::DuplicateBaseAssignment {
                    name: name.to_string(),
                    entry,
                };
                if base.is_occupied(slot) {
                    return Err(duplicate(format!("timeslot {}", row.timeslot)));
                }
                if base.contains_session(session) {
                    return Err(duplicate(format!("session {}", row.session)));
                }
                base.place(slot, session);
                timeslots[slot].is_fixed = true;
                sessions[session].is_fixed = true;
            }
            _ => {
                warn!(
                    event = "unknown_base_row",
                    schedule = name,
                    timeslot = %row.timeslot,
                    session = %row.session,
                );
                warnings.push(format!(
                    "base schedule {}: skipped assignment of session {} to timeslot {}",
                    name, row.session, row.timeslot
                ));
            }
        }
    }
    debug!(event = "base_schedule_resolved", schedule = name, placements = base.len());
    Ok(base)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
