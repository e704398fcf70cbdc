//! Matching of session requirements against the available slots.

use std::fmt;

use chrono::TimeDelta;
use rand::Rng;
use slotforge_core::{Result, ScheduleError, Session, TimeSlot};
use slotforge_scoring::Schedule;
use tracing::info;

use crate::phase::Phase;
use crate::scope::SolverScope;

/// The two requirements a slot must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Duration,
    Capacity,
}

impl Requirement {
    fn offered(self, slot: &TimeSlot) -> i64 {
        match self {
            Requirement::Duration => slot.duration.num_seconds(),
            Requirement::Capacity => i64::from(slot.capacity),
        }
    }

    fn requested(self, session: &Session) -> i64 {
        match self {
            Requirement::Duration => session.requested_duration.num_seconds(),
            Requirement::Capacity => i64::from(session.attendees),
        }
    }

    fn trim(self, session: &mut Session, value: i64) {
        match self {
            Requirement::Duration => session.requested_duration = TimeDelta::seconds(value),
            Requirement::Capacity => {
                session.attendees = u32::try_from(value).unwrap_or(session.attendees)
            }
        }
    }

    fn describe(self, value: i64) -> String {
        match self {
            Requirement::Duration => format!("{} minutes", value / 60),
            Requirement::Capacity => value.to_string(),
        }
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Duration => f.write_str("duration"),
            Requirement::Capacity => f.write_str("capacity"),
        }
    }
}

/// Fails when movable sessions outnumber movable slots, then trims every
/// requirement that no remaining slot can satisfy.
///
/// Each trim is recorded as a violation and charged the
/// `session_requires_trim` weight as a fixed cost. The base schedule's own
/// cost is captured here as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityAdjuster;

impl CapacityAdjuster {
    pub fn new() -> Self {
        Self
    }

    /// Checks the movable pools and applies both passes.
    pub fn adjust(&self, schedule: &mut Schedule) -> Result<usize> {
        let sessions = schedule.movable_sessions().count();
        let timeslots = schedule.movable_timeslots().count();
        if sessions > timeslots {
            return Err(ScheduleError::InsufficientTimeslots {
                sessions,
                timeslots,
            });
        }

        let trims = adjust_requirement(schedule, Requirement::Duration)
            + adjust_requirement(schedule, Requirement::Capacity);

        if schedule.base_schedule().is_some() {
            schedule.capture_base_cost();
        }
        Ok(trims)
    }
}

impl<R: Rng> Phase<R> for CapacityAdjuster {
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()> {
        let trims = self.adjust(solver_scope.schedule_mut())?;
        if trims > 0 {
            info!(event = "capacity_adjusted", trims = trims);
        }
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Capacity Adjustment"
    }
}

/// Greedily matches each session, largest requirement first, to the
/// smallest remaining slot that fits it. Sessions that fit nothing are
/// trimmed to the largest remaining value.
fn adjust_requirement(schedule: &mut Schedule, requirement: Requirement) -> usize {
    let mut available: Vec<i64> = schedule
        .movable_timeslots()
        .map(|slot| requirement.offered(slot))
        .collect();
    available.sort_unstable();

    let mut sessions: Vec<(usize, i64)> = schedule
        .movable_sessions()
        .map(|session| (session.index, requirement.requested(session)))
        .collect();
    sessions.sort_by(|a, b| b.1.cmp(&a.1));

    let mut trims = 0;
    for (index, requested) in sessions {
        if let Some(position) = available.iter().position(|&offered| requested <= offered) {
            available.remove(position);
            continue;
        }
        let Some(largest) = available.pop() else {
            break;
        };

        let session = schedule.session_mut(index);
        requirement.trim(session, largest);
        let violation = format!(
            "No timeslot with sufficient {} available for {}, requested {}, trimming to {}.",
            requirement,
            session.group,
            requirement.describe(requested),
            requirement.describe(largest),
        );
        info!(
            event = "session_trimmed",
            session = %session.id,
            group = %session.group,
            requirement = %requirement,
            requested = requested,
            trimmed_to = largest,
        );
        schedule.record_trim(violation);
        trims += 1;
    }
    trims
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use slotforge_core::domain::link_timeslots;
    use slotforge_core::Cost;
    use slotforge_scoring::Assignment;
    use slotforge_test::{at, penalty_table, slot, SessionBuilder, TRIM_PENALTY};

    fn schedule(sessions: Vec<Session>, base: Option<Assignment>) -> Schedule {
        let mut slots = vec![
            slot(0, 1, 100, at(18, 9, 0), 120),
            slot(1, 2, 50, at(18, 9, 0), 60),
            slot(2, 3, 30, at(18, 9, 0), 60),
        ];
        link_timeslots(&mut slots, TimeDelta::minutes(30));
        Schedule::new(slots, sessions, penalty_table(), base).unwrap()
    }

    #[test]
    fn test_oversized_session_is_trimmed() {
        let mut s = schedule(vec![SessionBuilder::new(0, 1, "plenary").attendees(500).build()], None);
        let trims = CapacityAdjuster::new().adjust(&mut s).unwrap();

        assert_eq!(trims, 1);
        assert_eq!(s.session(0).attendees, 100);
        let fixed = &s.fixed_costs().capacity;
        assert_eq!(fixed.cost, Cost::of(TRIM_PENALTY));
        assert_eq!(
            fixed.violations,
            vec![
                "No timeslot with sufficient capacity available for plenary, requested 500, trimming to 100."
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_greedy_matching_trims_second_largest() {
        // 90 takes the 100 seat room, 80 fits nothing that is left
        let sessions = vec![
            SessionBuilder::new(0, 1, "quic").attendees(90).build(),
            SessionBuilder::new(1, 2, "tls").attendees(80).build(),
            SessionBuilder::new(2, 3, "dnsop").attendees(5).build(),
        ];
        let mut s = schedule(sessions, None);
        let trims = CapacityAdjuster::new().adjust(&mut s).unwrap();

        assert_eq!(trims, 1);
        assert_eq!(s.session(0).attendees, 90);
        assert_eq!(s.session(1).attendees, 50);
        assert_eq!(s.session(2).attendees, 5);
    }

    #[test]
    fn test_duration_is_trimmed() {
        let sessions = vec![
            SessionBuilder::new(0, 1, "quic").duration_minutes(150).build(),
            SessionBuilder::new(1, 2, "tls").duration_minutes(120).build(),
        ];
        let mut s = schedule(sessions, None);
        CapacityAdjuster::new().adjust(&mut s).unwrap();

        assert_eq!(s.session(0).requested_duration, TimeDelta::minutes(120));
        assert_eq!(s.session(1).requested_duration, TimeDelta::minutes(60));
        let violations = &s.fixed_costs().capacity.violations;
        assert_eq!(violations.len(), 2);
        assert!(violations[0].contains("requested 150 minutes, trimming to 120 minutes"));
        assert_eq!(s.fixed_costs().capacity.cost, Cost::of(2 * TRIM_PENALTY));
    }

    #[test]
    fn test_too_many_sessions() {
        let sessions = (0..4)
            .map(|i| SessionBuilder::new(i, i as u64 + 1, &format!("g{i}")).build())
            .collect();
        let mut s = schedule(sessions, None);
        let err = CapacityAdjuster::new().adjust(&mut s).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InsufficientTimeslots {
                sessions: 4,
                timeslots: 3
            }
        ));
        assert!(s.fixed_costs().capacity.is_clean());
    }

    #[test]
    fn test_fixed_pools_are_ignored() {
        // the fixed session is large but sits in the base schedule
        let sessions = vec![
            SessionBuilder::new(0, 1, "plenary").attendees(400).build(),
            SessionBuilder::new(1, 2, "quic").attendees(40).build(),
        ];
        let mut base = Assignment::with_slot_count(3);
        base.place(0, 0);
        let mut s = schedule(sessions, Some(base));
        let trims = CapacityAdjuster::new().adjust(&mut s).unwrap();

        assert_eq!(trims, 0);
        assert_eq!(s.session(0).attendees, 400);
        assert_eq!(s.fixed_costs().base.cost, Cost::of(TRIM_PENALTY));
    }
}
