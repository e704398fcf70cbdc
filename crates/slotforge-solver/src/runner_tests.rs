//! End-to-end scenarios.

use std::collections::HashSet;

use super::*;
use slotforge_core::domain::records::{AssignmentRecord, BaseScheduleRecord};
use slotforge_core::{SessionId, TimeSlotId};
use slotforge_test::{
    at, constraint_record, meeting, session_record, timeslot_record, uniform_meeting,
    TRIM_PENALTY,
};

use crate::store::MemoryStore;

fn runner(seed: u64) -> ScheduleRunner {
    ScheduleRunner::new(SchedulerConfig::new().with_max_cycles(20).with_random_seed(seed))
}

/// Every movable session placed once, in a distinct non-base slot.
fn assert_complete(data: &MeetingData, outcome: &ScheduleOutcome, base: &[TimeSlotId]) {
    let slots: HashSet<_> = outcome.placements.iter().map(|p| p.timeslot).collect();
    let sessions: HashSet<_> = outcome.placements.iter().map(|p| p.session).collect();
    assert_eq!(slots.len(), outcome.placements.len());
    assert_eq!(sessions.len(), outcome.placements.len());
    assert!(base.iter().all(|t| !slots.contains(t)));
    assert_eq!(outcome.placements.len(), data.sessions.len() - base.len());
}

#[test]
fn test_oversized_session_is_trimmed() {
    let mut data = uniform_meeting(3, 4);
    data.sessions[0].attendees = Some(500);

    let outcome = runner(1).solve(&data, None).unwrap();
    let trims: Vec<_> = outcome
        .violations
        .iter()
        .filter(|v| v.starts_with("No timeslot with sufficient capacity"))
        .collect();
    assert_eq!(trims.len(), 1);
    assert!(trims[0].contains("requested 500, trimming to 100"));
    assert_eq!(outcome.fixed_cost, Cost::of(TRIM_PENALTY));
    assert_eq!(outcome.cost, Cost::of(TRIM_PENALTY));
}

#[test]
fn test_clean_meeting_converges_on_first_run() {
    let data = uniform_meeting(13, 20);
    for seed in 0..4 {
        let outcome = runner(seed).solve(&data, None).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.runs, 1);
        assert!(outcome.violations.is_empty());
        assert_eq!(outcome.cost, Cost::ZERO);
        assert_complete(&data, &outcome, &[]);
        assert!(outcome.placements.iter().all(|p| p.cost == Cost::ZERO));
    }
}

#[test]
fn test_too_many_sessions_is_fatal() {
    let data = uniform_meeting(5, 4);
    let err = runner(1).solve(&data, None).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::InsufficientTimeslots {
            sessions: 5,
            timeslots: 4
        }
    ));
}

#[test]
fn test_base_session_in_small_room_stays_charged() {
    let mut data = meeting(
        vec![
            session_record(1, "plenary"),
            session_record(2, "quic"),
            session_record(3, "tls"),
        ],
        vec![
            timeslot_record(10, 1, 20, at(18, 9, 0), 60),
            timeslot_record(11, 2, 100, at(18, 9, 0), 60),
            timeslot_record(12, 1, 100, at(19, 9, 0), 60),
        ],
    );
    data.sessions[0].attendees = Some(80);
    let mut conflict = constraint_record("conflict", "quic");
    conflict.target = Some("plenary".to_string());
    data.constraints = vec![conflict];
    data.base_schedules = vec![BaseScheduleRecord {
        name: "ietf-base".to_string(),
        assignments: vec![AssignmentRecord {
            timeslot: TimeSlotId(10),
            session: SessionId(1),
        }],
    }];

    for seed in 0..4 {
        let outcome = runner(seed).solve(&data, Some("ietf-base")).unwrap();
        let base_violations: Vec<_> = outcome
            .violations
            .iter()
            .filter(|v| v.starts_with("plenary: scheduled in too small room"))
            .collect();
        assert_eq!(base_violations.len(), 1);
        assert_eq!(outcome.fixed_cost, Cost::of(TRIM_PENALTY));
        // quic is kept away from the plenary
        assert_eq!(outcome.cost, Cost::of(TRIM_PENALTY));
        assert!(outcome.converged);
        assert_complete(&data, &outcome, &[TimeSlotId(10)]);
    }
}

#[test]
fn test_total_never_below_fixed() {
    let mut data = uniform_meeting(6, 8);
    data.sessions[0].attendees = Some(300);
    data.sessions[1].requested_duration_minutes = 180;
    for (source, target) in [("group2", "group3"), ("group3", "group4"), ("group4", "group2")] {
        let mut conflict = constraint_record("conflict", source);
        conflict.target = Some(target.to_string());
        data.constraints.push(conflict);
    }

    for seed in 0..4 {
        let outcome = runner(seed).solve(&data, None).unwrap();
        assert!(outcome.cost >= outcome.fixed_cost);
        assert_eq!(outcome.fixed_cost, Cost::of(2 * TRIM_PENALTY));
        assert_complete(&data, &outcome, &[]);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let mut data = uniform_meeting(8, 12);
    for i in 0..7 {
        let mut conflict = constraint_record("conflic3", &format!("group{i}"));
        conflict.target = Some(format!("group{}", i + 1));
        data.constraints.push(conflict);
    }

    let first = runner(42).solve(&data, None).unwrap();
    let second = runner(42).solve(&data, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_solve_and_store() {
    let data = uniform_meeting(4, 8);
    let mut store = MemoryStore::new();

    let outcome = runner(5)
        .solve_and_store(&data, None, &mut store, "draft-1")
        .unwrap();
    let stored = store.get("draft-1").unwrap();
    assert_eq!(stored.placements, outcome.placements);
    assert_eq!(stored.cost, outcome.cost);

    // a stored schedule can seed a later run as its base schedule
    let mut next = data.clone();
    next.sessions.push(session_record(99, "late-bof"));
    next.base_schedules.push(store.base_schedule("draft-1").unwrap());
    let outcome = runner(5).solve(&next, Some("draft-1")).unwrap();
    assert_eq!(outcome.placements.len(), 1);
    assert_eq!(outcome.placements[0].session, SessionId(99));
}

#[test]
fn test_solve_batch() {
    let meetings = vec![uniform_meeting(4, 8), uniform_meeting(9, 4), uniform_meeting(7, 12)];
    let results = runner(3).solve_batch(&meetings);

    assert_eq!(results.len(), 3);
    assert!(results[0].as_ref().is_ok_and(|o| o.placements.len() == 4));
    assert!(matches!(
        results[1],
        Err(ScheduleError::InsufficientTimeslots { .. })
    ));
    assert!(results[2].as_ref().is_ok_and(|o| o.converged));
}
