//! Cost model tests against whole schedules.

use chrono::TimeDelta;
use slotforge_core::domain::{link_timeslots, TimeRelation};
use slotforge_core::{Cost, Session, TimeSlot};
use slotforge_test::{at, penalty_table, slot, SessionBuilder, TRIM_PENALTY};

use super::*;

fn schedule(mut slots: Vec<TimeSlot>, sessions: Vec<Session>, base: Option<Assignment>) -> Schedule {
    link_timeslots(&mut slots, TimeDelta::minutes(30));
    Schedule::new(slots, sessions, penalty_table(), base).unwrap()
}

/// Two parallel rooms on Monday morning and one Tuesday slot.
fn parallel_slots() -> Vec<TimeSlot> {
    vec![
        slot(0, 1, 100, at(18, 9, 0), 60),
        slot(1, 2, 100, at(18, 9, 0), 60),
        slot(2, 1, 100, at(19, 9, 0), 60),
    ]
}

fn count_containing(report: &slotforge_core::CostReport, needle: &str) -> usize {
    report.violations.iter().filter(|v| v.contains(needle)).count()
}

#[test]
fn test_forced_group_conflict() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").conflict("tls", 5_000).build(),
        SessionBuilder::new(1, 2, "tls").build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(report.violations.len(), 1);
    assert_eq!(count_containing(&report, "group conflict"), 1);
    assert_eq!(report.cost, Cost::of(5_000));
}

#[test]
fn test_conflict_resolved_on_other_day() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").conflict("tls", 5_000).build(),
        SessionBuilder::new(1, 2, "tls").build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(2, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert!(report.is_clean());
    assert_eq!(s.session(0).last_cost, Some(Cost::ZERO));
}

#[test]
fn test_dynamic_cost_is_idempotent() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic")
            .conflict("tls", 5_000)
            .key_person(7, 300)
            .build(),
        SessionBuilder::new(1, 2, "tls").key_person(7, 200).build(),
        SessionBuilder::new(2, 3, "dnsop").attendees(500).build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();
    s.place(2, 2).unwrap();

    let first = s.calculate_dynamic_cost(None);
    let second = s.calculate_dynamic_cost(None);
    assert_eq!(first, second);
    assert!(s.cache().hits() > 0);
    // conflict + both sides of the key person + too small room
    assert_eq!(
        first.cost,
        Cost::of(5_000 + 300 + 200 + TRIM_PENALTY)
    );
}

#[test]
fn test_candidate_does_not_touch_last_cost() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").conflict("tls", 5_000).build(),
        SessionBuilder::new(1, 2, "tls").build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(2, 1).unwrap();
    s.calculate_dynamic_cost(None);

    let mut candidate = s.assignment().clone();
    candidate.swap(1, 2);
    let report = s.calculate_dynamic_cost(Some(&candidate));
    assert_eq!(report.cost, Cost::of(5_000));
    assert_eq!(s.session(0).last_cost, Some(Cost::ZERO));
}

#[test]
fn test_business_rules() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "newbof").bof().parent("art").build(),
        SessionBuilder::new(1, 2, "httpbis").parent("art").responsible(3).build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "bof_overlapping_area_wg"), 1);
    assert_eq!(report.cost, Cost::of(10_000));
}

#[test]
fn test_area_meeting_rules() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "art").area_meeting().responsible(4).build(),
        SessionBuilder::new(1, 2, "httpbis").parent("art").responsible(4).build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "area_overlapping_in_area"), 1);
    // shared responsible person is charged from both sides
    assert_eq!(count_containing(&report, "session_overlap_ad"), 2);
    assert_eq!(report.cost, Cost::of(10_000 + 2 * 100));
}

#[test]
fn test_double_booking_is_infinite() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").build(),
        SessionBuilder::new(1, 2, "quic").build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert!(report.cost.is_infinite());
    assert_eq!(count_containing(&report, "scheduled twice"), 2);
}

#[test]
fn test_sessions_out_of_order() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").build(),
        SessionBuilder::new(1, 2, "quic").build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    // id 2 on Monday, id 1 on Tuesday
    s.place(2, 0).unwrap();
    s.place(0, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    // charged once per session of the group
    assert_eq!(count_containing(&report, "out of order"), 2);
    assert_eq!(report.cost, Cost::of(2 * 100_000));

    s.switch_sessions(0, 2);
    assert!(s.calculate_dynamic_cost(None).is_clean());
}

/// One room on four consecutive days.
fn daily_slots() -> Vec<TimeSlot> {
    (0..4)
        .map(|day| slot(day, 1, 100, at(18 + day as u32, 9, 0), 60))
        .collect()
}

fn quic_sessions() -> Vec<Session> {
    vec![
        SessionBuilder::new(0, 1, "quic").build(),
        SessionBuilder::new(1, 2, "quic").build(),
        SessionBuilder::new(2, 3, "quic").build(),
    ]
}

#[test]
fn test_base_out_of_order_is_not_charged_to_movable() {
    // id 2 on Monday, id 1 on Tuesday, both fixed
    let mut base = Assignment::with_slot_count(4);
    base.place(0, 1);
    base.place(1, 0);
    let mut s = schedule(daily_slots(), quic_sessions(), Some(base));
    s.place(2, 2).unwrap();

    assert!(s.calculate_dynamic_cost(None).is_clean());

    let base_cost = s.calculate_base_cost();
    assert_eq!(count_containing(&base_cost, "quic: sessions out of order"), 2);
    assert_eq!(base_cost.cost, Cost::of(2 * 100_000));
}

#[test]
fn test_movable_out_of_order_with_ordered_base() {
    // id 1 on Tuesday, id 2 on Wednesday, both fixed
    let mut base = Assignment::with_slot_count(4);
    base.place(1, 0);
    base.place(2, 1);
    let mut s = schedule(daily_slots(), quic_sessions(), Some(base));
    s.place(0, 2).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "quic: sessions out of order"), 3);
    assert_eq!(report.cost, Cost::of(3 * 100_000));
    assert!(s.calculate_base_cost().is_clean());

    s.switch_sessions(0, 3);
    assert!(s.calculate_dynamic_cost(None).is_clean());
}

#[test]
fn test_time_relation() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic")
            .time_relation(TimeRelation::OneDaySeparation, 700)
            .build(),
        SessionBuilder::new(1, 2, "quic")
            .time_relation(TimeRelation::OneDaySeparation, 700)
            .build(),
    ];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.place(2, 1).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "time relation one-day-separation"), 2);
    assert_eq!(report.cost, Cost::of(1_400));
}

#[test]
fn test_adjacency() {
    let slots = vec![
        slot(0, 1, 100, at(18, 9, 0), 60),
        slot(1, 1, 100, at(18, 10, 15), 60),
        slot(2, 2, 100, at(18, 13, 0), 60),
    ];
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").adjacent_to("tls", 900).build(),
        SessionBuilder::new(1, 2, "tls").build(),
    ];
    let mut s = schedule(slots, sessions, None);
    s.place(0, 0).unwrap();
    s.place(2, 1).unwrap();
    assert_eq!(s.calculate_dynamic_cost(None).cost, Cost::of(900));

    s.switch_sessions(2, 1);
    assert!(s.calculate_dynamic_cost(None).is_clean());
}

#[test]
fn test_unavailable_time_range() {
    let sessions = vec![SessionBuilder::new(0, 1, "quic")
        .unavailable("monday-morning", 4_000)
        .build()];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "unavailable time range monday-morning"), 1);
    assert_eq!(report.cost, Cost::of(4_000));
}

#[test]
fn test_too_short_timeslot() {
    let sessions = vec![SessionBuilder::new(0, 1, "quic").duration_minutes(90).build()];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();

    let report = s.calculate_dynamic_cost(None);
    assert_eq!(count_containing(&report, "too short timeslot"), 1);
    assert_eq!(report.cost, Cost::of(TRIM_PENALTY));
}

#[test]
fn test_base_session_too_small_room_is_fixed_cost() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "plenary").attendees(400).build(),
        SessionBuilder::new(1, 2, "quic").build(),
    ];
    let mut base = Assignment::with_slot_count(3);
    base.place(0, 0);
    let mut s = schedule(parallel_slots(), sessions, Some(base));
    assert!(s.session(0).is_fixed);
    assert!(s.timeslot(0).is_fixed);

    s.capture_base_cost();
    assert_eq!(s.fixed_costs().base.cost, Cost::of(TRIM_PENALTY));

    s.place(2, 1).unwrap();
    let dynamic = s.calculate_dynamic_cost(None);
    assert!(dynamic.is_clean());

    let total = s.total_schedule_cost();
    assert_eq!(total.cost, Cost::of(TRIM_PENALTY));
    assert_eq!(count_containing(&total, "plenary: scheduled in too small room"), 1);
}

#[test]
fn test_fixed_pairs_are_not_charged() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").conflict("tls", 5_000).build(),
        SessionBuilder::new(1, 2, "tls").build(),
    ];
    let mut base = Assignment::with_slot_count(3);
    base.place(0, 0);
    base.place(1, 1);
    let mut s = schedule(parallel_slots(), sessions, Some(base));

    assert!(s.calculate_dynamic_cost(None).is_clean());
    assert!(s.calculate_base_cost().is_clean());
}

#[test]
fn test_place_rejects_fixed_and_occupied() {
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").build(),
        SessionBuilder::new(1, 2, "tls").build(),
        SessionBuilder::new(2, 3, "dnsop").build(),
    ];
    let mut base = Assignment::with_slot_count(3);
    base.place(0, 0);
    let mut s = schedule(parallel_slots(), sessions, Some(base));

    assert!(s.place(0, 1).is_err());
    s.place(1, 1).unwrap();
    assert!(s.place(1, 2).is_err());
    assert!(s.place(2, 1).is_err());
    assert_eq!(s.unplaced_sessions(), vec![2]);
    assert_eq!(s.movable_slot_indices(), vec![1, 2]);
}

#[test]
fn test_switch_feasibility() {
    let slots = vec![
        slot(0, 1, 100, at(18, 9, 0), 60),
        slot(1, 2, 20, at(18, 9, 0), 60),
        slot(2, 3, 100, at(18, 9, 0), 60),
    ];
    let sessions = vec![
        SessionBuilder::new(0, 1, "quic").attendees(80).build(),
        SessionBuilder::new(1, 2, "tls").attendees(10).build(),
    ];
    let mut s = schedule(slots, sessions, None);
    s.place(0, 0).unwrap();
    s.place(1, 1).unwrap();

    assert!(!s.switch_is_feasible(0, 1));
    assert_eq!(s.cost_for_switch(0, 1), Cost::INFINITE);
    assert!(s.switch_is_feasible(0, 2));
    assert_eq!(s.cost_for_switch(0, 2), Cost::ZERO);

    s.switch_sessions(0, 2);
    assert_eq!(s.assignment().get(2), Some(0));
    assert_eq!(s.assignment().get(0), None);
}

#[test]
fn test_best_snapshot() {
    let sessions = vec![SessionBuilder::new(0, 1, "quic").build()];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();

    assert!(s.offer_best(Cost::of(10)));
    assert!(!s.offer_best(Cost::of(10)));

    s.switch_sessions(0, 1);
    assert!(s.offer_best(Cost::of(5)));
    s.switch_sessions(1, 2);

    assert!(s.restore_best());
    assert_eq!(s.assignment().get(1), Some(0));
    assert_eq!(s.best().map(|b| b.cost), Some(Cost::of(5)));
}

#[test]
fn test_total_includes_trims() {
    let sessions = vec![SessionBuilder::new(0, 1, "quic").build()];
    let mut s = schedule(parallel_slots(), sessions, None);
    s.place(0, 0).unwrap();
    s.record_trim("quic: trimmed".to_string());

    let total = s.total_schedule_cost();
    assert_eq!(total.cost, s.fixed_costs().total());
    assert_eq!(total.violations, vec!["quic: trimmed".to_string()]);
}
