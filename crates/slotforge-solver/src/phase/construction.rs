//! Initial placement of movable sessions.

use std::cmp::Reverse;

use rand::seq::SliceRandom;
use rand::Rng;
use slotforge_core::{Result, ScheduleError};
use slotforge_scoring::Schedule;
use tracing::trace;

use crate::phase::Phase;
use crate::scope::SolverScope;

/// Places every unplaced movable session, most complex first.
///
/// For each session the free movable slots are shuffled, then ordered by
/// the dynamic cost of placing the session there, the slot duration and
/// the slot capacity. The shuffle breaks ties. The first slot wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitialPlacer;

impl InitialPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Fills the schedule. Returns the number of sessions placed.
    pub fn fill<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> Result<usize> {
        let mut order = schedule.unplaced_sessions();
        order.sort_by_key(|&session| Reverse(schedule.session(session).complexity()));

        let mut placed = 0;
        for session in order {
            let mut candidates: Vec<usize> = schedule
                .movable_slot_indices()
                .into_iter()
                .filter(|&slot| !schedule.assignment().is_occupied(slot))
                .collect();
            if candidates.is_empty() {
                return Err(ScheduleError::InsufficientTimeslots {
                    sessions: schedule.movable_sessions().count(),
                    timeslots: schedule.movable_timeslots().count(),
                });
            }
            candidates.shuffle(rng);

            let mut ranked = Vec::with_capacity(candidates.len());
            for slot in candidates {
                let mut proposed = schedule.assignment().clone();
                proposed.place(slot, session);
                let cost = schedule.calculate_dynamic_cost(Some(&proposed)).cost;
                let timeslot = schedule.timeslot(slot);
                ranked.push(((cost, timeslot.duration, timeslot.capacity), slot));
            }
            ranked.sort_by_key(|&(key, _)| key);

            let ((cost, _, _), slot) = ranked[0];
            schedule.place(slot, session)?;
            trace!(
                event = "session_placed",
                session = %schedule.session(session).id,
                timeslot = %schedule.timeslot(slot).id,
                cost = %cost,
            );
            placed += 1;
        }
        Ok(placed)
    }
}

impl<R: Rng> Phase<R> for InitialPlacer {
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()> {
        let (schedule, rng) = solver_scope.parts_mut();
        self.fill(schedule, rng)?;
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Initial Placement"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use slotforge_core::domain::link_timeslots;
    use slotforge_core::{Cost, Session};
    use slotforge_scoring::Assignment;
    use slotforge_test::{at, penalty_table, slot, SessionBuilder};

    fn schedule(sessions: Vec<Session>, base: Option<Assignment>) -> Schedule {
        let mut slots = vec![
            slot(0, 1, 100, at(18, 9, 0), 60),
            slot(1, 2, 100, at(18, 9, 0), 60),
            slot(2, 1, 100, at(19, 9, 0), 60),
            slot(3, 2, 40, at(19, 9, 0), 60),
        ];
        link_timeslots(&mut slots, TimeDelta::minutes(30));
        Schedule::new(slots, sessions, penalty_table(), base).unwrap()
    }

    #[test]
    fn test_places_every_session_once() {
        let sessions = (0..4)
            .map(|i| SessionBuilder::new(i, i as u64 + 1, &format!("g{i}")).build())
            .collect();
        let mut s = schedule(sessions, None);
        let mut rng = StdRng::seed_from_u64(7);

        let placed = InitialPlacer::new().fill(&mut s, &mut rng).unwrap();
        assert_eq!(placed, 4);
        for session in 0..4 {
            assert!(s.assignment().contains_session(session));
        }
        assert_eq!(s.assignment().len(), 4);
    }

    #[test]
    fn test_avoids_conflicting_slot() {
        let sessions = vec![
            SessionBuilder::new(0, 1, "quic").conflict("tls", 5_000).build(),
            SessionBuilder::new(1, 2, "tls").build(),
        ];
        for seed in 0..8 {
            let mut s = schedule(sessions.clone(), None);
            let mut rng = StdRng::seed_from_u64(seed);
            InitialPlacer::new().fill(&mut s, &mut rng).unwrap();
            assert_eq!(s.calculate_dynamic_cost(None).cost, Cost::ZERO);
        }
    }

    #[test]
    fn test_prefers_smaller_slot_on_ties() {
        let sessions = vec![SessionBuilder::new(0, 1, "quic").attendees(20).build()];
        for seed in 0..8 {
            let mut s = schedule(sessions.clone(), None);
            let mut rng = StdRng::seed_from_u64(seed);
            InitialPlacer::new().fill(&mut s, &mut rng).unwrap();
            assert_eq!(s.assignment().slot_of(0), Some(3));
        }
    }

    #[test]
    fn test_never_uses_base_slots() {
        let sessions = vec![
            SessionBuilder::new(0, 1, "plenary").build(),
            SessionBuilder::new(1, 2, "quic").build(),
            SessionBuilder::new(2, 3, "tls").build(),
        ];
        let mut base = Assignment::with_slot_count(4);
        base.place(3, 0);
        let mut s = schedule(sessions, Some(base));
        let mut rng = StdRng::seed_from_u64(1);

        InitialPlacer::new().fill(&mut s, &mut rng).unwrap();
        assert!(!s.assignment().is_occupied(3));
        assert!(!s.assignment().contains_session(0));
        assert!(s.assignment().contains_session(1));
        assert!(s.assignment().contains_session(2));
    }
}
