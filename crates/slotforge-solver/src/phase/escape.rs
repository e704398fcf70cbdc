//! Escape from local optima.

use rand::seq::SliceRandom;
use rand::Rng;
use slotforge_core::Result;
use slotforge_scoring::Schedule;
use tracing::debug;

use crate::phase::Phase;
use crate::scope::SolverScope;

/// Relocates every movable session whose last evaluated cost was nonzero.
///
/// Conflicted sessions are visited in random order. Each one is switched
/// into the first feasible slot of a random walk over the movable slots,
/// whether or not that lowers the cost. Relies on `last_cost` from the
/// most recent evaluation of the live schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeStep;

impl EscapeStep {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of sessions moved.
    pub fn apply<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> usize {
        let movable_slots = schedule.movable_slot_indices();
        let mut conflicted: Vec<usize> = schedule
            .assignment()
            .iter()
            .map(|(_, session)| session)
            .filter(|&session| {
                schedule
                    .session(session)
                    .last_cost
                    .is_some_and(|cost| !cost.is_zero())
            })
            .collect();
        conflicted.shuffle(rng);

        let mut moved = 0;
        for session in conflicted {
            let Some(from) = schedule.assignment().slot_of(session) else {
                continue;
            };
            let mut walk = movable_slots.clone();
            walk.shuffle(rng);
            if let Some(to) = walk
                .into_iter()
                .find(|&to| to != from && schedule.switch_is_feasible(from, to))
            {
                schedule.switch_sessions(from, to);
                moved += 1;
            }
        }

        debug!(event = "escape", moved = moved);
        moved
    }
}

impl<R: Rng> Phase<R> for EscapeStep {
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()> {
        let (schedule, rng) = solver_scope.parts_mut();
        self.apply(schedule, rng);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Escape"
    }
}
