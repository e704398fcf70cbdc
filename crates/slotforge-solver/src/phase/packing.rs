//! Room packing among parallel slots.

use std::cmp::Reverse;

use rand::Rng;
use slotforge_core::Result;
use slotforge_scoring::Schedule;
use tracing::{debug, trace};

use crate::phase::Phase;
use crate::scope::SolverScope;

/// Moves larger sessions into larger rooms among slots with identical
/// start and end.
///
/// Only rooms change, never times, so overlap sets are preserved. A
/// reassignment that would raise the dynamic cost is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CapacityPacker;

impl CapacityPacker {
    pub fn new() -> Self {
        Self
    }

    /// Returns the number of parallel groups that were reassigned.
    pub fn pack(&self, schedule: &mut Schedule) -> usize {
        let mut processed = vec![false; schedule.timeslots().len()];
        let mut repacked = 0;

        for index in 0..schedule.timeslots().len() {
            if processed[index] {
                continue;
            }
            let parallel = schedule.timeslot(index).full_overlaps().to_vec();
            for &slot in &parallel {
                processed[slot] = true;
            }

            let mut slots: Vec<usize> = parallel
                .into_iter()
                .filter(|&slot| !schedule.timeslot(slot).is_fixed)
                .collect();
            if slots.len() < 2 {
                continue;
            }
            slots.sort_by_key(|&slot| Reverse(schedule.timeslot(slot).capacity));

            let mut sessions: Vec<Option<usize>> = slots
                .iter()
                .map(|&slot| schedule.assignment().get(slot))
                .collect();
            sessions.sort_by_key(|session| Reverse(session.map(|s| schedule.session(s).attendees)));

            let mut packed = schedule.assignment().clone();
            for (&slot, session) in slots.iter().zip(&sessions) {
                packed.take(slot);
                if let Some(session) = *session {
                    packed.place(slot, session);
                }
            }
            if &packed == schedule.assignment() {
                continue;
            }

            let before = schedule.calculate_dynamic_cost(None).cost;
            let after = schedule.calculate_dynamic_cost(Some(&packed)).cost;
            if after > before {
                trace!(
                    event = "pack_rejected",
                    timeslot = %schedule.timeslot(index).id,
                    before = %before,
                    after = %after,
                );
                continue;
            }
            schedule.replace_assignment(packed);
            repacked += 1;
        }

        schedule.calculate_dynamic_cost(None);
        debug!(event = "packed", groups = repacked);
        repacked
    }
}

impl<R: Rng> Phase<R> for CapacityPacker {
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()> {
        self.pack(solver_scope.schedule_mut());
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Capacity Packing"
    }
}
