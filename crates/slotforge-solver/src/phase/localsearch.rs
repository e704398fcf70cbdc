//! Run-based local search over slot switches.

use rand::seq::SliceRandom;
use rand::Rng;
use slotforge_config::DEFAULT_MAX_CYCLES;
use slotforge_core::{Cost, Result};
use slotforge_scoring::{BestSchedule, Schedule};
use tracing::debug;

use crate::phase::{EscapeStep, Phase};
use crate::scope::SolverScope;

/// Result of one optimisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptimiseOutcome {
    /// Runs started, including the converging one.
    pub runs: u32,
    /// Whether a zero dynamic cost was reached.
    pub converged: bool,
    pub best: BestSchedule,
    /// Best cost after each completed run.
    pub history: Vec<Cost>,
}

/// Improves the movable schedule run by run.
///
/// Each run visits the placed sessions in a fresh random order and moves
/// each one to the movable slot with the strictly lowest switch cost, ties
/// going to the first slot in slot order. The optimiser stops as soon as
/// the dynamic cost reaches zero. When a run ends at the same cost as the
/// one before, the next run starts with an [`EscapeStep`]. A run that
/// began with an escape is compared the same way, so a plateau the escape
/// did not leave triggers another escape on the following run. If the run
/// budget is exhausted, the best mapping seen is restored.
#[derive(Debug, Clone)]
pub struct LocalSearchOptimizer {
    max_cycles: u32,
    escape: EscapeStep,
}

impl Default for LocalSearchOptimizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CYCLES)
    }
}

impl LocalSearchOptimizer {
    pub fn new(max_cycles: u32) -> Self {
        Self {
            max_cycles,
            escape: EscapeStep::new(),
        }
    }

    pub fn max_cycles(&self) -> u32 {
        self.max_cycles
    }

    pub fn optimise<R: Rng>(&self, schedule: &mut Schedule, rng: &mut R) -> OptimiseOutcome {
        let movable_slots = schedule.movable_slot_indices();
        let mut best = BestSchedule {
            cost: schedule.calculate_dynamic_cost(None).cost,
            assignment: schedule.assignment().clone(),
        };
        let mut history = Vec::new();
        let mut previous_cost: Option<Cost> = None;
        let mut last_cost: Option<Cost> = None;

        for run in 1..=self.max_cycles {
            if escape_due(previous_cost, last_cost) {
                self.escape.apply(schedule, rng);
            }

            let mut pairs: Vec<(usize, usize)> = schedule.assignment().iter().collect();
            pairs.shuffle(rng);

            for (_, session) in pairs {
                let Some(current_slot) = schedule.assignment().slot_of(session) else {
                    continue;
                };
                let current = schedule.calculate_dynamic_cost(None).cost;
                if current.is_zero() {
                    return self.converge(schedule, run, history);
                }

                let mut best_switch = current;
                let mut target = None;
                for &slot in &movable_slots {
                    if slot == current_slot {
                        continue;
                    }
                    let cost = schedule.cost_for_switch(current_slot, slot);
                    if cost < best_switch {
                        best_switch = cost;
                        target = Some(slot);
                    }
                }
                if let Some(slot) = target {
                    schedule.switch_sessions(current_slot, slot);
                }
            }

            let cost = schedule.calculate_dynamic_cost(None).cost;
            if cost.is_zero() {
                return self.converge(schedule, run, history);
            }
            if cost < best.cost {
                best = BestSchedule {
                    cost,
                    assignment: schedule.assignment().clone(),
                };
            }
            history.push(best.cost);
            debug!(
                event = "run_end",
                run = run,
                cost = %cost,
                best = %best.cost,
            );

            previous_cost = last_cost;
            last_cost = Some(cost);
        }

        schedule.replace_assignment(best.assignment.clone());
        schedule.calculate_dynamic_cost(None);
        schedule.set_best(best.clone());
        OptimiseOutcome {
            runs: self.max_cycles,
            converged: false,
            best,
            history,
        }
    }

    fn converge(&self, schedule: &mut Schedule, run: u32, mut history: Vec<Cost>) -> OptimiseOutcome {
        let best = BestSchedule {
            cost: Cost::ZERO,
            assignment: schedule.assignment().clone(),
        };
        history.push(Cost::ZERO);
        schedule.set_best(best.clone());
        debug!(event = "converged", run = run);
        OptimiseOutcome {
            runs: run,
            converged: true,
            best,
            history,
        }
    }
}

impl<R: Rng> Phase<R> for LocalSearchOptimizer {
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()> {
        let (schedule, rng) = solver_scope.parts_mut();
        let outcome = self.optimise(schedule, rng);
        solver_scope.record_optimisation(outcome.runs, outcome.converged);
        Ok(())
    }

    fn phase_type_name(&self) -> &'static str {
        "Local Search"
    }
}

/// True when the last two completed runs ended at the same cost.
fn escape_due(previous: Option<Cost>, last: Option<Cost>) -> bool {
    previous.is_some() && previous == last
}

#[cfg(test)]
#[path = "localsearch_tests.rs"]
mod tests;
