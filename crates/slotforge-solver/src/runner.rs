//! End-to-end scheduling runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use slotforge_config::SchedulerConfig;
use slotforge_core::domain::records::MeetingData;
use slotforge_core::{Cost, Result, ScheduleError};
use tracing::info;

use crate::loader::Loader;
use crate::phase::{CapacityAdjuster, CapacityPacker, InitialPlacer, LocalSearchOptimizer, Phase};
use crate::scope::SolverScope;
use crate::store::{Placement, ScheduleStore};

/// What a run hands back to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    /// Movable placements in slot order.
    pub placements: Vec<Placement>,
    /// Dynamic, base-schedule and trim violations, in that order.
    pub violations: Vec<String>,
    pub cost: Cost,
    /// Fixed part of `cost`.
    pub fixed_cost: Cost,
    pub runs: u32,
    pub converged: bool,
    /// Recoverable data issues found while loading.
    pub warnings: Vec<String>,
}

/// Sequences load, capacity adjustment, initial placement, local search
/// and capacity packing.
#[derive(Debug, Clone, Default)]
pub struct ScheduleRunner {
    config: SchedulerConfig,
}

impl ScheduleRunner {
    pub fn new(config: SchedulerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs one meeting. The random source is seeded from `random_seed`
    /// when configured, otherwise from the OS.
    pub fn solve(&self, data: &MeetingData, base_schedule: Option<&str>) -> Result<ScheduleOutcome> {
        let rng = match self.config.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        self.solve_with_rng(data, base_schedule, rng)
    }

    pub fn solve_with_rng<R: Rng>(
        &self,
        data: &MeetingData,
        base_schedule: Option<&str>,
        rng: R,
    ) -> Result<ScheduleOutcome> {
        info!(
            event = "solve_start",
            session_count = data.sessions.len(),
            timeslot_count = data.timeslots.len(),
            base_schedule = base_schedule.unwrap_or("none"),
            max_cycles = self.config.max_cycles,
        );

        let loaded = Loader::from_config(&self.config).load(data, base_schedule)?;
        let warnings = loaded.warnings.clone();
        let mut scope = SolverScope::with_rng(loaded.into_schedule()?, rng);
        scope.start_solving();

        run_phase(&mut CapacityAdjuster::new(), &mut scope)?;
        run_phase(&mut InitialPlacer::new(), &mut scope)?;
        run_phase(&mut LocalSearchOptimizer::new(self.config.max_cycles), &mut scope)?;
        run_phase(&mut CapacityPacker::new(), &mut scope)?;

        let runs = scope.runs();
        let converged = scope.converged();
        let duration = scope.elapsed().unwrap_or_default();
        let schedule = scope.schedule_mut();
        let report = schedule.total_schedule_cost();
        let placements = schedule
            .assignment()
            .iter()
            .map(|(slot, session)| {
                let session = schedule.session(session);
                Placement {
                    timeslot: schedule.timeslot(slot).id,
                    session: session.id,
                    cost: session.last_cost.unwrap_or(Cost::ZERO),
                }
            })
            .collect();
        let fixed_cost = schedule.fixed_costs().total();

        info!(
            event = "solve_end",
            duration_ms = duration.as_millis() as u64,
            runs = runs,
            converged = converged,
            cost = %report.cost,
            violations = report.violations.len(),
        );

        Ok(ScheduleOutcome {
            placements,
            violations: report.violations,
            cost: report.cost,
            fixed_cost,
            runs,
            converged,
            warnings,
        })
    }

    /// Runs one meeting and hands the result to `store` under `name`.
    pub fn solve_and_store<S: ScheduleStore>(
        &self,
        data: &MeetingData,
        base_schedule: Option<&str>,
        store: &mut S,
        name: &str,
    ) -> Result<ScheduleOutcome> {
        let outcome = self.solve(data, base_schedule)?;
        store
            .save(name, &outcome)
            .map_err(|e| ScheduleError::Persistence(Box::new(e)))?;
        Ok(outcome)
    }

    /// Runs independent meetings in parallel, one schedule and random
    /// source each. With a configured seed, meeting `i` uses `seed + i`.
    pub fn solve_batch(&self, meetings: &[MeetingData]) -> Vec<Result<ScheduleOutcome>> {
        meetings
            .par_iter()
            .enumerate()
            .map(|(i, data)| match self.config.random_seed {
                Some(seed) => {
                    self.solve_with_rng(data, None, StdRng::seed_from_u64(seed.wrapping_add(i as u64)))
                }
                None => self.solve_with_rng(data, None, StdRng::from_os_rng()),
            })
            .collect()
    }
}

fn run_phase<R: Rng, P: Phase<R>>(phase: &mut P, scope: &mut SolverScope<R>) -> Result<()> {
    let name = phase.phase_type_name();
    info!(event = "phase_start", phase = name);
    let started = std::time::Instant::now();

    phase.solve(scope)?;

    let cost = scope.schedule_mut().total_schedule_cost().cost;
    info!(
        event = "phase_end",
        phase = name,
        duration_ms = started.elapsed().as_millis() as u64,
        cost = %cost,
    );
    Ok(())
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
