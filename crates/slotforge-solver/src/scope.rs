//! Solver-level scope.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotforge_scoring::Schedule;

/// State owned by one run: the schedule, the random source and progress.
///
/// Nothing else observes the schedule until the run completes.
#[derive(Debug)]
pub struct SolverScope<R: Rng = StdRng> {
    schedule: Schedule,
    rng: R,
    start_time: Option<Instant>,
    runs: u32,
    converged: bool,
}

impl SolverScope<StdRng> {
    /// Creates a scope with an OS-seeded random source.
    pub fn new(schedule: Schedule) -> Self {
        Self::with_rng(schedule, StdRng::from_os_rng())
    }

    pub fn with_seed(schedule: Schedule, seed: u64) -> Self {
        Self::with_rng(schedule, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SolverScope<R> {
    pub fn with_rng(schedule: Schedule, rng: R) -> Self {
        Self {
            schedule,
            rng,
            start_time: None,
            runs: 0,
            converged: false,
        }
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.runs = 0;
        self.converged = false;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn schedule_mut(&mut self) -> &mut Schedule {
        &mut self.schedule
    }

    pub fn rng(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Splits the scope so a phase can mutate the schedule while drawing
    /// random numbers.
    pub fn parts_mut(&mut self) -> (&mut Schedule, &mut R) {
        (&mut self.schedule, &mut self.rng)
    }

    /// Optimiser runs performed so far.
    pub fn runs(&self) -> u32 {
        self.runs
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    pub fn record_optimisation(&mut self, runs: u32, converged: bool) {
        self.runs = runs;
        self.converged = converged;
    }

    pub fn into_schedule(self) -> Schedule {
        self.schedule
    }
}
