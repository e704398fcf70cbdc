//! Phases of a scheduling run.
//!
//! Phases are executed in sequence by the runner:
//! - CapacityAdjuster: trims requirements no slot can satisfy
//! - InitialPlacer: builds a first complete movable schedule
//! - LocalSearchOptimizer: improves it run by run, with an EscapeStep
//!   when a run brings no change
//! - CapacityPacker: moves larger sessions into larger parallel rooms

pub mod capacity;
pub mod construction;
pub mod escape;
pub mod localsearch;
pub mod packing;

use std::fmt::Debug;

use rand::Rng;
use slotforge_core::Result;

use crate::scope::SolverScope;

pub use capacity::CapacityAdjuster;
pub use construction::InitialPlacer;
pub use escape::EscapeStep;
pub use localsearch::{LocalSearchOptimizer, OptimiseOutcome};
pub use packing::CapacityPacker;

/// A phase of the scheduling run.
///
/// # Type Parameters
/// * `R` - The random source
pub trait Phase<R: Rng>: Debug {
    /// Executes this phase against the scope's schedule.
    ///
    /// Only structural infeasibility is reported as an error.
    fn solve(&mut self, solver_scope: &mut SolverScope<R>) -> Result<()>;

    /// Returns the name of this phase type.
    fn phase_type_name(&self) -> &'static str;
}
