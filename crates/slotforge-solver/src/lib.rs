//! SlotForge Solver - schedule generation engine
//!
//! This crate provides:
//! - [`Loader`]: raw meeting records to slots, sessions and base schedule
//! - Phases: capacity adjustment, initial placement, local search with an
//!   escape step, and capacity packing
//! - [`SolverScope`]: the state a single run owns
//! - [`ScheduleRunner`]: sequences the phases and reports the outcome
//! - [`ScheduleStore`]: persistence hand-off for finished schedules

pub mod loader;
pub mod phase;
pub mod runner;
pub mod scope;
pub mod store;

pub use loader::{LoadedMeeting, Loader};
pub use phase::{
    CapacityAdjuster, CapacityPacker, EscapeStep, InitialPlacer, LocalSearchOptimizer,
    OptimiseOutcome, Phase,
};
pub use runner::{ScheduleOutcome, ScheduleRunner};
pub use scope::SolverScope;
pub use store::{MemoryStore, Placement, ScheduleStore, StoredSchedule};
