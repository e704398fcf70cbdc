//! Schedule cost model for SlotForge.
//!
//! This crate owns the mutable half of a run:
//! - [`Assignment`]: the slot-to-session mapping
//! - [`Schedule`]: slots, sessions, fixed costs and the best snapshot
//! - [`CostModel`]: the per-session cost breakdown
//! - [`OverlapCostCache`]: memoized overlap costs keyed by overlap set

pub mod assignment;
pub mod cache;
pub mod cost_model;
pub mod schedule;

pub use assignment::Assignment;
pub use cache::{OverlapCheck, OverlapCostCache, OverlapKey, DEFAULT_CACHE_CAPACITY};
pub use cost_model::{CostModel, SessionCosts};
pub use schedule::{BestSchedule, FixedCosts, Schedule};

#[cfg(test)]
mod tests;
