//! SlotForge - a conference session scheduler in Rust
//!
//! Places sessions into timeslots so that declared conflicts, business
//! rules and room requirements cost as little as possible.
//!
//! # Example
//!
//! ```rust
//! use slotforge::prelude::*;
//!
//! let cost = Cost::of(100) + Cost::of(20);
//! assert_eq!(cost.value(), 120);
//! assert!((cost + Cost::INFINITE).is_infinite());
//! ```

pub use slotforge_config::{ConfigError, SchedulerConfig};
pub use slotforge_core::domain::records::{
    AssignmentRecord, BaseScheduleRecord, ConstraintRecord, MeetingData, SessionRecord,
    TimeSlotRecord,
};
pub use slotforge_core::{
    BusinessConstraint, ConstraintKind, Cost, CostReport, PenaltyTable, Result, ScheduleError,
    Session, TimeRange, TimeRelation, TimeSlot,
};
pub use slotforge_scoring::{Assignment, Schedule};
pub use slotforge_solver::{
    Loader, MemoryStore, Placement, ScheduleOutcome, ScheduleRunner, ScheduleStore,
};

#[cfg(feature = "console")]
pub mod console;

mod solver;
pub use solver::{run_scheduler, run_scheduler_with_default_config};

pub mod prelude {
    pub use super::{
        run_scheduler, Cost, CostReport, MeetingData, Result, ScheduleError, ScheduleOutcome,
        ScheduleRunner, SchedulerConfig,
    };
}
