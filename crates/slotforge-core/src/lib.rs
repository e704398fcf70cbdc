//! SlotForge Core - Core types for session scheduling
//!
//! This crate provides the fundamental abstractions for SlotForge:
//! - Cost types for representing schedule quality
//! - Domain types for timeslots, sessions and raw input records
//! - Business-rule categories and penalty weights
//! - The error type shared by every stage of a run

pub mod cost;
pub mod domain;
pub mod error;
pub mod penalty;

pub use cost::{Cost, CostReport};
pub use domain::{
    LocationId, PersonId, Session, SessionConstraints, SessionId, TimeRange, TimeRelation,
    TimeSlot, TimeSlotId,
};
pub use error::{Result, ScheduleError};
pub use penalty::{BusinessConstraint, ConstraintKind, PenaltyTable};
