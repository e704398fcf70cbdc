//! Shared test fixtures for SlotForge crates.
//!
//! This crate provides data builders only. It depends on `slotforge-core`
//! alone so every other crate can use it as a dev-dependency.
//!
//! - [`penalties`] - a standard penalty table covering every category
//! - [`builders`] - builders for `TimeSlot` and `Session` values
//! - [`records`] - raw input records and whole-meeting fixtures
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! slotforge-test = { workspace = true }
//! ```

pub mod builders;
pub mod penalties;
pub mod records;

pub use builders::{at, slot, SessionBuilder};
pub use penalties::{penalty_table, standard_penalties, TRIM_PENALTY};
pub use records::{
    constraint_record, meeting, meeting_from_json, minimal_penalties, session_record,
    timeslot_record, uniform_meeting,
};
