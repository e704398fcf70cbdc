//! Error types for SlotForge

use thiserror::Error;

/// Main error type for SlotForge operations.
///
/// Every variant aborts the run. Imperfect schedules are never errors:
/// rule violations are expressed as cost instead.
#[derive(Debug, Error)]
pub enum ScheduleError {
    /// More movable sessions than movable timeslots.
    #[error("More sessions to schedule ({sessions}) than timeslots available ({timeslots})")]
    InsufficientTimeslots { sessions: usize, timeslots: usize },

    /// A constraint record carries a category the loader does not know.
    #[error("Unknown constraint type {category} for {group}")]
    UnknownConstraint { category: String, group: String },

    /// A constraint record lacks a field its category requires.
    #[error("Constraint {category} for {group} has no {field}")]
    IncompleteConstraint {
        category: String,
        group: String,
        field: &'static str,
    },

    /// A time-range bucket that does not parse as `<weekday>-<time-of-day>`.
    #[error("Unknown time range: {0}")]
    UnknownTimeRange(String),

    /// A record duration that does not fit the supported time range.
    #[error("Duration of {record} is out of range: {minutes} minutes")]
    DurationOutOfRange { record: String, minutes: i64 },

    /// A mandatory business-rule penalty weight is absent.
    #[error("Missing penalty weight for business constraint {0}")]
    MissingPenalty(&'static str),

    /// The requested base schedule does not exist.
    #[error("Base schedule {0} not found")]
    BaseScheduleNotFound(String),

    /// The requested base schedule name matches more than one schedule.
    #[error("Base schedule name {name} matches {count} schedules")]
    AmbiguousBaseSchedule { name: String, count: usize },

    /// A base schedule uses the same timeslot or session in two rows.
    #[error("Base schedule {name} assigns {entry} twice")]
    DuplicateBaseAssignment { name: String, entry: String },

    /// The external persistence collaborator failed.
    #[error("Failed to persist schedule: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Internal error (should not occur in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for SlotForge operations
pub type Result<T> = std::result::Result<T, ScheduleError>;
