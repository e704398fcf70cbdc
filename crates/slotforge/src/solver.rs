//! Scheduling entry point that hides the phase wiring.

use slotforge_config::SchedulerConfig;
use slotforge_core::domain::records::MeetingData;
use slotforge_core::Result;
use slotforge_solver::{ScheduleOutcome, ScheduleRunner};

/// Schedules one meeting.
///
/// With the `console` feature, console output is initialized from
/// `config.verbosity` on the first call.
pub fn run_scheduler(
    data: &MeetingData,
    base_schedule: Option<&str>,
    config: &SchedulerConfig,
) -> Result<ScheduleOutcome> {
    #[cfg(feature = "console")]
    crate::console::init(config.verbosity);

    ScheduleRunner::new(config.clone()).solve(data, base_schedule)
}

/// Schedules one meeting with `scheduler.toml` from the working directory,
/// or the defaults when it is absent or invalid.
pub fn run_scheduler_with_default_config(
    data: &MeetingData,
    base_schedule: Option<&str>,
) -> Result<ScheduleOutcome> {
    let config = SchedulerConfig::load("scheduler.toml").unwrap_or_default();
    run_scheduler(data, base_schedule, &config)
}
