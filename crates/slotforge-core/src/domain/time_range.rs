//! Day and time-of-day buckets used by unavailability constraints.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};

use crate::error::ScheduleError;

/// Coarse part of the day a slot starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeOfDay {
    /// Starts before 12:30.
    Morning,
    /// Starts before 15:30.
    AfternoonEarly,
    AfternoonLate,
}

impl TimeOfDay {
    pub fn of(time: NaiveTime) -> Self {
        let minutes = time.hour() * 60 + time.minute();
        if minutes < 12 * 60 + 30 {
            TimeOfDay::Morning
        } else if minutes < 15 * 60 + 30 {
            TimeOfDay::AfternoonEarly
        } else {
            TimeOfDay::AfternoonLate
        }
    }

    pub const fn slug(&self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::AfternoonEarly => "afternoon-early",
            TimeOfDay::AfternoonLate => "afternoon-late",
        }
    }
}

/// A `<weekday>-<time-of-day>` bucket such as `monday-morning`.
///
/// # Examples
///
/// ```
/// use slotforge_core::domain::{TimeOfDay, TimeRange};
/// use chrono::Weekday;
///
/// let range: TimeRange = "tuesday-afternoon-early".parse().unwrap();
/// assert_eq!(range.day, Weekday::Tue);
/// assert_eq!(range.time_of_day, TimeOfDay::AfternoonEarly);
/// assert_eq!(range.to_string(), "tuesday-afternoon-early");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    pub day: Weekday,
    pub time_of_day: TimeOfDay,
}

impl TimeRange {
    pub fn new(day: Weekday, time_of_day: TimeOfDay) -> Self {
        Self { day, time_of_day }
    }

    /// Returns the bucket a start time falls into.
    pub fn of(start: NaiveDateTime) -> Self {
        Self::new(start.weekday(), TimeOfDay::of(start.time()))
    }
}

const WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday"),
    (Weekday::Tue, "tuesday"),
    (Weekday::Wed, "wednesday"),
    (Weekday::Thu, "thursday"),
    (Weekday::Fri, "friday"),
    (Weekday::Sat, "saturday"),
    (Weekday::Sun, "sunday"),
];

const TIMES_OF_DAY: [TimeOfDay; 3] = [
    TimeOfDay::Morning,
    TimeOfDay::AfternoonEarly,
    TimeOfDay::AfternoonLate,
];

impl FromStr for TimeRange {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (day_part, rest) = lower
            .split_once('-')
            .ok_or_else(|| ScheduleError::UnknownTimeRange(s.to_string()))?;

        let day = WEEKDAYS
            .iter()
            .find(|(_, name)| *name == day_part)
            .map(|(day, _)| *day)
            .ok_or_else(|| ScheduleError::UnknownTimeRange(s.to_string()))?;
        let time_of_day = TIMES_OF_DAY
            .iter()
            .find(|t| t.slug() == rest)
            .copied()
            .ok_or_else(|| ScheduleError::UnknownTimeRange(s.to_string()))?;

        Ok(Self::new(day, time_of_day))
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let day = WEEKDAYS
            .iter()
            .find(|(day, _)| *day == self.day)
            .map(|(_, name)| *name)
            .unwrap_or("unknown");
        write!(f, "{}-{}", day, self.time_of_day.slug())
    }
}
