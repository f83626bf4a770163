//! Break durations and the resulting time window.

use chrono::{DateTime, Datelike, NaiveTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use std::fmt;

use crate::error::{AppError, Result};
use crate::models::BreakRequest;

/// Break length in minutes: a multiple of 5 between 5 and 60.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BreakDuration(u32);

impl BreakDuration {
    pub const STEP_MINUTES: u32 = 5;
    pub const MAX_MINUTES: u32 = 60;

    pub fn new(minutes: u32) -> Result<Self> {
        if minutes == 0 || minutes > Self::MAX_MINUTES || minutes % Self::STEP_MINUTES != 0 {
            return Err(AppError::validation(format!(
                "Break duration must be a multiple of {} up to {} minutes, got {minutes}",
                Self::STEP_MINUTES,
                Self::MAX_MINUTES
            )));
        }
        Ok(Self(minutes))
    }

    /// The twelve selectable durations, shortest first.
    pub fn options() -> impl Iterator<Item = BreakDuration> {
        (1..=Self::MAX_MINUTES / Self::STEP_MINUTES).map(|i| Self(i * Self::STEP_MINUTES))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }

    pub fn as_delta(self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.0))
    }
}

impl fmt::Display for BreakDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_duration(self.0))
    }
}

/// Start and end instants of a break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BreakWindow {
    pub fn new(start: DateTime<Utc>, duration: BreakDuration) -> Self {
        Self {
            start,
            end: start + duration.as_delta(),
        }
    }

    /// Build the record sent to the break endpoint, using wall-clock times
    /// and weekday in `tz`.
    pub fn to_request(&self, staff_id: &str, name: &str, duration: BreakDuration, tz: Tz) -> BreakRequest {
        BreakRequest {
            staff_id: staff_id.to_string(),
            name: name.to_string(),
            duration_minutes: duration.minutes(),
            start_time: wall_clock(self.start, tz),
            end_time: wall_clock(self.end, tz),
            day_of_week: day_of_week(self.start, tz),
        }
    }
}

/// Time of day in `tz`, whole seconds.
pub fn wall_clock(instant: DateTime<Utc>, tz: Tz) -> NaiveTime {
    let time = instant.with_timezone(&tz).time();
    time.with_nanosecond(0).unwrap_or(time)
}

/// Day of week in `tz`, 0 = Sunday .. 6 = Saturday.
pub fn day_of_week(instant: DateTime<Utc>, tz: Tz) -> u32 {
    instant.with_timezone(&tz).weekday().num_days_from_sunday()
}

/// 12-hour display time, e.g. "2:05 PM".
pub fn format_12h(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{hour}:{:02} {}", time.minute(), if pm { "PM" } else { "AM" })
}

/// Human duration: "45 min", "1 hr", "1 hr 30 min", "2 hrs".
pub fn format_duration(minutes: u32) -> String {
    if minutes < 60 {
        return format!("{minutes} min");
    }
    let hours = minutes / 60;
    let rest = minutes % 60;
    let unit = if hours > 1 { "hrs" } else { "hr" };
    if rest > 0 {
        format!("{hours} {unit} {rest} min")
    } else {
        format!("{hours} {unit}")
    }
}
