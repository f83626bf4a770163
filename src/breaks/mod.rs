//! Staff break scheduling: durations, break window, validation, and the picker.

pub mod form;
pub mod scheduler;
pub mod window;

pub use form::{FieldErrors, validate};
pub use scheduler::{ALL_STAFF, BreakScheduler, ScheduleSettings};
pub use window::{BreakDuration, BreakWindow, day_of_week, format_12h, format_duration, wall_clock};
