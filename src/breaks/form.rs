//! Break form validation.

use super::window::BreakDuration;

pub const MISSING_DURATION: &str = "Please select a break duration.";
pub const MISSING_STAFF: &str = "Please select a Staff";

/// Inline messages per form field. Empty means the form may be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub staff: Option<&'static str>,
    pub duration: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.staff.is_none() && self.duration.is_none()
    }

    pub fn count(&self) -> usize {
        usize::from(self.staff.is_some()) + usize::from(self.duration.is_some())
    }
}

/// Check both fields independently.
pub fn validate(staff_id: Option<&str>, duration: Option<BreakDuration>) -> FieldErrors {
    FieldErrors {
        staff: match staff_id {
            Some(id) if !id.trim().is_empty() => None,
            _ => Some(MISSING_STAFF),
        },
        duration: duration.is_none().then_some(MISSING_DURATION),
    }
}
