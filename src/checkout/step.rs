//! Checkout wizard steps.

use std::fmt;

/// Current page of the checkout wizard.
///
/// Moves strictly one step at a time; `next` and `back` return `None` where
/// the move is not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutStep {
    #[default]
    Services,
    Products,
    Staff,
    Payment,
}

impl CheckoutStep {
    /// All steps in order.
    pub const ALL: [CheckoutStep; 4] = [Self::Services, Self::Products, Self::Staff, Self::Payment];

    /// Total number of steps.
    pub const TOTAL: usize = Self::ALL.len();

    /// Zero-based position.
    pub fn index(self) -> usize {
        match self {
            Self::Services => 0,
            Self::Products => 1,
            Self::Staff => 2,
            Self::Payment => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::Services => Some(Self::Products),
            Self::Products => Some(Self::Staff),
            Self::Staff => Some(Self::Payment),
            Self::Payment => None,
        }
    }

    pub fn back(self) -> Option<Self> {
        match self {
            Self::Services => None,
            Self::Products => Some(Self::Services),
            Self::Staff => Some(Self::Products),
            Self::Payment => Some(Self::Staff),
        }
    }

    pub fn is_first(self) -> bool {
        self.back().is_none()
    }

    /// Only the terminal step may finalize.
    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Services => "Select Services",
            Self::Products => "Select Products",
            Self::Staff => "Select Staff",
            Self::Payment => "Payment & Tip",
        }
    }

    /// Progress bar fill, 0-100.
    pub fn progress_percent(self) -> f32 {
        (self.index() + 1) as f32 / Self::TOTAL as f32 * 100.0
    }

    /// Footer label, e.g. "Step 2 of 4".
    pub fn label(self) -> String {
        format!("Step {} of {}", self.index() + 1, Self::TOTAL)
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_back_from_first_is_unavailable() {
        assert_eq!(CheckoutStep::Services.back(), None);
        assert!(CheckoutStep::Services.is_first());
    }

    #[test]
    fn test_next_from_terminal_is_unavailable() {
        assert_eq!(CheckoutStep::Payment.next(), None);
        assert!(CheckoutStep::Payment.is_terminal());
        assert!(!CheckoutStep::Staff.is_terminal());
    }

    #[test]
    fn test_reachable_states_without_skipping() {
        let mut seen = HashSet::new();
        let mut step = CheckoutStep::default();
        seen.insert(step);
        while let Some(next) = step.next() {
            assert_eq!(next.index(), step.index() + 1);
            step = next;
            seen.insert(step);
        }
        assert_eq!(seen.len(), CheckoutStep::TOTAL);
        assert_eq!(step, CheckoutStep::Payment);
    }

    #[test]
    fn test_next_and_back_are_inverse() {
        for step in CheckoutStep::ALL {
            if let Some(next) = step.next() {
                assert_eq!(next.back(), Some(step));
            }
        }
    }

    #[test]
    fn test_index_matches_order() {
        for (i, step) in CheckoutStep::ALL.iter().enumerate() {
            assert_eq!(step.index(), i);
        }
    }

    #[test]
    fn test_progress_and_label() {
        assert_eq!(CheckoutStep::Services.progress_percent(), 25.0);
        assert_eq!(CheckoutStep::Payment.progress_percent(), 100.0);
        assert_eq!(CheckoutStep::Products.label(), "Step 2 of 4");
    }
}
