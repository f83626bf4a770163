//! Accumulated checkout selections.

use rust_decimal::Decimal;

use super::pricing::{DiscountSpec, PriceBreakdown};
use super::selection::SelectionSet;
use super::step::CheckoutStep;
use crate::error::{AppError, Result};
use crate::models::{Appointment, CompletionRequest, LineItem, StaffUser};
use crate::roster::StaffChoice;

/// Everything chosen so far in one checkout.
///
/// Created fresh each time the wizard opens and dropped on close.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutState {
    pub selected_services: SelectionSet,
    pub selected_products: SelectionSet,
    pub staff: StaffChoice,
    /// User details of the chosen staff member.
    pub staff_details: Option<StaffUser>,
    pub discount: DiscountSpec,
    pub payment_method: String,
    tip_amount: Decimal,
    step: CheckoutStep,
}

impl CheckoutState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the services already booked on `appointment`.
    pub fn seeded_from(appointment: &Appointment) -> Self {
        Self {
            selected_services: appointment.service_ids().collect(),
            ..Self::default()
        }
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Move forward one step. Returns `false` at the terminal step.
    pub fn advance(&mut self) -> bool {
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step. Returns `false` at the first step.
    pub fn retreat(&mut self) -> bool {
        match self.step.back() {
            Some(prev) => {
                self.step = prev;
                true
            }
            None => false,
        }
    }

    pub fn tip_amount(&self) -> Decimal {
        self.tip_amount
    }

    pub fn set_tip(&mut self, amount: Decimal) -> Result<()> {
        if amount < Decimal::ZERO {
            return Err(AppError::validation("Tip amount cannot be negative"));
        }
        self.tip_amount = amount;
        Ok(())
    }

    pub fn select_staff(&mut self, choice: StaffChoice, details: Option<StaffUser>) {
        self.staff_details = match choice {
            StaffChoice::Any => None,
            StaffChoice::Specific(_) => details,
        };
        self.staff = choice;
    }

    /// Recompute the total from the current selections.
    pub fn price(&self, services: &[LineItem], products: &[LineItem]) -> PriceBreakdown {
        PriceBreakdown::compute(
            services,
            &self.selected_services,
            products,
            &self.selected_products,
            &self.discount,
            self.tip_amount,
        )
    }

    /// Package the selections into the completion patch.
    pub fn completion_request(&self) -> CompletionRequest {
        CompletionRequest {
            status: CompletionRequest::STATUS,
            services: self.selected_services.to_vec(),
            products: self.selected_products.to_vec(),
            tip_amount: self.tip_amount,
            payment_method: self.payment_method.clone(),
            staff_details: self.staff_details.clone(),
            discount_type: self.discount.kind(),
            discount_value: self.discount.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_appointment() {
        let appt = Appointment::new("a1").with_services(["s1", "s2"]);
        let state = CheckoutState::seeded_from(&appt);
        assert!(state.selected_services.contains("s1"));
        assert!(state.selected_services.contains("s2"));
        assert!(state.selected_products.is_empty());
        assert_eq!(state.step(), CheckoutStep::Services);
    }

    #[test]
    fn test_step_bounds() {
        let mut state = CheckoutState::new();
        assert!(!state.retreat());
        assert_eq!(state.step(), CheckoutStep::Services);

        assert!(state.advance());
        assert!(state.advance());
        assert!(state.advance());
        assert_eq!(state.step(), CheckoutStep::Payment);
        assert!(!state.advance());
        assert_eq!(state.step(), CheckoutStep::Payment);

        assert!(state.retreat());
        assert_eq!(state.step(), CheckoutStep::Staff);
    }

    #[test]
    fn test_negative_tip_rejected() {
        let mut state = CheckoutState::new();
        assert!(state.set_tip(Decimal::new(-1, 0)).is_err());
        assert_eq!(state.tip_amount(), Decimal::ZERO);
        state.set_tip(Decimal::new(500, 2)).unwrap();
        assert_eq!(state.tip_amount(), Decimal::new(5, 0));
    }

    #[test]
    fn test_any_staff_drops_details() {
        let mut state = CheckoutState::new();
        let user = StaffUser {
            name: "Ana".to_string(),
            ..Default::default()
        };
        state.select_staff(StaffChoice::Specific("u1".to_string()), Some(user));
        assert!(state.staff_details.is_some());

        state.select_staff(StaffChoice::Any, None);
        assert_eq!(state.staff, StaffChoice::Any);
        assert!(state.staff_details.is_none());
    }

    #[test]
    fn test_completion_request() {
        let mut state = CheckoutState::new();
        state.selected_services.toggle("s2");
        state.selected_services.toggle("s1");
        state.selected_products.toggle("p1");
        state.set_tip(Decimal::new(3, 0)).unwrap();
        state.discount = DiscountSpec::fixed(Decimal::new(2, 0)).unwrap();
        state.payment_method = "card".to_string();

        let request = state.completion_request();
        assert_eq!(request.status, "completed");
        assert_eq!(request.services, vec!["s1".to_string(), "s2".to_string()]);
        assert_eq!(request.products, vec!["p1".to_string()]);
        assert_eq!(request.tip_amount, Decimal::new(3, 0));
        assert_eq!(request.payment_method, "card");
        assert_eq!(request.discount_type, "fixed");
        assert_eq!(request.discount_value, Decimal::new(2, 0));
    }
}
