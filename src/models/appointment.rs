//! Appointment DTOs and the completion request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::lenient;
use super::staff::StaffUser;

/// Service booked on an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentService {
    #[serde(deserialize_with = "lenient::id")]
    pub service_id: String,
}

/// Appointment as returned by the appointment endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "appointmentServices")]
    pub appointment_services: Vec<AppointmentService>,
}

impl Appointment {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: None,
            appointment_services: Vec::new(),
        }
    }

    pub fn with_services<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.appointment_services = ids
            .into_iter()
            .map(|id| AppointmentService { service_id: id.into() })
            .collect();
        self
    }

    /// Ids of the services already booked.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.appointment_services.iter().map(|s| s.service_id.as_str())
    }

    pub fn is_completed(&self) -> bool {
        self.status.as_deref() == Some(CompletionRequest::STATUS)
    }
}

/// Patch sent to mark an appointment completed and invoiced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub status: &'static str,
    pub services: Vec<String>,
    pub products: Vec<String>,
    #[serde(rename = "tipAmount", with = "rust_decimal::serde::float")]
    pub tip_amount: Decimal,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    /// Assigned staff member; `None` for "any staff".
    #[serde(rename = "staffDetails", skip_serializing_if = "Option::is_none")]
    pub staff_details: Option<StaffUser>,
    #[serde(rename = "discountType")]
    pub discount_type: &'static str,
    #[serde(rename = "discountValue", with = "rust_decimal::serde::float")]
    pub discount_value: Decimal,
}

impl CompletionRequest {
    pub const STATUS: &'static str = "completed";
}
