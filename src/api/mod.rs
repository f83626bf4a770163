//! Booking API collaborators.
//!
//! Controllers never talk HTTP directly. They receive an implementation of
//! these traits; [`HttpBookingClient`] is the production one.

pub mod client;
#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{Appointment, BreakReceipt, BreakRequest, CompletionRequest, LineItem, PageRequest, StaffRecord};

pub use client::HttpBookingClient;

/// Source of the staff roster.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn fetch_all_staff(&self) -> Result<Vec<StaffRecord>>;
}

/// Source of sellable services and products.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn fetch_services(&self, page: &PageRequest) -> Result<Vec<LineItem>>;
    async fn fetch_products(&self, page: &PageRequest) -> Result<Vec<LineItem>>;
}

/// Appointment lookup and update.
#[async_trait]
pub trait AppointmentStore: Send + Sync {
    async fn get_appointment_by_id(&self, id: &str) -> Result<Appointment>;
    async fn update_appointment(&self, id: &str, patch: &CompletionRequest) -> Result<Appointment>;
}

/// Staff break persistence.
#[async_trait]
pub trait BreakStore: Send + Sync {
    async fn create_staff_break(&self, request: &BreakRequest) -> Result<BreakReceipt>;
}

/// Everything the checkout wizard needs.
pub trait CheckoutApi: StaffDirectory + Catalog + AppointmentStore {}

impl<T: StaffDirectory + Catalog + AppointmentStore> CheckoutApi for T {}

/// Everything the break scheduler needs.
pub trait BreakApi: StaffDirectory + BreakStore {}

impl<T: StaffDirectory + BreakStore> BreakApi for T {}

/// Check the `success` flag of a response envelope.
///
/// With `required`, a missing flag is an incomplete response.
fn check_success(success: Option<bool>, message: Option<String>, required: bool) -> Result<()> {
    match success {
        Some(true) => Ok(()),
        Some(false) => Err(AppError::Rejected(
            message.unwrap_or_else(|| "request was not successful".to_string()),
        )),
        None if required => Err(AppError::MissingField("success")),
        None => Ok(()),
    }
}

/// Envelope of `GET staff`.
#[derive(Debug, Deserialize)]
pub struct StaffListResponse {
    pub success: Option<bool>,
    pub staff: Option<Vec<StaffRecord>>,
    pub message: Option<String>,
}

impl StaffListResponse {
    pub fn into_result(self) -> Result<Vec<StaffRecord>> {
        check_success(self.success, self.message, true)?;
        self.staff.ok_or(AppError::MissingField("staff"))
    }
}

/// Envelope of `GET services`.
#[derive(Debug, Deserialize)]
pub struct ServiceListResponse {
    pub success: Option<bool>,
    pub services: Option<Vec<LineItem>>,
    pub message: Option<String>,
}

impl ServiceListResponse {
    pub fn into_result(self) -> Result<Vec<LineItem>> {
        check_success(self.success, self.message, false)?;
        self.services.ok_or(AppError::MissingField("services"))
    }
}

/// Envelope of `GET products`.
#[derive(Debug, Deserialize)]
pub struct ProductListResponse {
    pub success: Option<bool>,
    pub products: Option<Vec<LineItem>>,
    pub message: Option<String>,
}

impl ProductListResponse {
    pub fn into_result(self) -> Result<Vec<LineItem>> {
        check_success(self.success, self.message, false)?;
        self.products.ok_or(AppError::MissingField("products"))
    }
}

/// Envelope of the appointment endpoints.
#[derive(Debug, Deserialize)]
pub struct AppointmentResponse {
    pub success: Option<bool>,
    pub appointment: Option<Appointment>,
    pub message: Option<String>,
}

impl AppointmentResponse {
    /// Lookups must say `success: true`; updates only need the payload.
    pub fn into_result(self, require_success: bool) -> Result<Appointment> {
        check_success(self.success, self.message, require_success)?;
        self.appointment.ok_or(AppError::MissingField("appointment"))
    }
}

/// Envelope of `POST staff/breaks`.
#[derive(Debug, Deserialize)]
pub struct BreakResponse {
    pub success: Option<bool>,
    pub message: Option<String>,
}

impl BreakResponse {
    pub fn into_result(self) -> Result<BreakReceipt> {
        check_success(self.success, self.message.clone(), true)?;
        Ok(BreakReceipt { message: self.message })
    }
}
