//! In-memory booking API for controller tests.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::{AppointmentStore, BreakStore, Catalog, StaffDirectory};
use crate::error::{AppError, Result};
use crate::models::{Appointment, BreakReceipt, BreakRequest, CompletionRequest, LineItem, PageRequest, StaffRecord};

/// Canned reply for one endpoint.
#[derive(Debug, Clone)]
pub enum Reply<T> {
    Ok(T),
    /// Transport or server failure.
    Network,
    /// Envelope without the `success` flag.
    Partial,
    /// The collaborator itself panics.
    Panic,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Network => Err(AppError::Remote {
                status: 503,
                message: "service unavailable".to_string(),
            }),
            Reply::Partial => Err(AppError::MissingField("success")),
            Reply::Panic => panic!("collaborator panicked"),
        }
    }
}

pub struct MockApi {
    pub staff: Mutex<Reply<Vec<StaffRecord>>>,
    pub services: Mutex<Reply<Vec<LineItem>>>,
    pub products: Mutex<Reply<Vec<LineItem>>>,
    pub lookup: Mutex<Reply<Appointment>>,
    pub update: Mutex<Reply<Appointment>>,
    pub create_break: Mutex<Reply<BreakReceipt>>,
    pub delay: Mutex<Duration>,
    pub calls: Mutex<Vec<String>>,
    pub updates: Mutex<Vec<(String, CompletionRequest)>>,
    pub breaks: Mutex<Vec<BreakRequest>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self {
            staff: Mutex::new(Reply::Ok(Vec::new())),
            services: Mutex::new(Reply::Ok(Vec::new())),
            products: Mutex::new(Reply::Ok(Vec::new())),
            lookup: Mutex::new(Reply::Network),
            update: Mutex::new(Reply::Network),
            create_break: Mutex::new(Reply::Ok(BreakReceipt::default())),
            delay: Mutex::new(Duration::ZERO),
            calls: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
            breaks: Mutex::new(Vec::new()),
        }
    }
}

impl MockApi {
    pub fn set<T>(slot: &Mutex<Reply<T>>, reply: Reply<T>) {
        *slot.lock().unwrap() = reply;
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.as_str() == name).count()
    }

    /// Capture the reply, then wait out the configured delay.
    ///
    /// The reply is taken before the delay so a slow request answers with
    /// what was configured when it started.
    async fn respond<T: Clone + Send>(&self, name: &str, slot: &Mutex<Reply<T>>) -> Result<T> {
        let reply = slot.lock().unwrap().clone();
        self.calls.lock().unwrap().push(name.to_string());
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        reply.get()
    }
}

#[async_trait]
impl StaffDirectory for MockApi {
    async fn fetch_all_staff(&self) -> Result<Vec<StaffRecord>> {
        self.respond("staff", &self.staff).await
    }
}

#[async_trait]
impl Catalog for MockApi {
    async fn fetch_services(&self, _page: &PageRequest) -> Result<Vec<LineItem>> {
        self.respond("services", &self.services).await
    }

    async fn fetch_products(&self, _page: &PageRequest) -> Result<Vec<LineItem>> {
        self.respond("products", &self.products).await
    }
}

#[async_trait]
impl AppointmentStore for MockApi {
    async fn get_appointment_by_id(&self, _id: &str) -> Result<Appointment> {
        self.respond("lookup", &self.lookup).await
    }

    async fn update_appointment(&self, id: &str, patch: &CompletionRequest) -> Result<Appointment> {
        self.updates.lock().unwrap().push((id.to_string(), patch.clone()));
        self.respond("update", &self.update).await
    }
}

#[async_trait]
impl BreakStore for MockApi {
    async fn create_staff_break(&self, request: &BreakRequest) -> Result<BreakReceipt> {
        self.breaks.lock().unwrap().push(request.clone());
        self.respond("break", &self.create_break).await
    }
}
