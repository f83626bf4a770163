//! Booking API HTTP client implementation.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::{
    AppointmentResponse, AppointmentStore, BreakResponse, BreakStore, Catalog, ProductListResponse,
    ServiceListResponse, StaffDirectory, StaffListResponse,
};
use crate::config::ApiConfig;
use crate::error::{AppError, Result};
use crate::models::{Appointment, BreakReceipt, BreakRequest, CompletionRequest, LineItem, PageRequest, StaffRecord};

/// Booking API client speaking JSON over HTTP.
pub struct HttpBookingClient {
    client: Client,
    base_url: String,
}

impl HttpBookingClient {
    /// Create a new client instance.
    ///
    /// # Arguments
    /// * `base_url` - API root (e.g., "http://localhost:4000/api")
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the `[api]` config section.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    fn url(&self, path: &str) -> String {
        format!("{base}/{path}", base = self.base_url, path = path.trim_start_matches('/'))
    }

    /// Turn a non-2xx response into [`AppError::Remote`], otherwise decode the body.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AppError::Remote {
                status: status.as_u16(),
                message: summarize_body(&message),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppError::parse(format!("Invalid response body: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, page: Option<&PageRequest>) -> Result<T> {
        let url = self.url(path);
        debug!("GET {url}");

        let mut request = self.client.get(&url);
        if let Some(page) = page {
            request = request.query(page);
        }
        Self::decode(request.send().await?).await
    }
}

/// Keep server error bodies short enough for a notice or a log line.
fn summarize_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= LIMIT {
        trimmed.to_string()
    } else {
        let cut: String = trimmed.chars().take(LIMIT).collect();
        format!("{cut}...")
    }
}

#[async_trait]
impl StaffDirectory for HttpBookingClient {
    async fn fetch_all_staff(&self) -> Result<Vec<StaffRecord>> {
        self.get::<StaffListResponse>("staff", None).await?.into_result()
    }
}

#[async_trait]
impl Catalog for HttpBookingClient {
    async fn fetch_services(&self, page: &PageRequest) -> Result<Vec<LineItem>> {
        self.get::<ServiceListResponse>("services", Some(page)).await?.into_result()
    }

    async fn fetch_products(&self, page: &PageRequest) -> Result<Vec<LineItem>> {
        self.get::<ProductListResponse>("products", Some(page)).await?.into_result()
    }
}

#[async_trait]
impl AppointmentStore for HttpBookingClient {
    async fn get_appointment_by_id(&self, id: &str) -> Result<Appointment> {
        self.get::<AppointmentResponse>(&format!("appointments/{id}"), None)
            .await?
            .into_result(true)
    }

    async fn update_appointment(&self, id: &str, patch: &CompletionRequest) -> Result<Appointment> {
        let url = self.url(&format!("appointments/{id}"));
        debug!("PUT {url}");

        let response = self.client.put(&url).json(patch).send().await?;
        Self::decode::<AppointmentResponse>(response).await?.into_result(false)
    }
}

#[async_trait]
impl BreakStore for HttpBookingClient {
    async fn create_staff_break(&self, request: &BreakRequest) -> Result<BreakReceipt> {
        let url = self.url("staff/breaks");
        debug!("POST {url}");

        let response = self.client.post(&url).json(request).send().await?;
        Self::decode::<BreakResponse>(response).await?.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let client = HttpBookingClient::new("http://localhost:4000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.url("staff"), "http://localhost:4000/api/staff");
        assert_eq!(client.url("/appointments/3"), "http://localhost:4000/api/appointments/3");
    }

    #[test]
    fn test_from_config() {
        let client = HttpBookingClient::from_config(&ApiConfig::default()).unwrap();
        assert_eq!(client.base_url, "http://localhost:4000/api");
    }

    #[test]
    fn test_summarize_long_body() {
        let body = "x".repeat(500);
        let summary = summarize_body(&body);
        assert_eq!(summary.len(), 203);
        assert!(summary.ends_with("..."));
        assert_eq!(summarize_body("  short  "), "short");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = HttpBookingClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client.fetch_all_staff().await.unwrap_err();
        assert!(matches!(err, AppError::Http(_)));
    }
}
