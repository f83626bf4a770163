//! Staff roster records.

use serde::{Deserialize, Serialize};

use super::lenient;

/// User account attached to a staff member.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StaffUser {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Staff member as returned by the roster endpoint.
///
/// `id` identifies the staff row (used for breaks); `user_id` identifies the
/// person (used when assigning an appointment).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffRecord {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    #[serde(deserialize_with = "lenient::id")]
    pub user_id: String,
    #[serde(default)]
    pub user: StaffUser,
    #[serde(default)]
    pub position: Option<String>,
    /// Missing flag means unavailable.
    #[serde(default)]
    pub is_available: Option<bool>,
    #[serde(default)]
    pub services: Vec<serde_json::Value>,
    #[serde(default)]
    pub image: Option<String>,
}

impl StaffRecord {
    pub fn new(id: impl Into<String>, user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            user: StaffUser {
                name: name.into(),
                ..Default::default()
            },
            position: None,
            is_available: Some(true),
            services: Vec::new(),
            image: None,
        }
    }

    pub fn unavailable(mut self) -> Self {
        self.is_available = Some(false);
        self
    }

    pub fn is_available(&self) -> bool {
        self.is_available == Some(true)
    }

    pub fn display_name(&self) -> &str {
        &self.user.name
    }

    /// Number of services this staff member offers.
    pub fn service_count(&self) -> usize {
        self.services.len()
    }
}
