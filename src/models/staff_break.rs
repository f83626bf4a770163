//! Staff break DTOs.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize, Serializer};

/// Break record submitted to the staff break endpoint.
///
/// Times are wall-clock times in the salon's time zone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BreakRequest {
    #[serde(rename = "id")]
    pub staff_id: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub duration_minutes: u32,
    #[serde(serialize_with = "hms")]
    pub start_time: NaiveTime,
    #[serde(serialize_with = "hms")]
    pub end_time: NaiveTime,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u32,
}

fn hms<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&time.format("%H:%M:%S"))
}

/// Response of the staff break endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreakReceipt {
    #[serde(default)]
    pub message: Option<String>,
}
