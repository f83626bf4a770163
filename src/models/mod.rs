//! Data models for catalog items, staff, appointments, and staff breaks.

pub mod appointment;
pub mod catalog;
pub mod staff;
pub mod staff_break;

pub use appointment::{Appointment, AppointmentService, CompletionRequest};
pub use catalog::{LineItem, PageRequest};
pub use staff::{StaffRecord, StaffUser};
pub use staff_break::{BreakReceipt, BreakRequest};

/// Lenient field decoders for booking API payloads.
///
/// The API is not consistent about numbers versus strings, so ids and prices
/// accept both.
pub(crate) mod lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, de::Error};
    use serde_json::Value;
    use std::str::FromStr;

    /// Decode an id given as a string or a number.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!("expected id, got {other}"))),
        }
    }

    /// Decode a price given as a number, a numeric string, or null.
    ///
    /// Null and empty strings count as zero.
    pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Decimal::ZERO),
            Value::String(s) if s.trim().is_empty() => Ok(Decimal::ZERO),
            Value::String(s) => parse(s.trim()).map_err(D::Error::custom),
            Value::Number(n) => parse(&n.to_string()).map_err(D::Error::custom),
            other => Err(D::Error::custom(format!("expected price, got {other}"))),
        }
    }

    fn parse(raw: &str) -> Result<Decimal, String> {
        Decimal::from_str(raw)
            .or_else(|_| Decimal::from_scientific(raw))
            .map_err(|e| format!("invalid price '{raw}': {e}"))
    }
}
