//! Wire models for backend requests and responses
//!
//! Field names on the wire are the backend's; Rust names are English.

pub mod auth;
pub mod expense;
pub mod profile;
pub mod suggestion;

pub use auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use expense::{DecisionExpenseRequest, DeleteExpenseResponse, Expense, ExpenseRequest};
pub use profile::{BudgetPeriod, ProfileUpdate, UserProfile};
pub use suggestion::{CategoryCheckRequest, CategoryCheckResponse, CategorySuggestion};

/// Lenient timestamp handling for backend dates
///
/// The backend emits naive ISO timestamps (`2025-07-11T14:30:00`) but some
/// deployments add an offset or fractional seconds. Anything unparseable
/// becomes `None` instead of failing the whole record.
pub(crate) mod timestamp {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.naive_local());
        }
        for format in NAIVE_FORMATS {
            if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(parsed);
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    pub fn serialize<S>(value: &Option<NaiveDateTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => {
                serializer.serialize_str(&value.format("%Y-%m-%dT%H:%M:%S").to_string())
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse))
    }

}
