use chrono::{DateTime, NaiveDateTime, Utc};
use serde_derive::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::FilterError;

/// Timestamp format used by the API and by caller-supplied date bounds.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` timestamp as UTC.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>, FilterError> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| FilterError::invalid_timestamp(text, e))
}

/// One record returned by the API: a contributor, pull request or issue.
///
/// The fetch engine only looks at `created_at`; everything else is carried
/// through untouched for the report layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Value);

impl Entity {
    /// Returns a top-level field of the record.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Raw `created_at` text, if present and a string.
    pub fn created_at_raw(&self) -> Option<&str> {
        self.field("created_at").and_then(Value::as_str)
    }

    /// Parsed `created_at`; `None` when the record has no such field.
    pub fn created_at(&self) -> Option<Result<DateTime<Utc>, FilterError>> {
        self.created_at_raw().map(parse_timestamp)
    }

    pub fn login(&self) -> Option<&str> {
        self.field("login").and_then(Value::as_str)
    }

    pub fn contributions(&self) -> Option<u64> {
        self.field("contributions").and_then(Value::as_u64)
    }
}

impl From<Value> for Entity {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
