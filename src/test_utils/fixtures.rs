//! Test fixtures and common test data.
//!
//! This module provides entity and timestamp generators used across the test suite.

use chrono::{DateTime, Utc};
use serde_json::json;

use crate::model::{parse_timestamp, Entity};

/// Parses a `YYYY-MM-DDTHH:MM:SSZ` literal.
pub fn timestamp(text: &str) -> DateTime<Utc> {
    parse_timestamp(text).unwrap()
}

/// An entity carrying only an id.
pub fn entity_id(id: u64) -> Entity {
    Entity::from(json!({ "id": id }))
}

/// A pull request or issue created at the given time.
pub fn entity_at(id: u64, created_at: &str) -> Entity {
    Entity::from(json!({ "id": id, "created_at": created_at }))
}

/// A contributor record as returned by the contributors endpoint.
pub fn contributor(login: &str, contributions: u64) -> Entity {
    Entity::from(json!({ "login": login, "contributions": contributions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_at() {
        let entity = entity_at(1, "2024-06-15T12:00:00Z");
        assert_eq!(entity.created_at_raw(), Some("2024-06-15T12:00:00Z"));
    }

    #[test]
    fn test_contributor() {
        let entity = contributor("octocat", 7);
        assert_eq!(entity.login(), Some("octocat"));
        assert_eq!(entity.contributions(), Some(7));
    }
}
