//! Early termination of a collection at the end of a date window.
//!
//! Pages arrive sorted by ascending creation time (`direction=asc`), so the
//! first entity created at or after the end date marks the end of everything
//! worth fetching. Callers must uphold that ordering; a regression within the
//! scanned prefix is reported instead of silently mis-truncating.

use chrono::{DateTime, Utc};

use crate::error::FilterError;
use crate::model::{parse_timestamp, Entity};

/// Entities kept from one page.
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub kept: Vec<Entity>,
    /// An entity at or past the end date was found; later pages are newer still
    pub truncated: bool,
}

/// Creation time of the last entity kept so far.
#[derive(Debug, Clone, PartialEq)]
pub struct LastSeen {
    at: DateTime<Utc>,
    raw: String,
}

/// Keeps the leading entities created strictly before `end_date`.
///
/// Scanning stops at the first entity with `created_at >= end_date`; the rest
/// of the page is not inspected. `last_seen` carries the ordering check over
/// from earlier pages of the same collection; pass `&mut None` for the first.
pub fn filter_before(
    entities: Vec<Entity>,
    end_date: DateTime<Utc>,
    last_seen: &mut Option<LastSeen>,
) -> Result<Filtered, FilterError> {
    let mut kept = Vec::with_capacity(entities.len());

    for (index, entity) in entities.into_iter().enumerate() {
        let raw = entity
            .created_at_raw()
            .ok_or(FilterError::MissingTimestamp { index })?
            .to_string();
        let at = parse_timestamp(&raw)?;

        if let Some(previous) = last_seen.as_ref() {
            if at < previous.at {
                return Err(FilterError::unordered(previous.raw.clone(), raw));
            }
        }

        if at >= end_date {
            return Ok(Filtered {
                kept,
                truncated: true,
            });
        }

        *last_seen = Some(LastSeen { at, raw });
        kept.push(entity);
    }

    Ok(Filtered {
        kept,
        truncated: false,
    })
}
