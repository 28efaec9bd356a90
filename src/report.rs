//! Repository activity reports built on top of the paginated collector.
//!
//! Counts and rankings only; fetching, rotation and truncation live in
//! [`crate::github`].

use chrono::{DateTime, Utc};

use crate::error::{FilterError, Result};
use crate::github::endpoints::{collection_url, QueryBuilder, QueryType};
use crate::github::PaginatedCollector;
use crate::model::{CollectionKind, Entity, EntityState};

/// Open pull requests at least this many days old count as old.
pub const OLD_PULL_REQUEST_DAYS: i64 = 30;
/// Open issues at least this many days old count as old.
pub const OLD_ISSUE_DAYS: i64 = 14;
/// Size of the contributor ranking.
pub const TOP_CONTRIBUTORS: usize = 30;

/// Keeps entities created within `[begin, end]`.
///
/// Input must be ascending by `created_at`; scanning stops at the first entity
/// created after `end`.
pub fn filter_entities(
    entities: Vec<Entity>,
    begin: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<Vec<Entity>, FilterError> {
    if begin.is_none() && end.is_none() {
        return Ok(entities);
    }

    let mut result = Vec::new();
    for (index, entity) in entities.into_iter().enumerate() {
        let created_at = entity
            .created_at()
            .ok_or(FilterError::MissingTimestamp { index })??;
        if begin.is_some_and(|b| created_at < b) {
            continue;
        }
        if end.is_some_and(|e| created_at > e) {
            break;
        }
        result.push(entity);
    }
    Ok(result)
}

/// `(login, contributions)` pairs, most contributions first.
pub fn top_contributors(entities: &[Entity], limit: usize) -> Vec<(String, u64)> {
    let mut ranking: Vec<(String, u64)> = entities
        .iter()
        .filter_map(|e| Some((e.login()?.to_string(), e.contributions().unwrap_or(0))))
        .collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking.truncate(limit);
    ranking
}

/// Number of entities created at least `days` days before `now`.
pub fn count_old(entities: &[Entity], now: DateTime<Utc>, days: i64) -> Result<usize, FilterError> {
    let mut old = 0;
    for (index, entity) in entities.iter().enumerate() {
        let created_at = entity
            .created_at()
            .ok_or(FilterError::MissingTimestamp { index })??;
        if (now - created_at).num_days() >= days {
            old += 1;
        }
    }
    Ok(old)
}

/// Whether the date window can contain entities old enough to count.
pub fn old_entities_in_range(
    begin: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    days: i64,
) -> bool {
    (begin.is_none() && end.is_none())
        || end.is_some_and(|e| (now - e).num_days() < days)
        || begin.is_some_and(|b| (now - b).num_days() > days)
}

/// Runs the report sections for one repository.
pub struct Analyzer {
    collector: PaginatedCollector,
    api_url: String,
    owner: String,
    repo: String,
    branch: String,
    begin: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl Analyzer {
    pub fn new(
        collector: PaginatedCollector,
        api_url: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
        branch: impl Into<String>,
    ) -> Self {
        Self {
            collector,
            api_url: api_url.into(),
            owner: owner.into(),
            repo: repo.into(),
            branch: branch.into(),
            begin: None,
            end: None,
        }
    }

    pub fn with_date_range(
        mut self,
        begin: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.begin = begin;
        self.end = end;
        self
    }

    fn url(&self, kind: CollectionKind) -> String {
        collection_url(&self.api_url, kind, &self.owner, &self.repo)
    }

    /// Top contributors by contribution count.
    pub async fn contributors(&self) -> Result<Vec<(String, u64)>> {
        tracing::info!("Get contributors...");
        let contributors = self
            .collector
            .collect_all(
                &self.url(CollectionKind::Contributors),
                &QueryBuilder::build(QueryType::Contributors),
                None,
            )
            .await?;
        tracing::info!("Total contributors: {}", contributors.len());
        Ok(top_contributors(&contributors, TOP_CONTRIBUTORS))
    }

    /// Pull requests or issues in `state` within the date window.
    pub async fn entities(&self, kind: CollectionKind, state: EntityState) -> Result<Vec<Entity>> {
        tracing::info!("Get {} {}...", state, kind);
        let query = QueryBuilder::build(QueryType::ByState {
            state,
            branch: self.branch.clone(),
        });
        let entities = self
            .collector
            .collect_all(&self.url(kind), &query, self.end)
            .await?;
        let filtered = filter_entities(entities, self.begin, self.end)?;
        tracing::info!("{} {}: {}", state, kind, filtered.len());
        Ok(filtered)
    }

    /// Open pull requests or issues older than `days`, or 0 when the window cannot hold any.
    pub async fn old_count(&self, kind: CollectionKind, days: i64, now: DateTime<Utc>) -> Result<usize> {
        if !old_entities_in_range(self.begin, self.end, now, days) {
            tracing::info!(
                "All open {} out of range [{:?}:{:?}]",
                kind,
                self.begin,
                self.end
            );
            return Ok(0);
        }

        let open = self.entities(kind, EntityState::Open).await?;
        let old = count_old(&open, now, days)?;
        tracing::info!("Old open {}: {}", kind, old);
        Ok(old)
    }
}
