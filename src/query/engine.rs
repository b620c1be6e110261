//! Query engine implementation
//!
//! Provides the read-only operations over the record set:
//! - Filtered listing (conjunctive, independently optional filters)
//! - Cross-field substring search
//! - Follow-up candidate detection (date-driven staleness)
//! - Status-grouped statistics
//!
//! Any operation that depends on the current date takes it as an explicit
//! parameter; the engine never reads the ambient clock.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Application, Status};
use crate::query::resolver::{Resolution, resolve_token};
use crate::storage::SqliteStore;
use crate::validate::days_between;
use crate::{Error, Result};

/// Filters for `list`. Each is independently optional; set filters are
/// combined with AND.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    /// Case-insensitive substring of the company name
    pub company: Option<String>,
    /// Exact status match
    pub status: Option<Status>,
    /// Exclude terminal-closed statuses (Rejected, Ghosted, Withdrawn)
    pub active_only: bool,
}

/// Aggregate pipeline counts
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    /// Count per status, in pipeline order, zero-count statuses included
    pub by_status: Vec<(Status, usize)>,
    pub total: usize,
    pub active: usize,
    /// Applications submitted within the trailing 30 days
    pub applied_last_30_days: usize,
}

/// Query engine for read-only operations over one open store
pub struct QueryEngine<'a> {
    store: &'a SqliteStore,
}

impl<'a> QueryEngine<'a> {
    /// Create a new query engine
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// List applications matching the filter, in insertion order
    pub fn list(&self, filter: &ListFilter) -> Result<Vec<Application>> {
        self.store
            .list_filtered(filter.company.as_deref(), filter.status, filter.active_only)
    }

    /// Case-insensitive substring search across company OR role OR notes
    pub fn search(&self, query: &str) -> Result<Vec<Application>> {
        self.store.search(query)
    }

    /// Applications in an awaiting-response status whose age exceeds `days`.
    ///
    /// Age is the calendar-day difference between `date_applied` and `today`,
    /// compared strictly: a record exactly `days` old is not yet a candidate.
    /// Returns an empty vec (not an error) when none qualify.
    pub fn followups(&self, days: i64, today: NaiveDate) -> Result<Vec<Application>> {
        let candidates = self.store.awaiting_response()?;
        Ok(candidates
            .into_iter()
            .filter(|app| days_between(app.date_applied, today) > days)
            .collect())
    }

    /// Status-grouped counts plus derived aggregates, computed in one pass
    /// with the same predicates `list` and `followups` build on.
    pub fn stats(&self, today: NaiveDate) -> Result<PipelineStats> {
        let applications = self.store.all()?;
        let period_start = today - chrono::Days::new(30);

        let by_status = Status::all()
            .iter()
            .map(|status| {
                let count = applications
                    .iter()
                    .filter(|app| app.status == *status)
                    .count();
                (*status, count)
            })
            .collect();

        let active = applications
            .iter()
            .filter(|app| app.status.is_active())
            .count();
        let applied_last_30_days = applications
            .iter()
            .filter(|app| app.date_applied > period_start && app.date_applied <= today)
            .count();

        Ok(PipelineStats {
            by_status,
            total: applications.len(),
            active,
            applied_last_30_days,
        })
    }

    /// Resolve an id-or-company-fragment token to exactly one id, mapping
    /// the tagged resolver outcome onto the error taxonomy for mutation
    /// call sites.
    pub fn resolve(&self, token: &str) -> Result<i64> {
        match resolve_token(token, &self.store.all()?) {
            Resolution::Id(id) => Ok(id),
            Resolution::NotFound => Err(Error::NotFound(format!(
                "no application matches company query '{}'",
                token
            ))),
            Resolution::Ambiguous(candidates) => Err(Error::Ambiguous {
                token: token.to_string(),
                candidates,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewApplication, Status};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()
    }

    fn seed(store: &SqliteStore, company: &str, status: Status, applied: NaiveDate) -> i64 {
        store
            .create(
                &NewApplication::new(company, "Intern")
                    .with_status(status)
                    .with_date_applied(applied),
                today(),
            )
            .unwrap()
    }

    #[test]
    fn test_list_active_only_excludes_every_terminal_status() {
        let store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        for status in Status::all() {
            seed(&store, &format!("{}Co", status.as_str()), *status, date);
        }

        let engine = QueryEngine::new(&store);
        let active = engine
            .list(&ListFilter { active_only: true, ..Default::default() })
            .unwrap();

        assert_eq!(active.len(), 5);
        assert!(active.iter().all(|app| app.status.is_active()));
    }

    #[test]
    fn test_list_filters_are_conjunctive() {
        let store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        seed(&store, "Acme", Status::Applied, date);
        seed(&store, "Acme Robotics", Status::Rejected, date);
        seed(&store, "Globex", Status::Applied, date);

        let engine = QueryEngine::new(&store);
        let results = engine
            .list(&ListFilter {
                company: Some("acme".into()),
                status: Some(Status::Applied),
                active_only: false,
            })
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].company, "Acme");
    }

    #[test]
    fn test_search_unions_across_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        store
            .create(
                &NewApplication::new("Flatiron Institute", "Database Intern")
                    .with_date_applied(date),
                today(),
            )
            .unwrap();
        store
            .create(
                &NewApplication::new("OtherCo", "Backend Intern")
                    .with_date_applied(date)
                    .with_notes("flat-rate bonus mentioned in posting"),
                today(),
            )
            .unwrap();
        store
            .create(
                &NewApplication::new("Unrelated", "Intern").with_date_applied(date),
                today(),
            )
            .unwrap();

        let engine = QueryEngine::new(&store);
        let results = engine.search("flat").unwrap();

        assert_eq!(results.len(), 2);
        let companies: Vec<&str> = results.iter().map(|a| a.company.as_str()).collect();
        assert!(companies.contains(&"Flatiron Institute"));
        assert!(companies.contains(&"OtherCo"));
    }

    #[test]
    fn test_search_matches_role_case_insensitively() {
        let store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        seed(&store, "SomeCo", Status::Applied, date);
        store
            .create(
                &NewApplication::new("ToolsCo", "Flatiron Tools Engineer")
                    .with_date_applied(date),
                today(),
            )
            .unwrap();

        let engine = QueryEngine::new(&store);
        let results = engine.search("FLATIRON").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].role, "Flatiron Tools Engineer");
    }

    #[test]
    fn test_followups_boundary_is_strict() {
        let store = SqliteStore::open_in_memory().unwrap();
        // Exactly 10 days old: excluded. 11 days old: included.
        seed(
            &store,
            "BoundaryCo",
            Status::Applied,
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        );
        seed(
            &store,
            "StaleCo",
            Status::Applied,
            NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
        );

        let engine = QueryEngine::new(&store);
        let due = engine.followups(10, today()).unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].company, "StaleCo");
    }

    #[test]
    fn test_followups_ignore_later_stage_applications() {
        let store = SqliteStore::open_in_memory().unwrap();
        let month_ago = NaiveDate::from_ymd_opt(2025, 2, 18).unwrap();
        seed(&store, "InterviewCo", Status::Interview, month_ago);
        seed(&store, "OfferCo", Status::Offer, month_ago);
        seed(&store, "RejectedCo", Status::Rejected, month_ago);
        seed(&store, "ScreenCo", Status::RecruiterScreen, month_ago);

        let engine = QueryEngine::new(&store);
        let due = engine.followups(7, today()).unwrap();

        assert_eq!(due.len(), 1);
        assert_eq!(due[0].company, "ScreenCo");
    }

    #[test]
    fn test_followups_empty_result_is_ok() {
        let store = SqliteStore::open_in_memory().unwrap();
        let engine = QueryEngine::new(&store);
        assert!(engine.followups(7, today()).unwrap().is_empty());
    }

    #[test]
    fn test_followups_oldest_first() {
        let store = SqliteStore::open_in_memory().unwrap();
        seed(&store, "Newer", Status::Applied, NaiveDate::from_ymd_opt(2025, 2, 1).unwrap());
        seed(&store, "Oldest", Status::Oa, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let engine = QueryEngine::new(&store);
        let due = engine.followups(7, today()).unwrap();
        assert_eq!(due[0].company, "Oldest");
        assert_eq!(due[1].company, "Newer");
    }

    #[test]
    fn test_stats_counts_and_aggregates() {
        let store = SqliteStore::open_in_memory().unwrap();
        let recent = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let old = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        seed(&store, "A", Status::Applied, recent);
        seed(&store, "B", Status::Applied, old);
        seed(&store, "C", Status::Interview, recent);
        seed(&store, "D", Status::Rejected, old);

        let engine = QueryEngine::new(&store);
        let stats = engine.stats(today()).unwrap();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.applied_last_30_days, 2);

        let applied = stats
            .by_status
            .iter()
            .find(|(s, _)| *s == Status::Applied)
            .unwrap();
        assert_eq!(applied.1, 2);
        let ghosted = stats
            .by_status
            .iter()
            .find(|(s, _)| *s == Status::Ghosted)
            .unwrap();
        assert_eq!(ghosted.1, 0);
    }

    #[test]
    fn test_resolve_maps_outcomes_onto_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        seed(&store, "Acme", Status::Applied, date);
        seed(&store, "Acme Robotics", Status::Applied, date);
        let globex = seed(&store, "Globex", Status::Applied, date);

        let engine = QueryEngine::new(&store);

        assert_eq!(engine.resolve("Globex").unwrap(), globex);
        assert!(matches!(engine.resolve("Nope").unwrap_err(), Error::NotFound(_)));
        match engine.resolve("Acme").unwrap_err() {
            Error::Ambiguous { token, candidates } => {
                assert_eq!(token, "Acme");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguous error, got {:?}", other),
        }
    }
}
