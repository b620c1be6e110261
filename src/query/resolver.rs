//! Match-token resolution
//!
//! Mutating commands accept either a numeric id or a free-text company
//! fragment. Resolution trades convenience against correctness: a fragment
//! matching more than one record is always surfaced as ambiguous, never
//! narrowed to "the first" or "the most recent" candidate.

use serde::{Deserialize, Serialize};

use crate::model::Application;

/// One record a fragment could refer to, with enough context for the
/// caller to render a useful disambiguation message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub date_applied: chrono::NaiveDate,
}

impl Candidate {
    fn from_application(app: &Application) -> Self {
        Self {
            id: app.id,
            company: app.company.clone(),
            role: app.role.clone(),
            date_applied: app.date_applied,
        }
    }
}

impl std::fmt::Display for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} — {} (applied {})",
            self.id, self.company, self.role, self.date_applied
        )
    }
}

/// Outcome of resolving a match token
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Token resolved to exactly one id (or was a numeric id; existence is
    /// checked by the downstream operation, not here)
    Id(i64),
    /// The fragment matched no company
    NotFound,
    /// The fragment matched more than one record
    Ambiguous(Vec<Candidate>),
}

/// Resolve a user-supplied token against the full record set.
///
/// An integer token is taken as an id directly. Anything else is matched
/// case-insensitively as a substring of `company`.
pub fn resolve_token(token: &str, applications: &[Application]) -> Resolution {
    if let Ok(id) = token.parse::<i64>() {
        return Resolution::Id(id);
    }

    let needle = token.to_lowercase();
    let matches: Vec<&Application> = applications
        .iter()
        .filter(|app| app.company.to_lowercase().contains(&needle))
        .collect();

    match matches.as_slice() {
        [] => Resolution::NotFound,
        [only] => Resolution::Id(only.id),
        many => Resolution::Ambiguous(many.iter().map(|a| Candidate::from_application(a)).collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewApplication;
    use chrono::NaiveDate;

    fn sample(id: i64, company: &str) -> Application {
        let draft = NewApplication::new(company, "Intern");
        Application {
            id,
            company: draft.company,
            role: draft.role,
            job_link: None,
            location: None,
            date_applied: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            source: None,
            status: draft.status,
            last_action: None,
            priority: draft.priority,
            notes: None,
        }
    }

    fn fixture() -> Vec<Application> {
        vec![
            sample(1, "Acme"),
            sample(2, "Acme Robotics"),
            sample(3, "Globex"),
        ]
    }

    #[test]
    fn test_numeric_token_passes_through() {
        // Existence is the downstream operation's concern
        assert_eq!(resolve_token("42", &fixture()), Resolution::Id(42));
    }

    #[test]
    fn test_unique_fragment_resolves() {
        assert_eq!(resolve_token("Globex", &fixture()), Resolution::Id(3));
        assert_eq!(resolve_token("glob", &fixture()), Resolution::Id(3));
    }

    #[test]
    fn test_ambiguous_fragment_lists_all_candidates() {
        match resolve_token("Acme", &fixture()) {
            Resolution::Ambiguous(candidates) => {
                let ids: Vec<i64> = candidates.iter().map(|c| c.id).collect();
                assert_eq!(ids, vec![1, 2]);
                assert_eq!(candidates[0].company, "Acme");
                assert_eq!(candidates[1].company, "Acme Robotics");
            }
            other => panic!("expected ambiguous resolution, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_fragment_is_not_found() {
        assert_eq!(resolve_token("Nope", &fixture()), Resolution::NotFound);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert_eq!(resolve_token("GLOBEX", &fixture()), Resolution::Id(3));
    }
}
