//! Shared field-format validators
//!
//! Every mutating operation funnels through these helpers so each format
//! constraint is enforced in exactly one place. Vocabulary membership for
//! status/source/priority lives on the enums in [`crate::model`].

use crate::{Error, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// Expected last_action shape: `<ISO date> — <free text>` (em dash separator)
fn last_action_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}) — (.+)$").expect("last_action regex is valid")
    })
}

/// Parse an ISO `YYYY-MM-DD` date string
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!(
            "{} must be an ISO date (YYYY-MM-DD), got '{}'",
            field, value
        ))
    })
}

/// Validate a last_action entry: an ISO date, an em dash, and a description.
/// The date component must itself be a real calendar date.
pub fn check_last_action(value: &str) -> Result<()> {
    let captures = last_action_pattern().captures(value).ok_or_else(|| {
        Error::Validation(format!(
            "last_action must look like '2025-01-02 — Rejection email', got '{}'",
            value
        ))
    })?;
    parse_date("last_action date", &captures[1])?;
    Ok(())
}

/// Reject empty or whitespace-only values for required text fields
pub fn check_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// Calendar-day difference `to - from`. Pure so follow-up detection stays
/// deterministic under test; "now" is always an explicit argument upstream.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_accepts_iso() {
        let date = parse_date("date_applied", "2025-01-31").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 31).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert!(parse_date("date_applied", "Jan 31 2025").is_err());
        assert!(parse_date("date_applied", "2025-13-01").is_err());
        assert!(parse_date("date_applied", "2025-02-30").is_err());
    }

    #[test]
    fn test_last_action_pattern() {
        assert!(check_last_action("2025-01-02 — Rejection email").is_ok());
        assert!(check_last_action("2025-01-02 — Spoke with recruiter, next steps TBD").is_ok());

        // Missing date, wrong separator, or bad embedded date
        assert!(check_last_action("Rejection email").is_err());
        assert!(check_last_action("2025-01-02 - Rejection email").is_err());
        assert!(check_last_action("2025-01-02 — ").is_err());
        assert!(check_last_action("2025-02-30 — Impossible date").is_err());
    }

    #[test]
    fn test_non_empty() {
        assert!(check_non_empty("company", "Acme").is_ok());
        assert!(check_non_empty("company", "").is_err());
        assert!(check_non_empty("company", "   ").is_err());
    }

    #[test]
    fn test_days_between() {
        let from = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 3, 11).unwrap();
        assert_eq!(days_between(from, to), 10);
        assert_eq!(days_between(to, from), -10);
        assert_eq!(days_between(from, from), 0);
    }
}
