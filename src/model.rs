//! Application record types and closed vocabularies
//!
//! Every field a record can hold is defined here, together with the three
//! closed vocabularies (status, source, priority) that mutations validate
//! against. Vocabulary membership is enforced by construction: the rest of
//! the crate deals in these enums, never raw strings.

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pipeline status of an application - the closed status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Applied,
    RecruiterScreen,
    Oa,
    Interview,
    Offer,
    Rejected,
    Ghosted,
    Withdrawn,
}

impl Status {
    /// Get the canonical label stored in the database and shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Applied => "Applied",
            Status::RecruiterScreen => "Recruiter Screen",
            Status::Oa => "OA",
            Status::Interview => "Interview",
            Status::Offer => "Offer",
            Status::Rejected => "Rejected",
            Status::Ghosted => "Ghosted",
            Status::Withdrawn => "Withdrawn",
        }
    }

    /// Get all statuses in pipeline order
    pub fn all() -> &'static [Status] {
        &[
            Status::Applied,
            Status::RecruiterScreen,
            Status::Oa,
            Status::Interview,
            Status::Offer,
            Status::Rejected,
            Status::Ghosted,
            Status::Withdrawn,
        ]
    }

    /// An application is active unless it reached a terminal-closed status.
    pub fn is_active(&self) -> bool {
        !matches!(self, Status::Rejected | Status::Ghosted | Status::Withdrawn)
    }

    /// Statuses still waiting on the employer. Interview and Offer are
    /// excluded: those stages have their own human follow-up cadence.
    pub fn awaits_response(&self) -> bool {
        matches!(self, Status::Applied | Status::RecruiterScreen | Status::Oa)
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "applied" => Ok(Status::Applied),
            "recruiter screen" | "recruiter-screen" => Ok(Status::RecruiterScreen),
            "oa" => Ok(Status::Oa),
            "interview" => Ok(Status::Interview),
            "offer" => Ok(Status::Offer),
            "rejected" => Ok(Status::Rejected),
            "ghosted" => Ok(Status::Ghosted),
            "withdrawn" => Ok(Status::Withdrawn),
            _ => Err(Error::Validation(format!(
                "unknown status '{}' (expected one of: {})",
                s,
                label_list(Status::all().iter().map(Status::as_str))
            ))),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Where the application was found or submitted - the closed source vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    CompanySite,
    LinkedIn,
    Handshake,
    Referral,
    CareerFair,
    AngelList,
    Indeed,
    Other,
}

impl Source {
    /// Get the canonical label stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::CompanySite => "Company Site",
            Source::LinkedIn => "LinkedIn",
            Source::Handshake => "Handshake",
            Source::Referral => "Referral",
            Source::CareerFair => "Career Fair",
            Source::AngelList => "AngelList",
            Source::Indeed => "Indeed",
            Source::Other => "Other",
        }
    }

    /// Get all sources
    pub fn all() -> &'static [Source] {
        &[
            Source::CompanySite,
            Source::LinkedIn,
            Source::Handshake,
            Source::Referral,
            Source::CareerFair,
            Source::AngelList,
            Source::Indeed,
            Source::Other,
        ]
    }
}

impl FromStr for Source {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "company site" | "company-site" => Ok(Source::CompanySite),
            "linkedin" => Ok(Source::LinkedIn),
            "handshake" => Ok(Source::Handshake),
            "referral" => Ok(Source::Referral),
            "career fair" | "career-fair" => Ok(Source::CareerFair),
            "angellist" => Ok(Source::AngelList),
            "indeed" => Ok(Source::Indeed),
            "other" => Ok(Source::Other),
            _ => Err(Error::Validation(format!(
                "unknown source '{}' (expected one of: {})",
                s,
                label_list(Source::all().iter().map(Source::as_str))
            ))),
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Priority level: 1 = high, 2 = medium, 3 = low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Parse the integer form used on the wire and in the database
    pub fn from_int(n: i64) -> Result<Self> {
        match n {
            1 => Ok(Priority::High),
            2 => Ok(Priority::Medium),
            3 => Ok(Priority::Low),
            _ => Err(Error::Validation(format!(
                "priority must be 1 (high), 2 (medium), or 3 (low), got {}",
                n
            ))),
        }
    }

    /// Integer form stored in the database
    pub fn as_int(&self) -> i64 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_int())
    }
}

fn label_list<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

/// A job application record as stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    /// Store-assigned id, monotonic and never reused
    pub id: i64,
    pub company: String,
    pub role: String,
    pub job_link: Option<String>,
    pub location: Option<String>,
    /// ISO calendar date the application was submitted
    pub date_applied: NaiveDate,
    pub source: Option<Source>,
    pub status: Status,
    /// Most recent event, formatted `<ISO date> — <free text>`
    pub last_action: Option<String>,
    pub priority: Priority,
    pub notes: Option<String>,
}

/// Fields for a record being created. `date_applied` defaults to the
/// caller-supplied "today" when omitted; `status` defaults to Applied and
/// `priority` to Medium.
#[derive(Debug, Clone)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub job_link: Option<String>,
    pub location: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub source: Option<Source>,
    pub status: Status,
    pub last_action: Option<String>,
    pub priority: Priority,
    pub notes: Option<String>,
}

impl NewApplication {
    /// Create a draft with the required fields and all defaults applied
    pub fn new(company: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            company: company.into(),
            role: role.into(),
            job_link: None,
            location: None,
            date_applied: None,
            source: None,
            status: Status::Applied,
            last_action: None,
            priority: Priority::default(),
            notes: None,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_date_applied(mut self, date: NaiveDate) -> Self {
        self.date_applied = Some(date);
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_job_link(mut self, link: impl Into<String>) -> Self {
        self.job_link = Some(link.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_last_action(mut self, entry: impl Into<String>) -> Self {
        self.last_action = Some(entry.into());
        self
    }
}

/// A partial update: absent fields are left untouched.
///
/// Optional text fields (`job_link`, `location`, `last_action`, `notes`) are
/// cleared by supplying an empty string; `source` is cleared with
/// `Some(None)`. `company` and `role` can never be cleared.
#[derive(Debug, Clone, Default)]
pub struct ApplicationPatch {
    pub company: Option<String>,
    pub role: Option<String>,
    pub job_link: Option<String>,
    pub location: Option<String>,
    pub date_applied: Option<NaiveDate>,
    pub source: Option<Option<Source>>,
    pub status: Option<Status>,
    pub last_action: Option<String>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
}

impl ApplicationPatch {
    /// True when no field was supplied at all
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.role.is_none()
            && self.job_link.is_none()
            && self.location.is_none()
            && self.date_applied.is_none()
            && self.source.is_none()
            && self.status.is_none()
            && self.last_action.is_none()
            && self.priority.is_none()
            && self.notes.is_none()
    }

    /// Names of the supplied fields, for progress messages
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.company.is_some() {
            names.push("company");
        }
        if self.role.is_some() {
            names.push("role");
        }
        if self.job_link.is_some() {
            names.push("job_link");
        }
        if self.location.is_some() {
            names.push("location");
        }
        if self.date_applied.is_some() {
            names.push("date_applied");
        }
        if self.source.is_some() {
            names.push("source");
        }
        if self.status.is_some() {
            names.push("status");
        }
        if self.last_action.is_some() {
            names.push("last_action");
        }
        if self.priority.is_some() {
            names.push("priority");
        }
        if self.notes.is_some() {
            names.push("notes");
        }
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in Status::all() {
            let parsed: Status = status.as_str().parse().unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!(Status::from_str("applied").unwrap(), Status::Applied);
        assert_eq!(
            Status::from_str("recruiter-screen").unwrap(),
            Status::RecruiterScreen
        );
        assert_eq!(Status::from_str("oa").unwrap(), Status::Oa);
    }

    #[test]
    fn test_status_rejects_unknown() {
        let err = Status::from_str("Negotiating").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_active_is_derived_from_terminal_set() {
        assert!(Status::Applied.is_active());
        assert!(Status::Interview.is_active());
        assert!(Status::Offer.is_active());
        assert!(!Status::Rejected.is_active());
        assert!(!Status::Ghosted.is_active());
        assert!(!Status::Withdrawn.is_active());
    }

    #[test]
    fn test_awaits_response_subset() {
        assert!(Status::Applied.awaits_response());
        assert!(Status::RecruiterScreen.awaits_response());
        assert!(Status::Oa.awaits_response());
        assert!(!Status::Interview.awaits_response());
        assert!(!Status::Offer.awaits_response());
        assert!(!Status::Rejected.awaits_response());
    }

    #[test]
    fn test_source_roundtrip() {
        for source in Source::all() {
            let parsed: Source = source.as_str().parse().unwrap();
            assert_eq!(*source, parsed);
        }
    }

    #[test]
    fn test_priority_bounds() {
        assert_eq!(Priority::from_int(1).unwrap(), Priority::High);
        assert_eq!(Priority::from_int(2).unwrap(), Priority::Medium);
        assert_eq!(Priority::from_int(3).unwrap(), Priority::Low);
        assert!(Priority::from_int(0).is_err());
        assert!(Priority::from_int(4).is_err());
    }

    #[test]
    fn test_patch_field_names() {
        let patch = ApplicationPatch {
            priority: Some(Priority::High),
            notes: Some("ping recruiter".into()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
        assert_eq!(patch.field_names(), vec!["priority", "notes"]);
        assert!(ApplicationPatch::default().is_empty());
    }
}
