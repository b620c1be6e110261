//! Database schema definitions
//!
//! All statements are `IF NOT EXISTS` so schema reconciliation is safe to
//! run on every startup. Structural changes must stay additive: nothing
//! here may drop or rename a column once shipped.

/// SQL to create the applications table.
///
/// `date_applied` is stored as ISO `YYYY-MM-DD` text; SQLite has no DATE
/// type, so the crate writes it consistently and parses it on read.
pub const CREATE_APPLICATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company TEXT NOT NULL,
    role TEXT NOT NULL,
    job_link TEXT,
    location TEXT,
    date_applied TEXT NOT NULL,
    source TEXT,
    status TEXT NOT NULL DEFAULT 'Applied',
    last_action TEXT,
    priority INTEGER NOT NULL DEFAULT 2,
    notes TEXT
)
"#;

/// SQL to create indexes backing filtered listing and follow-up scans
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_applications_status ON applications(status)",
    "CREATE INDEX IF NOT EXISTS idx_applications_date ON applications(date_applied)",
    "CREATE INDEX IF NOT EXISTS idx_applications_company ON applications(company)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_APPLICATIONS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
