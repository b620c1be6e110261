//! CSV export with a stable column order
//!
//! One header row, then one row per record in the order received from the
//! query that produced the input. Absent optional fields render as empty
//! cells. The writer is flushed before the row count is returned, so a
//! failure partway never reports success.

use std::io::Write;
use std::path::Path;

use crate::Result;
use crate::model::Application;

/// Column order of the export format. Fixed; append-only if it ever grows.
pub const CSV_HEADER: &[&str] = &[
    "id",
    "company",
    "role",
    "job_link",
    "location",
    "date_applied",
    "source",
    "status",
    "last_action",
    "priority",
    "notes",
];

/// Export the given records to a CSV file, returning the row count
pub fn export_csv(applications: &[Application], path: &Path) -> Result<usize> {
    let file = std::fs::File::create(path)?;
    let count = write_csv(applications, file)?;
    tracing::debug!(count, path = %path.display(), "exported applications");
    Ok(count)
}

/// Write records as CSV to any writer. Split out from [`export_csv`] so
/// tests can target a buffer instead of the filesystem.
pub fn write_csv<W: Write>(applications: &[Application], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(CSV_HEADER)?;

    for app in applications {
        let id = app.id.to_string();
        let date_applied = app.date_applied.to_string();
        let priority = app.priority.as_int().to_string();
        wtr.write_record([
            id.as_str(),
            app.company.as_str(),
            app.role.as_str(),
            app.job_link.as_deref().unwrap_or(""),
            app.location.as_deref().unwrap_or(""),
            date_applied.as_str(),
            app.source.map(|s| s.as_str()).unwrap_or(""),
            app.status.as_str(),
            app.last_action.as_deref().unwrap_or(""),
            priority.as_str(),
            app.notes.as_deref().unwrap_or(""),
        ])?;
    }

    wtr.flush()?;
    Ok(applications.len())
}
