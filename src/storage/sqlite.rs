//! SQLite storage implementation

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use rusqlite::types::ToSql;

use super::schema;
use crate::model::{Application, ApplicationPatch, NewApplication, Priority, Source, Status};
use crate::validate;
use crate::{Error, Result};

/// SQLite-backed store for application records.
///
/// The connection runs in autocommit mode: every successful mutation is
/// durable before the call returns. The handle is scoped to one invocation
/// and the connection closes when the store is dropped, on every exit path.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if it doesn't exist) and reconcile schema
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the applications table and its indexes if absent.
    ///
    /// Idempotent and additive-only: existing rows and columns are never
    /// touched, so it is safe to call on every startup.
    pub fn ensure_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Mutations ==========

    /// Insert a new application and return its store-assigned id.
    ///
    /// `today` fills `date_applied` when the draft omits it; callers pass
    /// the clock explicitly so creation stays deterministic under test.
    pub fn create(&self, draft: &NewApplication, today: NaiveDate) -> Result<i64> {
        validate::check_non_empty("company", &draft.company)?;
        validate::check_non_empty("role", &draft.role)?;
        if let Some(entry) = &draft.last_action {
            validate::check_last_action(entry)?;
        }

        let date_applied = draft.date_applied.unwrap_or(today);

        self.conn.execute(
            r#"
            INSERT INTO applications
                (company, role, job_link, location, date_applied, source, status, last_action, priority, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                draft.company,
                draft.role,
                draft.job_link,
                draft.location,
                date_applied.to_string(),
                draft.source.map(|s| s.as_str()),
                draft.status.as_str(),
                draft.last_action,
                draft.priority.as_int(),
                draft.notes,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        tracing::debug!(id, company = %draft.company, "created application");
        Ok(id)
    }

    /// Get an application by id
    pub fn get(&self, id: i64) -> Result<Option<Application>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM applications WHERE id = ?1", COLUMNS),
                [id],
                row_to_application,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Set the status of an application, optionally recording a last_action
    /// entry in the same statement so both change or neither does. When no
    /// entry is supplied the previous last_action is left untouched.
    pub fn update_status(&self, id: i64, status: Status, last_action: Option<&str>) -> Result<()> {
        let changed = match last_action {
            Some(entry) => {
                validate::check_last_action(entry)?;
                self.conn.execute(
                    "UPDATE applications SET status = ?1, last_action = ?2 WHERE id = ?3",
                    params![status.as_str(), entry, id],
                )?
            }
            None => self.conn.execute(
                "UPDATE applications SET status = ?1 WHERE id = ?2",
                params![status.as_str(), id],
            )?,
        };

        if changed == 0 {
            return Err(Error::NotFound(format!("no application with id {}", id)));
        }
        tracing::debug!(id, status = status.as_str(), "updated status");
        Ok(())
    }

    /// Apply a partial update: only the supplied fields change.
    ///
    /// Every supplied field is validated before the statement is built, and
    /// all assignments land in one UPDATE, so a single bad field means
    /// nothing is written.
    pub fn update_fields(&self, id: i64, patch: &ApplicationPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(Error::Validation(
                "no fields supplied to update".to_string(),
            ));
        }

        let mut sets: Vec<&'static str> = Vec::new();
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(company) = &patch.company {
            validate::check_non_empty("company", company)?;
            sets.push("company = ?");
            values.push(Box::new(company.clone()));
        }
        if let Some(role) = &patch.role {
            validate::check_non_empty("role", role)?;
            sets.push("role = ?");
            values.push(Box::new(role.clone()));
        }
        if let Some(link) = &patch.job_link {
            sets.push("job_link = ?");
            values.push(Box::new(optional_text(link)));
        }
        if let Some(location) = &patch.location {
            sets.push("location = ?");
            values.push(Box::new(optional_text(location)));
        }
        if let Some(date) = patch.date_applied {
            sets.push("date_applied = ?");
            values.push(Box::new(date.to_string()));
        }
        if let Some(source) = &patch.source {
            sets.push("source = ?");
            values.push(Box::new(source.map(|s| s.as_str().to_string())));
        }
        if let Some(status) = patch.status {
            sets.push("status = ?");
            values.push(Box::new(status.as_str().to_string()));
        }
        if let Some(entry) = &patch.last_action {
            if !entry.is_empty() {
                validate::check_last_action(entry)?;
            }
            sets.push("last_action = ?");
            values.push(Box::new(optional_text(entry)));
        }
        if let Some(priority) = patch.priority {
            sets.push("priority = ?");
            values.push(Box::new(priority.as_int()));
        }
        if let Some(notes) = &patch.notes {
            sets.push("notes = ?");
            values.push(Box::new(optional_text(notes)));
        }

        values.push(Box::new(id));
        let sql = format!(
            "UPDATE applications SET {} WHERE id = ?",
            sets.join(", ")
        );

        let changed = self
            .conn
            .execute(&sql, params_from_iter(values.iter().map(|v| v.as_ref())))?;
        if changed == 0 {
            return Err(Error::NotFound(format!("no application with id {}", id)));
        }
        tracing::debug!(id, fields = ?patch.field_names(), "updated fields");
        Ok(())
    }

    /// Delete an application by id
    pub fn delete(&self, id: i64) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM applications WHERE id = ?1", [id])?;
        if changed == 0 {
            return Err(Error::NotFound(format!("no application with id {}", id)));
        }
        tracing::debug!(id, "deleted application");
        Ok(())
    }

    // ========== Reads ==========

    /// All applications in insertion order (ascending id)
    pub fn all(&self) -> Result<Vec<Application>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM applications ORDER BY id ASC",
            COLUMNS
        ))?;
        let apps = stmt
            .query_map([], row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(apps)
    }

    /// Filtered listing. Filters are conjunctive; each is independently
    /// optional. The active-only clause is generated from the status
    /// vocabulary so the terminal-closed set lives in one place.
    pub fn list_filtered(
        &self,
        company: Option<&str>,
        status: Option<Status>,
        active_only: bool,
    ) -> Result<Vec<Application>> {
        let mut sql = format!("SELECT {} FROM applications WHERE 1=1", COLUMNS);
        let mut values: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(fragment) = company {
            sql.push_str(" AND LOWER(company) LIKE ?");
            values.push(Box::new(like_pattern(fragment)));
        }
        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            values.push(Box::new(status.as_str().to_string()));
        }
        if active_only {
            sql.push_str(&format!(" AND status NOT IN ({})", terminal_status_list()));
        }
        sql.push_str(" ORDER BY id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let apps = stmt
            .query_map(
                params_from_iter(values.iter().map(|v| v.as_ref())),
                row_to_application,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(apps)
    }

    /// Case-insensitive substring search across company, role, and notes.
    /// A record matches if any of the three fields contains the query.
    pub fn search(&self, query: &str) -> Result<Vec<Application>> {
        let pattern = like_pattern(query);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT {}
            FROM applications
            WHERE LOWER(company) LIKE ?1
               OR LOWER(role) LIKE ?1
               OR LOWER(COALESCE(notes, '')) LIKE ?1
            ORDER BY id ASC
            "#,
            COLUMNS
        ))?;
        let apps = stmt
            .query_map([&pattern], row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(apps)
    }

    /// Applications still awaiting an employer response, oldest first.
    /// Age filtering happens in the query engine where "today" is explicit.
    pub fn awaiting_response(&self) -> Result<Vec<Application>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM applications WHERE status IN ({}) ORDER BY date_applied ASC, id ASC",
            COLUMNS,
            awaiting_status_list()
        ))?;
        let apps = stmt
            .query_map([], row_to_application)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(apps)
    }

    /// Count all applications
    pub fn count(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM applications", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

const COLUMNS: &str = "id, company, role, job_link, location, date_applied, source, status, last_action, priority, notes";

fn like_pattern(fragment: &str) -> String {
    format!("%{}%", fragment.to_lowercase())
}

/// Quoted, comma-separated SQL list of the terminal-closed statuses
fn terminal_status_list() -> String {
    Status::all()
        .iter()
        .filter(|s| !s.is_active())
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quoted, comma-separated SQL list of the awaiting-response statuses
fn awaiting_status_list() -> String {
    Status::all()
        .iter()
        .filter(|s| s.awaits_response())
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Empty string means "clear to NULL"; anything else is stored verbatim
fn optional_text(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Convert a row to an Application, surfacing malformed stored values as
/// conversion failures rather than panicking.
fn row_to_application(row: &rusqlite::Row) -> rusqlite::Result<Application> {
    let date_str: String = row.get(5)?;
    let source_str: Option<String> = row.get(6)?;
    let status_str: String = row.get(7)?;
    let priority_int: i64 = row.get(9)?;

    let date_applied = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let source = source_str
        .map(|s| s.parse::<Source>())
        .transpose()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?;

    let status: Status = status_str.parse().map_err(|e: Error| {
        rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let priority = Priority::from_int(priority_int).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(Application {
        id: row.get(0)?,
        company: row.get(1)?,
        role: row.get(2)?,
        job_link: row.get(3)?,
        location: row.get(4)?,
        date_applied,
        source,
        status,
        last_action: row.get(8)?,
        priority,
        notes: row.get(10)?,
    })
}
