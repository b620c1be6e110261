//! # Jobtrack - SQLite-backed job application tracker
//!
//! Replaces ad-hoc spreadsheets with consistent, queryable, script-friendly
//! records of job applications.
//!
//! Jobtrack provides:
//! - A single-table SQLite store with idempotent schema reconciliation
//! - Closed-vocabulary validation for status, source, and priority
//! - Ambiguous-reference resolution for id-or-company-name targets
//! - Filtered listing, cross-field search, follow-up detection, and stats
//! - Deterministic CSV export with a stable column order

pub mod config;
pub mod export;
pub mod model;
pub mod query;
pub mod storage;
pub mod ui;
pub mod validate;

// Re-exports for convenient access
pub use model::{Application, ApplicationPatch, NewApplication, Priority, Source, Status};
pub use query::engine::QueryEngine;
pub use query::resolver::{Candidate, Resolution};
pub use storage::SqliteStore;

/// Result type alias for Jobtrack operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Jobtrack operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A supplied field violates a closed vocabulary, required-field, or
    /// format constraint. Always raised before any write.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A referenced id or company substring matched zero records.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A company substring matched more than one record. The caller must
    /// disambiguate; the candidates are never narrowed automatically.
    #[error("Reference '{token}' is ambiguous")]
    Ambiguous {
        token: String,
        candidates: Vec<Candidate>,
    },

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Exit code the CLI maps this error to: 1 for correctable input
    /// problems, 2 for storage/internal failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_) | Error::NotFound(_) | Error::Ambiguous { .. } => 1,
            Error::Storage(_) | Error::Io(_) | Error::Csv(_) | Error::Json(_) | Error::Config(_) => 2,
        }
    }
}
