//! Storage layer for application records

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;
