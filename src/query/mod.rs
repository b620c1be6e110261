//! Read-only queries and reference resolution

pub mod engine;
pub mod resolver;

pub use engine::{ListFilter, PipelineStats, QueryEngine};
pub use resolver::{Candidate, Resolution, resolve_token};
