//! Knowledge-graph domain layer.
//!
//! Services enforce the invariants the repositories deliberately do not:
//! cascading deletes, observation/relation deduplication, and name-to-id
//! resolution for relation endpoints. Each service owns the repositories it
//! needs via constructor injection; nothing is resolved at runtime.
//!
//! - [`types`] — the four collection document types
//! - [`projects`] — project CRUD with full-subgraph cascade on delete
//! - [`entities`] — entity lifecycle, search, cascade delete
//! - [`observations`] — deduplicated per-entity facts
//! - [`relations`] — name-addressed, triple-deduplicated edges
//! - [`app`] — the [`ProjectMemory`](app::ProjectMemory) facade

pub mod app;
pub mod entities;
pub mod observations;
pub mod projects;
pub mod relations;
pub mod types;

pub use app::ProjectMemory;
pub use entities::EntityService;
pub use observations::ObservationService;
pub use projects::ProjectService;
pub use relations::RelationService;

use thiserror::Error;

use crate::storage::StorageError;

/// Failures raised by graph operations.
///
/// Read paths report missing documents as `None`; these variants are for
/// paths that require an existing target or a well-formed query.
#[derive(Debug, Error)]
pub enum GraphError {
    /// An operation targeted an entity id that does not exist.
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// Relation creation could not resolve one of its endpoint names.
    #[error("entity not found for relation: {from} -> {to}")]
    RelationEndpoints { from: String, to: String },

    /// A search query was not a valid pattern.
    #[error("invalid search pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Storage failure, propagated verbatim.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
