//! Repository trait interfaces, one per aggregate.
//!
//! Traits live in the domain layer and speak only domain types. Adapters in
//! `infrastructure` implement them over an in-memory TTL map or `SQLite`.
//!
//! All three repositories share one shape: `save` (insert or replace),
//! `find_by_id` (absent and expired entries are both `None`), and `delete`
//! (deleting a missing id is not an error). Implementations must be safe to
//! call concurrently for different aggregates.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use async_trait::async_trait;

use crate::domain::{
    aggregates::{Diagram, DiagramImage, EditorSession},
    identifiers::AggregateId,
};

// ============================================================================
// SHARED ERROR TYPES
// ============================================================================

/// Failures of the storage backend itself.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying storage failure
    #[error("storage error: {0}")]
    StorageError(String),

    /// A stored record could not be turned back into a valid aggregate
    #[error("corrupt record {id}: {reason}")]
    Corrupted { id: String, reason: String },
}

impl RepositoryError {
    #[must_use]
    pub fn storage_error(reason: impl Into<String>) -> Self {
        Self::StorageError(reason.into())
    }

    #[must_use]
    pub fn corrupted(id: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        Self::Corrupted {
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

// ============================================================================
// REPOSITORIES
// ============================================================================

#[async_trait]
pub trait DiagramRepository: Send + Sync {
    /// Insert or replace the diagram.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn save(&self, diagram: &Diagram) -> RepositoryResult<()>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failure and `Corrupted` if the stored
    /// record violates the aggregate's invariants.
    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<Diagram>>;

    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait DiagramImageRepository: Send + Sync {
    /// Insert or replace the image.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn save(&self, image: &DiagramImage) -> RepositoryResult<()>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failure and `Corrupted` for
    /// inconsistent records.
    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<DiagramImage>>;

    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()>;
}

#[async_trait]
pub trait EditorSessionRepository: Send + Sync {
    /// Insert or replace the session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn save(&self, session: &EditorSession) -> RepositoryResult<()>;

    /// # Errors
    ///
    /// Returns `StorageError` on read failure and `Corrupted` for
    /// undecodable records.
    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<EditorSession>>;

    /// # Errors
    ///
    /// Returns `StorageError` on write failure.
    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()>;
}
