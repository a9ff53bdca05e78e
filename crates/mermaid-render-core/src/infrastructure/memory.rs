//! In-memory repositories backed by [`TtlStore`].
//!
//! Defaults: diagrams and images live one hour and are swept every minute;
//! editor sessions live a day and are swept every five minutes.

use std::time::Duration;

use async_trait::async_trait;

use super::ttl_store::TtlStore;
use crate::domain::{
    AggregateId, Diagram, DiagramImage, DiagramImageRepository, DiagramRepository, EditorSession,
    EditorSessionRepository, RepositoryResult,
};

pub const RESULT_TTL: Duration = Duration::from_secs(60 * 60);
pub const RESULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);
pub const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

// ============================================================================
// DIAGRAMS
// ============================================================================

pub struct InMemoryDiagramRepository {
    store: TtlStore<Diagram>,
}

impl InMemoryDiagramRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(RESULT_TTL, RESULT_SWEEP_INTERVAL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            store: TtlStore::new("diagrams", ttl, sweep_interval),
        }
    }
}

impl Default for InMemoryDiagramRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagramRepository for InMemoryDiagramRepository {
    async fn save(&self, diagram: &Diagram) -> RepositoryResult<()> {
        self.store.insert(diagram.id(), diagram.clone()).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<Diagram>> {
        Ok(self.store.get(id).await)
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        self.store.remove(id).await;
        Ok(())
    }
}

// ============================================================================
// DIAGRAM IMAGES
// ============================================================================

pub struct InMemoryDiagramImageRepository {
    store: TtlStore<DiagramImage>,
}

impl InMemoryDiagramImageRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(RESULT_TTL, RESULT_SWEEP_INTERVAL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            store: TtlStore::new("diagram_images", ttl, sweep_interval),
        }
    }
}

impl Default for InMemoryDiagramImageRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiagramImageRepository for InMemoryDiagramImageRepository {
    async fn save(&self, image: &DiagramImage) -> RepositoryResult<()> {
        self.store.insert(image.id(), image.clone()).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<DiagramImage>> {
        Ok(self.store.get(id).await)
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        self.store.remove(id).await;
        Ok(())
    }
}

// ============================================================================
// EDITOR SESSIONS
// ============================================================================

pub struct InMemoryEditorSessionRepository {
    store: TtlStore<EditorSession>,
}

impl InMemoryEditorSessionRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(SESSION_TTL, SESSION_SWEEP_INTERVAL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration, sweep_interval: Duration) -> Self {
        Self {
            store: TtlStore::new("editor_sessions", ttl, sweep_interval),
        }
    }
}

impl Default for InMemoryEditorSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EditorSessionRepository for InMemoryEditorSessionRepository {
    async fn save(&self, session: &EditorSession) -> RepositoryResult<()> {
        self.store.insert(session.id(), session.clone()).await;
        Ok(())
    }

    async fn find_by_id(&self, id: &AggregateId) -> RepositoryResult<Option<EditorSession>> {
        Ok(self.store.get(id).await)
    }

    async fn delete(&self, id: &AggregateId) -> RepositoryResult<()> {
        self.store.remove(id).await;
        Ok(())
    }
}
