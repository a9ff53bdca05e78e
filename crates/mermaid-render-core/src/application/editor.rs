//! Editor session orchestration: load, mutate, save, publish.

use std::sync::Arc;

use tracing::{debug, warn};

use super::render_diagram::{RenderDiagramResult, RenderDiagramUseCase};
use crate::{
    domain::{AggregateId, CursorPosition, EditorSession, EditorSessionRepository, EventPublisher},
    error::{Entity, Error, Result},
};

/// Outcome of [`EditorSessionUseCases::request_render`].
#[derive(Debug)]
pub struct SessionRender {
    pub session: EditorSession,
    /// `None` when the session code was blank and nothing was rendered.
    pub render: Option<Result<RenderDiagramResult>>,
}

pub struct EditorSessionUseCases {
    repository: Arc<dyn EditorSessionRepository>,
    publisher: Arc<dyn EventPublisher>,
    render: Arc<RenderDiagramUseCase>,
}

impl EditorSessionUseCases {
    #[must_use]
    pub fn new(
        repository: Arc<dyn EditorSessionRepository>,
        publisher: Arc<dyn EventPublisher>,
        render: Arc<RenderDiagramUseCase>,
    ) -> Self {
        Self {
            repository,
            publisher,
            render,
        }
    }

    /// Open a new, empty session.
    ///
    /// # Errors
    ///
    /// Returns `Error::Repository` if saving fails.
    pub async fn start(&self) -> Result<EditorSession> {
        let mut session = EditorSession::create();
        self.persist(&mut session).await?;
        debug!(session_id = %session.id(), "Editor session started");
        Ok(session)
    }

    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown or expired ids.
    pub async fn find(&self, id: &AggregateId) -> Result<EditorSession> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(Entity::EditorSession, id))
    }

    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown ids.
    pub async fn update_code(
        &self,
        id: &AggregateId,
        code: &str,
        cursor: CursorPosition,
    ) -> Result<EditorSession> {
        self.modify(id, |session| {
            session.update_code(code, cursor);
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown ids.
    pub async fn update_cursor(
        &self,
        id: &AggregateId,
        cursor: CursorPosition,
    ) -> Result<EditorSession> {
        self.modify(id, |session| {
            session.update_cursor(cursor);
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `Error::EditorSession` when there is nothing to undo.
    pub async fn undo(&self, id: &AggregateId) -> Result<EditorSession> {
        self.modify(id, |session| session.undo().map_err(Error::from))
            .await
    }

    /// # Errors
    ///
    /// Returns `Error::EditorSession` when there is nothing to redo.
    pub async fn redo(&self, id: &AggregateId) -> Result<EditorSession> {
        self.modify(id, |session| session.redo().map_err(Error::from))
            .await
    }

    /// Request a preview render of the current code and run it.
    ///
    /// The session is saved as pending first; the render outcome, success or
    /// failure, is handed back alongside the session, which is saved again
    /// with the pending flag cleared.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown ids or `Error::Repository` if
    /// saving the session fails. Render failures are reported in
    /// [`SessionRender::render`].
    pub async fn request_render(&self, id: &AggregateId) -> Result<SessionRender> {
        let mut session = self.find(id).await?;
        if !session.request_render() {
            return Ok(SessionRender {
                session,
                render: None,
            });
        }
        self.persist(&mut session).await?;

        let outcome = self.render.execute(session.current_code()).await;
        if let Err(err) = &outcome {
            warn!(session_id = %id, error = %err, "Preview render failed");
        }

        session.mark_render_complete();
        self.persist(&mut session).await?;

        Ok(SessionRender {
            session,
            render: Some(outcome),
        })
    }

    async fn modify<F>(&self, id: &AggregateId, change: F) -> Result<EditorSession>
    where
        F: FnOnce(&mut EditorSession) -> Result<()> + Send,
    {
        let mut session = self.find(id).await?;
        change(&mut session)?;
        self.persist(&mut session).await?;
        Ok(session)
    }

    async fn persist(&self, session: &mut EditorSession) -> Result<()> {
        let events = session.pull_domain_events();
        self.repository.save(session).await?;
        self.publisher.publish_all(events).await;
        Ok(())
    }
}
