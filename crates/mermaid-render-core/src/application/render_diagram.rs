//! Mermaid source to SVG, with every attempt recorded.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::render_svg;
use crate::{
    domain::{
        AggregateId, Diagram, DiagramRepository, DiagramType, EventPublisher, Renderer,
        RenderingError,
    },
    error::{Entity, Error, Result},
};

/// Outcome of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderDiagramResult {
    pub diagram_id: AggregateId,
    pub svg: String,
    pub diagram_type: DiagramType,
    pub created_at: DateTime<Utc>,
}

pub struct RenderDiagramUseCase {
    renderer: Arc<dyn Renderer>,
    repository: Arc<dyn DiagramRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl RenderDiagramUseCase {
    #[must_use]
    pub fn new(
        renderer: Arc<dyn Renderer>,
        repository: Arc<dyn DiagramRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            renderer,
            repository,
            publisher,
        }
    }

    /// Render `mermaid_code` and persist the diagram whatever the outcome.
    ///
    /// # Errors
    ///
    /// - `Error::Diagram` if the code is blank (nothing is persisted)
    /// - `Error::Render` with the engine's original error after the failed
    ///   diagram has been saved and its events published
    /// - `Error::Repository` if saving fails
    pub async fn execute(&self, mermaid_code: &str) -> Result<RenderDiagramResult> {
        let mut diagram = Diagram::create(mermaid_code)?;
        let diagram_type = diagram.diagram_type();

        match render_svg(self.renderer.as_ref(), diagram.mermaid_code().raw_code()).await {
            Ok(svg) => {
                diagram.mark_as_rendered(&svg)?;
                self.persist(&mut diagram).await?;
                info!(diagram_id = %diagram.id(), %diagram_type, "Diagram rendered");

                Ok(RenderDiagramResult {
                    diagram_id: diagram.id(),
                    svg,
                    diagram_type,
                    created_at: diagram.created_at(),
                })
            }
            Err(render_error) => {
                let detail = RenderingError::create(
                    &render_error.message,
                    render_error.line,
                    render_error.column,
                )
                .or_else(|_| RenderingError::from_message("Unknown rendering error"))?;

                diagram.mark_as_failed(detail);
                self.persist(&mut diagram).await?;
                warn!(
                    diagram_id = %diagram.id(),
                    error = %render_error,
                    "Diagram render failed"
                );

                Err(render_error.into())
            }
        }
    }

    /// Load a stored diagram.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` for unknown or expired ids.
    pub async fn find(&self, id: &AggregateId) -> Result<Diagram> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(Entity::Diagram, id))
    }

    async fn persist(&self, diagram: &mut Diagram) -> Result<()> {
        let events = diagram.pull_domain_events();
        self.repository.save(diagram).await?;
        self.publisher.publish_all(events).await;
        Ok(())
    }
}
