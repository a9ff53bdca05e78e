//! Application layer: use cases that sequence aggregates, engines, storage,
//! and event publication.
//!
//! Every use case follows the same shape: build or load an aggregate, call
//! the external engine, feed the outcome into a transition, drain the event
//! buffer, save, and publish. Failures from the engine are recorded on the
//! aggregate before being returned to the caller.

pub mod editor;
pub mod export;
pub mod render_diagram;

pub use editor::{EditorSessionUseCases, SessionRender};
pub use export::{ExportImageResult, ExportPngCommand, ExportPngUseCase, ExportSvgUseCase};
pub use render_diagram::{RenderDiagramResult, RenderDiagramUseCase};

use crate::domain::{RenderError, Renderer, ValidationError};

/// Error code stored on a `DiagramImage` whose conversion failed.
pub const CONVERSION_FAILED: &str = "CONVERSION_FAILED";

/// Run the engine. Blank output counts as an engine failure.
async fn render_svg(renderer: &dyn Renderer, code: &str) -> Result<String, RenderError> {
    let svg = renderer.render(code).await?;
    if svg.trim().is_empty() {
        return Err(RenderError::new(ValidationError::EmptyRenderedSvg.to_string()));
    }
    Ok(svg)
}
