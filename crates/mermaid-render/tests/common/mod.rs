//! Test doubles and an in-memory `AppState`.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use mermaid_render::{Adapters, AppState};
use mermaid_render_core::{
    domain::{ConversionError, Converter, PngOptions, RenderError, Renderer},
    infrastructure::{
        InMemoryDiagramImageRepository, InMemoryDiagramRepository,
        InMemoryEditorSessionRepository, RecordingEventPublisher,
    },
};

pub const SAMPLE_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><g/></svg>";
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G'];

/// Renders anything except sources containing `invalid`.
pub struct FakeRenderer;

#[async_trait]
impl Renderer for FakeRenderer {
    async fn render(&self, mermaid_code: &str) -> Result<String, RenderError> {
        if mermaid_code.contains("invalid") {
            return Err(RenderError::new("Parse error on line 2").at(Some(2), None));
        }
        Ok(SAMPLE_SVG.to_string())
    }
}

pub struct FakeConverter {
    pub fail: bool,
}

#[async_trait]
impl Converter for FakeConverter {
    async fn convert_to_png(
        &self,
        _svg: &str,
        _options: &PngOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        if self.fail {
            return Err(ConversionError::Raster("boom".into()));
        }
        Ok(PNG_BYTES.to_vec())
    }

    fn clean_svg(&self, svg: &str) -> String {
        svg.trim().to_string()
    }
}

pub fn state_with(converter: FakeConverter) -> (AppState, Arc<RecordingEventPublisher>) {
    let events = Arc::new(RecordingEventPublisher::new());
    let state = AppState::new(Adapters {
        renderer: Arc::new(FakeRenderer),
        converter: Arc::new(converter),
        diagrams: Arc::new(InMemoryDiagramRepository::new()),
        images: Arc::new(InMemoryDiagramImageRepository::new()),
        sessions: Arc::new(InMemoryEditorSessionRepository::new()),
        publisher: events.clone(),
    });
    (state, events)
}

pub fn state() -> AppState {
    state_with(FakeConverter { fail: false }).0
}
