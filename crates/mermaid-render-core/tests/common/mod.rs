//! Hand-written test doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use mermaid_render_core::{
    application::{
        EditorSessionUseCases, ExportPngUseCase, ExportSvgUseCase, RenderDiagramUseCase,
    },
    domain::{ConversionError, Converter, PngOptions, RenderError, Renderer},
    infrastructure::{
        InMemoryDiagramImageRepository, InMemoryDiagramRepository,
        InMemoryEditorSessionRepository, RecordingEventPublisher,
    },
};

pub const SAMPLE_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><g/></svg>";
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 1, 2, 3];

// ============================================================================
// RENDERER
// ============================================================================

/// Returns a fixed outcome and counts calls.
pub struct StubRenderer {
    outcome: Result<String, RenderError>,
    calls: AtomicUsize,
}

impl StubRenderer {
    pub fn ok(svg: &str) -> Self {
        Self {
            outcome: Ok(svg.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: RenderError) -> Self {
        Self {
            outcome: Err(error),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Renderer for StubRenderer {
    async fn render(&self, _mermaid_code: &str) -> Result<String, RenderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

// ============================================================================
// CONVERTER
// ============================================================================

pub struct StubConverter {
    fail_with: Option<ConversionError>,
}

impl StubConverter {
    pub const fn ok() -> Self {
        Self { fail_with: None }
    }

    pub const fn failing(error: ConversionError) -> Self {
        Self {
            fail_with: Some(error),
        }
    }
}

#[async_trait]
impl Converter for StubConverter {
    async fn convert_to_png(
        &self,
        _svg: &str,
        _options: &PngOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        self.fail_with
            .clone()
            .map_or_else(|| Ok(PNG_BYTES.to_vec()), Err)
    }

    fn clean_svg(&self, svg: &str) -> String {
        svg.trim().to_string()
    }
}

// ============================================================================
// WIRING
// ============================================================================

/// Use cases over in-memory storage and a recording publisher.
pub struct Harness {
    pub renderer: Arc<StubRenderer>,
    pub diagrams: Arc<InMemoryDiagramRepository>,
    pub images: Arc<InMemoryDiagramImageRepository>,
    pub sessions: Arc<InMemoryEditorSessionRepository>,
    pub events: Arc<RecordingEventPublisher>,
    pub render: Arc<RenderDiagramUseCase>,
    pub export_png: ExportPngUseCase,
    pub export_svg: ExportSvgUseCase,
    pub editor: EditorSessionUseCases,
}

impl Harness {
    pub fn new(renderer: StubRenderer, converter: StubConverter) -> Self {
        let renderer = Arc::new(renderer);
        let converter = Arc::new(converter);
        let diagrams = Arc::new(InMemoryDiagramRepository::new());
        let images = Arc::new(InMemoryDiagramImageRepository::new());
        let sessions = Arc::new(InMemoryEditorSessionRepository::new());
        let events = Arc::new(RecordingEventPublisher::new());

        let render = Arc::new(RenderDiagramUseCase::new(
            renderer.clone(),
            diagrams.clone(),
            events.clone(),
        ));
        let export_png =
            ExportPngUseCase::new(renderer.clone(), converter.clone(), images.clone(), events.clone());
        let export_svg =
            ExportSvgUseCase::new(renderer.clone(), converter, images.clone(), events.clone());
        let editor = EditorSessionUseCases::new(sessions.clone(), events.clone(), render.clone());

        Self {
            renderer,
            diagrams,
            images,
            sessions,
            events,
            render,
            export_png,
            export_svg,
            editor,
        }
    }

    pub fn healthy() -> Self {
        Self::new(StubRenderer::ok(SAMPLE_SVG), StubConverter::ok())
    }
}
