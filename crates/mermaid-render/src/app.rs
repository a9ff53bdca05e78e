//! Use-case wiring shared by every transport.

use std::{sync::Arc, time::Duration};

use mermaid_render_core::{
    application::{
        EditorSessionUseCases, ExportPngUseCase, ExportSvgUseCase, RenderDiagramUseCase,
    },
    config::{Config, StorageBackend},
    domain::{
        Converter, DiagramImageRepository, DiagramRepository, EditorSessionRepository,
        EventPublisher, Renderer,
    },
    infrastructure::{
        memory::{RESULT_SWEEP_INTERVAL, SESSION_SWEEP_INTERVAL},
        CommandRenderer, Database, FanOutPublisher, InMemoryDiagramImageRepository,
        InMemoryDiagramRepository, InMemoryEditorSessionRepository, ResvgConverter,
        TracingEventPublisher,
    },
    Error, Result,
};
use tracing::info;

/// The engines, stores, and event sink a process runs with.
pub struct Adapters {
    pub renderer: Arc<dyn Renderer>,
    pub converter: Arc<dyn Converter>,
    pub diagrams: Arc<dyn DiagramRepository>,
    pub images: Arc<dyn DiagramImageRepository>,
    pub sessions: Arc<dyn EditorSessionRepository>,
    pub publisher: Arc<dyn EventPublisher>,
}

/// Use cases, cheap to clone into handlers.
#[derive(Clone)]
pub struct AppState {
    pub render: Arc<RenderDiagramUseCase>,
    pub export_png: Arc<ExportPngUseCase>,
    pub export_svg: Arc<ExportSvgUseCase>,
    pub editor: Arc<EditorSessionUseCases>,
}

impl AppState {
    #[must_use]
    pub fn new(adapters: Adapters) -> Self {
        let Adapters {
            renderer,
            converter,
            diagrams,
            images,
            sessions,
            publisher,
        } = adapters;

        let render = Arc::new(RenderDiagramUseCase::new(
            Arc::clone(&renderer),
            diagrams,
            Arc::clone(&publisher),
        ));
        let export_png = Arc::new(ExportPngUseCase::new(
            Arc::clone(&renderer),
            Arc::clone(&converter),
            Arc::clone(&images),
            Arc::clone(&publisher),
        ));
        let export_svg = Arc::new(ExportSvgUseCase::new(
            renderer,
            converter,
            images,
            Arc::clone(&publisher),
        ));
        let editor = Arc::new(EditorSessionUseCases::new(
            sessions,
            publisher,
            Arc::clone(&render),
        ));

        Self {
            render,
            export_png,
            export_svg,
            editor,
        }
    }

    /// Build the production adapters described by `config`.
    ///
    /// Events always go to the tracing log; `observer`, when given, receives
    /// them as well.
    ///
    /// # Errors
    ///
    /// Returns an error if the SQLite database cannot be opened.
    pub async fn from_config(
        config: &Config,
        observer: Option<Arc<dyn EventPublisher>>,
    ) -> Result<Self> {
        let renderer = CommandRenderer::new(
            config.renderer.command.clone(),
            config.renderer.args.clone(),
            Duration::from_secs(config.renderer.timeout_secs),
        );
        if !renderer.is_available() {
            tracing::warn!(
                command = %config.renderer.command,
                "Mermaid CLI not found on PATH; renders will fail"
            );
        }

        let converter = if config.converter.system_fonts {
            ResvgConverter::new()
        } else {
            ResvgConverter::without_fonts()
        };

        let publisher: Arc<dyn EventPublisher> = match observer {
            Some(observer) => Arc::new(FanOutPublisher::new(vec![
                Arc::new(TracingEventPublisher) as Arc<dyn EventPublisher>,
                observer,
            ])),
            None => Arc::new(TracingEventPublisher),
        };

        let (diagrams, images, sessions) = open_storage(config).await?;

        Ok(Self::new(Adapters {
            renderer: Arc::new(renderer),
            converter: Arc::new(converter),
            diagrams,
            images,
            sessions,
            publisher,
        }))
    }
}

async fn open_storage(
    config: &Config,
) -> Result<(
    Arc<dyn DiagramRepository>,
    Arc<dyn DiagramImageRepository>,
    Arc<dyn EditorSessionRepository>,
)> {
    match config.storage.backend {
        StorageBackend::Memory => {
            let result_ttl = Duration::from_secs(config.storage.result_ttl_secs);
            let session_ttl = Duration::from_secs(config.storage.session_ttl_secs);
            info!(backend = "memory", "Storage ready");
            Ok((
                Arc::new(InMemoryDiagramRepository::with_ttl(
                    result_ttl,
                    RESULT_SWEEP_INTERVAL,
                )),
                Arc::new(InMemoryDiagramImageRepository::with_ttl(
                    result_ttl,
                    RESULT_SWEEP_INTERVAL,
                )),
                Arc::new(InMemoryEditorSessionRepository::with_ttl(
                    session_ttl,
                    SESSION_SWEEP_INTERVAL,
                )),
            ))
        }
        StorageBackend::Sqlite => {
            let path = config.storage.path.as_deref().ok_or_else(|| {
                Error::invalid_config("storage.path is required for the sqlite backend")
            })?;
            let db = Database::open(path).await?;
            info!(backend = "sqlite", path = %path.display(), "Storage ready");
            Ok((
                Arc::new(db.diagrams()),
                Arc::new(db.images()),
                Arc::new(db.sessions()),
            ))
        }
    }
}
