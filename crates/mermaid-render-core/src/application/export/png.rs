use std::sync::Arc;

use super::{ExportImageResult, ExportPipeline};
use crate::{
    domain::{
        Converter, DiagramImageRepository, EventPublisher, ExportOptions, ImageFormat, Renderer,
    },
    error::Result,
};

/// Input of a PNG export. Validated into `ExportOptions` before rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportPngCommand {
    pub mermaid_code: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: Option<f64>,
    pub background_color: Option<String>,
    pub file_name: Option<String>,
}

impl ExportPngCommand {
    #[must_use]
    pub fn new(mermaid_code: impl Into<String>) -> Self {
        Self {
            mermaid_code: mermaid_code.into(),
            ..Self::default()
        }
    }
}

pub struct ExportPngUseCase {
    pipeline: ExportPipeline,
}

impl ExportPngUseCase {
    #[must_use]
    pub fn new(
        renderer: Arc<dyn Renderer>,
        converter: Arc<dyn Converter>,
        repository: Arc<dyn DiagramImageRepository>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            pipeline: ExportPipeline {
                renderer,
                converter,
                repository,
                publisher,
            },
        }
    }

    /// Render and rasterize `command.mermaid_code`.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for bad options (before any rendering)
    /// - `Error::Render` if the engine rejects the source
    /// - `Error::Conversion` after the failed image has been saved
    pub async fn execute(&self, command: ExportPngCommand) -> Result<ExportImageResult> {
        let options = ExportOptions::builder()
            .file_name(command.file_name)
            .width(command.width)
            .height(command.height)
            .scale(command.scale)
            .background_color(command.background_color)
            .build()?;

        self.pipeline
            .run(&command.mermaid_code, ImageFormat::Png, options)
            .await
    }
}
