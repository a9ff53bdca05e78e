use std::sync::Arc;

use super::{ExportImageResult, ExportPipeline};
use crate::{
    domain::{
        Converter, DiagramImageRepository, EventPublisher, ExportOptions, ImageFormat, Renderer,
    },
    error::Result,
};

pub struct ExportSvgUseCase {
    pipeline: ExportPipeline,
}

impl ExportSvgUseCase {
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

    /// Render `mermaid_code` and deliver the cleaned SVG markup.
    ///
    /// # Errors
    ///
    /// - `Error::Validation` for a blank file name
    /// - `Error::Render` if the engine rejects the source
    /// - `Error::Conversion` after the failed image has been saved
    pub async fn execute(
        &self,
        mermaid_code: &str,
        file_name: Option<String>,
    ) -> Result<ExportImageResult> {
        let options = ExportOptions::builder().file_name(file_name).build()?;
        self.pipeline
            .run(mermaid_code, ImageFormat::Svg, options)
            .await
    }
}
