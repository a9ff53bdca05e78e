//! SVG/PNG export use cases.
//!
//! Both formats share one pipeline: render the source, create the image,
//! convert, then record the outcome. The image exists before conversion, so
//! a converter failure is captured as `Failed` (code `CONVERSION_FAILED`),
//! saved, published, and only then returned. A renderer failure happens
//! before any image exists and propagates untouched.

mod png;
mod svg;

use std::sync::Arc;

use tracing::{info, warn};

pub use png::{ExportPngCommand, ExportPngUseCase};
pub use svg::ExportSvgUseCase;

use super::{render_svg, CONVERSION_FAILED};
use crate::{
    domain::{
        AggregateId, Converter, DiagramImage, DiagramImageRepository, EventPublisher, ExportError,
        ExportOptions, ImageFormat, ImagePayload, PngOptions, Renderer,
    },
    error::Result,
};

/// Outcome of a successful export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportImageResult {
    pub image_id: AggregateId,
    pub image_data: ImagePayload,
    pub format: ImageFormat,
    pub file_name: String,
    pub file_size: u64,
}

/// Collaborators shared by both export use cases.
#[derive(Clone)]
struct ExportPipeline {
    renderer: Arc<dyn Renderer>,
    converter: Arc<dyn Converter>,
    repository: Arc<dyn DiagramImageRepository>,
    publisher: Arc<dyn EventPublisher>,
}

impl ExportPipeline {
    async fn run(
        &self,
        mermaid_code: &str,
        format: ImageFormat,
        options: ExportOptions,
    ) -> Result<ExportImageResult> {
        let svg = render_svg(self.renderer.as_ref(), mermaid_code).await?;
        let mut image = DiagramImage::create(&svg, format, options)?;

        let png_options = PngOptions::from(image.options());
        let converted = self
            .converter
            .convert(image.source_svg(), format, &png_options)
            .await;

        match converted {
            Ok(payload) => {
                image.mark_as_exported(payload)?;
                self.persist(&mut image).await?;
                info!(
                    image_id = %image.id(),
                    %format,
                    file_size = image.file_size(),
                    "Image exported"
                );

                Ok(ExportImageResult {
                    image_id: image.id(),
                    image_data: image.image_data()?.clone(),
                    format,
                    file_name: image.file_name(),
                    file_size: image.file_size(),
                })
            }
            Err(conversion_error) => {
                let detail = ExportError::create(&conversion_error.to_string())?
                    .with_code(CONVERSION_FAILED);
                image.mark_as_failed(detail);
                self.persist(&mut image).await?;
                warn!(
                    image_id = %image.id(),
                    %format,
                    error = %conversion_error,
                    "Image export failed"
                );

                Err(conversion_error.into())
            }
        }
    }

    async fn persist(&self, image: &mut DiagramImage) -> Result<()> {
        let events = image.pull_domain_events();
        self.repository.save(image).await?;
        self.publisher.publish_all(events).await;
        Ok(())
    }
}
