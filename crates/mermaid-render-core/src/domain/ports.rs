//! Outbound capabilities the use cases depend on.
//!
//! The rendering engine, the raster converter, and the event sink are all
//! external. The domain only sees these traits; adapters live in
//! `infrastructure`.

#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    events::DomainEvent,
    export_options::{ExportOptions, ImageFormat, ImagePayload},
};

// ============================================================================
// RENDERER
// ============================================================================

/// Failure reported by a `Renderer`, optionally pointing into the source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct RenderError {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

impl RenderError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    #[must_use]
    pub const fn at(mut self, line: Option<u32>, column: Option<u32>) -> Self {
        self.line = line;
        self.column = column;
        self
    }
}

/// Turns Mermaid source into SVG markup.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// # Errors
    ///
    /// Returns `RenderError` when the engine rejects the source or fails.
    async fn render(&self, mermaid_code: &str) -> Result<String, RenderError>;
}

// ============================================================================
// CONVERTER
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("invalid SVG: {0}")]
    InvalidSvg(String),

    #[error("rasterization failed: {0}")]
    Raster(String),

    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Raster parameters for PNG conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct PngOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub scale: f64,
    pub background_color: Option<String>,
}

impl Default for PngOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            scale: 1.0,
            background_color: None,
        }
    }
}

impl From<&ExportOptions> for PngOptions {
    fn from(options: &ExportOptions) -> Self {
        Self {
            width: options.width(),
            height: options.height(),
            scale: options.scale(),
            background_color: options.background_color().map(str::to_string),
        }
    }
}

/// Converts SVG markup into an export payload.
#[async_trait]
pub trait Converter: Send + Sync {
    /// # Errors
    ///
    /// Returns `ConversionError` if the SVG cannot be parsed, rasterized, or encoded.
    async fn convert_to_png(&self, svg: &str, options: &PngOptions)
        -> Result<Vec<u8>, ConversionError>;

    /// Normalize SVG markup for standalone delivery.
    fn clean_svg(&self, svg: &str) -> String;

    /// Convert to `format`. SVG output is the cleaned markup.
    ///
    /// # Errors
    ///
    /// Returns `ConversionError` from the PNG path.
    async fn convert(
        &self,
        svg: &str,
        format: ImageFormat,
        options: &PngOptions,
    ) -> Result<ImagePayload, ConversionError> {
        match format {
            ImageFormat::Png => self.convert_to_png(svg, options).await.map(ImagePayload::Bytes),
            ImageFormat::Svg => Ok(ImagePayload::Text(self.clean_svg(svg))),
        }
    }
}

// ============================================================================
// EVENT PUBLISHER
// ============================================================================

/// Fire-and-forget sink for drained domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: DomainEvent);

    async fn publish_all(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.publish(event).await;
        }
    }
}
