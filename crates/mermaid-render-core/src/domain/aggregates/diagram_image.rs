//! `DiagramImage` aggregate root.
//!
//! Holds a source SVG, the requested export format and options, and the
//! outcome of converting it. Shares the three result invariants with
//! `Diagram`, applied to export status, image data, and export error.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::check_outcome;
use crate::domain::{
    errors::{InvariantViolation, ValidationError},
    events::{DomainEvent, EventBuffer, EventKind},
    export_options::{ExportOptions, ImageFormat, ImagePayload},
    identifiers::AggregateId,
    rendering_error::ExportError,
    status::ExportStatus,
};

// ============================================================================
// DOMAIN ERRORS
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DiagramImageError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    /// SVG output is resolution independent
    #[error("Cannot resize SVG format")]
    CannotResizeSvg,

    #[error("Image has not been successfully exported")]
    NotExported,
}

// ============================================================================
// DIAGRAM IMAGE AGGREGATE ROOT
// ============================================================================

#[derive(Debug, Clone)]
pub struct DiagramImage {
    id: AggregateId,
    source_svg: String,
    format: ImageFormat,
    image_data: Option<ImagePayload>,
    options: ExportOptions,
    export_status: ExportStatus,
    error: Option<ExportError>,
    created_at: DateTime<Utc>,
    events: EventBuffer,
}

impl DiagramImage {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Create a pending export and record `ImageExportRequested`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptySourceSvg` for blank SVG.
    pub fn create(
        source_svg: &str,
        format: ImageFormat,
        options: ExportOptions,
    ) -> Result<Self, DiagramImageError> {
        let source_svg = source_svg.trim();
        if source_svg.is_empty() {
            return Err(ValidationError::EmptySourceSvg.into());
        }

        let mut image = Self {
            id: AggregateId::generate(),
            source_svg: source_svg.to_string(),
            format,
            image_data: None,
            options,
            export_status: ExportStatus::Pending,
            error: None,
            created_at: Utc::now(),
            events: EventBuffer::default(),
        };

        image.events.record(
            image.id,
            EventKind::ImageExportRequested {
                format,
                width: image.options.width(),
                height: image.options.height(),
            },
        );
        Ok(image)
    }

    /// Rebuild a stored image. Records no events.
    ///
    /// # Errors
    ///
    /// Returns `DiagramImageError::Invariant` if the stored state is inconsistent.
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: AggregateId,
        source_svg: String,
        format: ImageFormat,
        image_data: Option<ImagePayload>,
        options: ExportOptions,
        export_status: ExportStatus,
        error: Option<ExportError>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DiagramImageError> {
        let image = Self {
            id,
            source_svg,
            format,
            image_data,
            options,
            export_status,
            error,
            created_at,
            events: EventBuffer::default(),
        };
        image.validate_invariants()?;
        Ok(image)
    }

    // ========================================================================
    // STATE TRANSITIONS
    // ========================================================================

    /// Record the converted output.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyImageData` for an empty payload.
    pub fn mark_as_exported(&mut self, data: ImagePayload) -> Result<(), DiagramImageError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyImageData.into());
        }

        let file_size = data.byte_len() as u64;
        self.image_data = Some(data);
        self.export_status = ExportStatus::Success;
        self.error = None;
        self.validate_invariants()?;

        self.events.record(
            self.id,
            EventKind::ImageExported {
                format: self.format,
                file_size,
            },
        );
        Ok(())
    }

    /// Record a failed export, dropping any previous output.
    pub fn mark_as_failed(&mut self, error: ExportError) {
        self.events.record(
            self.id,
            EventKind::ImageExportFailed {
                error_message: error.message().to_string(),
            },
        );

        self.image_data = None;
        self.export_status = ExportStatus::Failed;
        self.error = Some(error);
    }

    /// Change the raster size and mark the export stale.
    ///
    /// File name, scale, and background colour are kept.
    ///
    /// # Errors
    ///
    /// - `DiagramImageError::CannotResizeSvg` for SVG exports
    /// - `ValidationError::NonPositiveDimensions` if either side is zero
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), DiagramImageError> {
        if self.format == ImageFormat::Svg {
            return Err(DiagramImageError::CannotResizeSvg);
        }
        if width == 0 || height == 0 {
            return Err(ValidationError::NonPositiveDimensions.into());
        }

        self.options = self.options.with_dimensions(width, height)?;
        self.export_status = ExportStatus::Pending;
        self.image_data = None;
        self.error = None;

        self.events.record(
            self.id,
            EventKind::ImageResized {
                new_width: width,
                new_height: height,
            },
        );
        Ok(())
    }

    /// Take every event recorded since the last pull.
    pub fn pull_domain_events(&mut self) -> Vec<DomainEvent> {
        self.events.drain()
    }

    // ========================================================================
    // QUERY METHODS
    // ========================================================================

    /// Output of a successful export.
    ///
    /// # Errors
    ///
    /// Returns `DiagramImageError::NotExported` unless the status is `Success`.
    pub fn image_data(&self) -> Result<&ImagePayload, DiagramImageError> {
        if self.export_status != ExportStatus::Success {
            return Err(DiagramImageError::NotExported);
        }
        self.image_data.as_ref().ok_or_else(|| {
            InvariantViolation::SuccessWithoutResult {
                aggregate: "DiagramImage",
                result: "image data",
            }
            .into()
        })
    }

    /// `{file_name}.{ext}` when a name was requested, otherwise
    /// `diagram-{created_at epoch ms}.{ext}`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let extension = self.format.extension();
        self.options.file_name().map_or_else(
            || format!("diagram-{}.{extension}", self.created_at.timestamp_millis()),
            |name| format!("{name}.{extension}"),
        )
    }

    /// Byte length of the output, 0 when there is none.
    #[must_use]
    pub fn file_size(&self) -> u64 {
        self.image_data
            .as_ref()
            .map_or(0, |data| data.byte_len() as u64)
    }

    #[must_use]
    pub const fn id(&self) -> AggregateId {
        self.id
    }

    #[must_use]
    pub fn source_svg(&self) -> &str {
        &self.source_svg
    }

    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    #[must_use]
    pub const fn options(&self) -> &ExportOptions {
        &self.options
    }

    #[must_use]
    pub const fn export_status(&self) -> ExportStatus {
        self.export_status
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ExportError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Raw payload regardless of status, for persistence adapters.
    #[must_use]
    pub const fn stored_data(&self) -> Option<&ImagePayload> {
        self.image_data.as_ref()
    }

    fn validate_invariants(&self) -> Result<(), InvariantViolation> {
        check_outcome(
            "DiagramImage",
            "image data",
            matches!(self.export_status, ExportStatus::Success),
            matches!(self.export_status, ExportStatus::Failed),
            self.image_data.as_ref().is_some_and(|data| !data.is_empty()),
            self.error.is_some(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = "<svg><g/></svg>";

    fn png() -> DiagramImage {
        DiagramImage::create(SVG, ImageFormat::Png, ExportOptions::default()).expect("valid svg")
    }

    #[test]
    fn test_create_is_pending_and_records_request() {
        let mut image = DiagramImage::create(
            "  <svg/>  ",
            ImageFormat::Png,
            ExportOptions::builder()
                .width(Some(800))
                .height(Some(600))
                .build()
                .expect("valid options"),
        )
        .expect("valid svg");

        assert_eq!(image.source_svg(), "<svg/>");
        assert_eq!(image.export_status(), ExportStatus::Pending);
        assert_eq!(image.file_size(), 0);

        let events = image.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].kind,
            EventKind::ImageExportRequested {
                format: ImageFormat::Png,
                width: Some(800),
                height: Some(600),
            }
        );
    }

    #[test]
    fn test_create_rejects_blank_svg() {
        let result = DiagramImage::create(" ", ImageFormat::Svg, ExportOptions::default());
        assert!(matches!(
            result,
            Err(DiagramImageError::Validation(ValidationError::EmptySourceSvg))
        ));
    }

    #[test]
    fn test_mark_as_exported_computes_file_size() {
        let mut image = png();
        image
            .mark_as_exported(ImagePayload::Bytes(vec![0x89, 0x50, 0x4e, 0x47]))
            .expect("non-empty data");

        assert_eq!(image.export_status(), ExportStatus::Success);
        assert_eq!(image.file_size(), 4);
        assert!(image.image_data().is_ok());
    }

    #[test]
    fn test_mark_as_exported_text_uses_utf8_length() {
        let mut image =
            DiagramImage::create(SVG, ImageFormat::Svg, ExportOptions::default()).expect("valid");
        image
            .mark_as_exported(ImagePayload::Text("<svg>é</svg>".into()))
            .expect("non-empty data");
        assert_eq!(image.file_size(), 13);
    }

    #[test]
    fn test_mark_as_exported_rejects_empty() {
        let mut image = png();
        let result = image.mark_as_exported(ImagePayload::Bytes(Vec::new()));
        assert_eq!(
            result,
            Err(DiagramImageError::Validation(ValidationError::EmptyImageData))
        );
        assert_eq!(image.export_status(), ExportStatus::Pending);
    }

    #[test]
    fn test_mark_as_failed() {
        let mut image = png();
        image
            .mark_as_exported(ImagePayload::Bytes(vec![1]))
            .expect("non-empty data");
        image.mark_as_failed(ExportError::create("Conversion failed").expect("valid"));

        assert_eq!(image.export_status(), ExportStatus::Failed);
        assert_eq!(image.file_size(), 0);
        assert_eq!(image.image_data(), Err(DiagramImageError::NotExported));
        assert_eq!(
            image.error().map(ExportError::message),
            Some("Conversion failed")
        );
    }

    #[test]
    fn test_file_name() {
        let named = DiagramImage::create(
            SVG,
            ImageFormat::Png,
            ExportOptions::builder()
                .file_name(Some("my-diagram"))
                .build()
                .expect("valid"),
        )
        .expect("valid svg");
        assert_eq!(named.file_name(), "my-diagram.png");

        let unnamed = png();
        assert_eq!(
            unnamed.file_name(),
            format!("diagram-{}.png", unnamed.created_at().timestamp_millis())
        );
    }

    #[test]
    fn test_resize_png_resets_to_pending() {
        let mut image = png();
        image
            .mark_as_exported(ImagePayload::Bytes(vec![1, 2]))
            .expect("non-empty data");
        let _ = image.pull_domain_events();

        image.resize(1024, 768).expect("png can be resized");

        assert_eq!(image.export_status(), ExportStatus::Pending);
        assert_eq!(image.file_size(), 0);
        assert_eq!(image.options().width(), Some(1024));
        assert_eq!(image.options().height(), Some(768));
        let events = image.pull_domain_events();
        assert_eq!(events.len(), 1);
        assert_eq!(
            events[0].kind,
            EventKind::ImageResized {
                new_width: 1024,
                new_height: 768,
            }
        );
    }

    #[test]
    fn test_resize_rejects_zero() {
        let mut image = png();
        assert_eq!(
            image.resize(0, 100),
            Err(DiagramImageError::Validation(
                ValidationError::NonPositiveDimensions
            ))
        );
        assert_eq!(
            image.resize(0, 100).err().map(|e| e.to_string()),
            Some("Width and height must be greater than 0".to_string())
        );
    }

    #[test]
    fn test_resize_svg_always_fails() {
        let mut image =
            DiagramImage::create(SVG, ImageFormat::Svg, ExportOptions::default()).expect("valid");
        assert_eq!(image.resize(1024, 768), Err(DiagramImageError::CannotResizeSvg));
        assert_eq!(image.resize(0, 0), Err(DiagramImageError::CannotResizeSvg));
    }

    #[test]
    fn test_reconstitute_checks_invariants() {
        let now = Utc::now();
        let success_without_data = DiagramImage::reconstitute(
            AggregateId::generate(),
            SVG.into(),
            ImageFormat::Png,
            None,
            ExportOptions::default(),
            ExportStatus::Success,
            None,
            now,
        );
        assert!(matches!(
            success_without_data,
            Err(DiagramImageError::Invariant(_))
        ));

        let failed_without_error = DiagramImage::reconstitute(
            AggregateId::generate(),
            SVG.into(),
            ImageFormat::Png,
            None,
            ExportOptions::default(),
            ExportStatus::Failed,
            None,
            now,
        );
        assert!(matches!(
            failed_without_error,
            Err(DiagramImageError::Invariant(InvariantViolation::FailedWithoutError { .. }))
        ));

        let mut ok = DiagramImage::reconstitute(
            AggregateId::generate(),
            SVG.into(),
            ImageFormat::Png,
            Some(ImagePayload::Bytes(vec![9; 10])),
            ExportOptions::default(),
            ExportStatus::Success,
            None,
            now,
        )
        .expect("consistent");
        assert_eq!(ok.file_size(), 10);
        assert!(ok.pull_domain_events().is_empty());
    }
}
