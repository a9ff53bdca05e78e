//! Export parameters, target formats, and the produced image payload.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::errors::ValidationError;

/// Characters a file name may not contain.
const FORBIDDEN_FILE_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

// ============================================================================
// IMAGE FORMAT
// ============================================================================

/// Target format of an export.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, Display, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    #[must_use]
    pub const fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }
}

// ============================================================================
// EXPORT OPTIONS
// ============================================================================

/// Validated export parameters.
///
/// `background_color` is passed through to the converter untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    file_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    scale: f64,
    background_color: Option<String>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            file_name: None,
            width: None,
            height: None,
            scale: 1.0,
            background_color: None,
        }
    }
}

impl ExportOptions {
    /// Start building a set of options.
    #[must_use]
    pub fn builder() -> ExportOptionsBuilder {
        ExportOptionsBuilder::default()
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    #[must_use]
    pub const fn width(&self) -> Option<u32> {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> Option<u32> {
        self.height
    }

    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    /// Same options with new dimensions, re-validated.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if either dimension is zero.
    pub fn with_dimensions(&self, width: u32, height: u32) -> Result<Self, ValidationError> {
        ExportOptionsBuilder {
            file_name: self.file_name.clone(),
            width: Some(width),
            height: Some(height),
            scale: Some(self.scale),
            background_color: self.background_color.clone(),
        }
        .build()
    }
}

fn validate_file_name(file_name: &str) -> Result<(), ValidationError> {
    if file_name.contains(FORBIDDEN_FILE_NAME_CHARS) {
        return Err(ValidationError::InvalidFileName(file_name.to_string()));
    }
    if file_name.trim().is_empty() {
        return Err(ValidationError::EmptyFileName);
    }
    Ok(())
}

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`ExportOptions`]. Validation happens in [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct ExportOptionsBuilder {
    file_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    scale: Option<f64>,
    background_color: Option<String>,
}

impl ExportOptionsBuilder {
    #[must_use]
    pub fn file_name(mut self, file_name: Option<impl Into<String>>) -> Self {
        self.file_name = file_name.map(Into::into);
        self
    }

    #[must_use]
    pub const fn width(mut self, width: Option<u32>) -> Self {
        self.width = width;
        self
    }

    #[must_use]
    pub const fn height(mut self, height: Option<u32>) -> Self {
        self.height = height;
        self
    }

    #[must_use]
    pub const fn scale(mut self, scale: Option<f64>) -> Self {
        self.scale = scale;
        self
    }

    #[must_use]
    pub fn background_color(mut self, color: Option<impl Into<String>>) -> Self {
        self.background_color = color.map(Into::into);
        self
    }

    /// Validate and build the options.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if:
    /// - the file name is blank or contains `/ \ : * ? " < > |`
    /// - width or height is zero
    /// - scale is not a positive finite number
    pub fn build(self) -> Result<ExportOptions, ValidationError> {
        if let Some(file_name) = self.file_name.as_deref() {
            validate_file_name(file_name)?;
        }
        if self.width == Some(0) {
            return Err(ValidationError::NonPositiveWidth);
        }
        if self.height == Some(0) {
            return Err(ValidationError::NonPositiveHeight);
        }

        let scale = self.scale.unwrap_or(1.0);
        if !(scale.is_finite() && scale > 0.0) {
            return Err(ValidationError::NonPositiveScale);
        }

        Ok(ExportOptions {
            file_name: self.file_name,
            width: self.width,
            height: self.height,
            scale,
            background_color: self.background_color,
        })
    }
}

// ============================================================================
// IMAGE PAYLOAD
// ============================================================================

/// Produced image data: raw bytes (PNG) or text (SVG markup).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    Bytes(Vec<u8>),
    Text(String),
}

impl ImagePayload {
    /// Length in bytes; text is measured as UTF-8.
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Bytes(bytes) => bytes.len(),
            Self::Text(text) => text.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.byte_len() == 0
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.as_bytes(),
        }
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Bytes(bytes) => bytes,
            Self::Text(text) => text.into_bytes(),
        }
    }
}

impl From<Vec<u8>> for ImagePayload {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<String> for ImagePayload {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::builder().build().expect("valid");
        assert_eq!(options, ExportOptions::default());
        assert!((options.scale() - 1.0).abs() < f64::EPSILON);
        assert_eq!(options.file_name(), None);
    }

    #[test]
    fn test_rejects_forbidden_file_name_characters() {
        for name in ["a/b", "a\\b", "a:b", "a*b", "a?b", "a\"b", "a<b", "a>b", "a|b"] {
            let result = ExportOptions::builder().file_name(Some(name)).build();
            assert!(
                matches!(result, Err(ValidationError::InvalidFileName(_))),
                "name: {name}"
            );
        }
    }

    #[test]
    fn test_rejects_blank_file_name() {
        let result = ExportOptions::builder().file_name(Some("   ")).build();
        assert_eq!(result.err(), Some(ValidationError::EmptyFileName));
    }

    #[test]
    fn test_rejects_zero_dimensions_and_bad_scale() {
        assert_eq!(
            ExportOptions::builder().width(Some(0)).build().err(),
            Some(ValidationError::NonPositiveWidth)
        );
        assert_eq!(
            ExportOptions::builder().height(Some(0)).build().err(),
            Some(ValidationError::NonPositiveHeight)
        );
        assert_eq!(
            ExportOptions::builder().scale(Some(0.0)).build().err(),
            Some(ValidationError::NonPositiveScale)
        );
        assert_eq!(
            ExportOptions::builder().scale(Some(-2.0)).build().err(),
            Some(ValidationError::NonPositiveScale)
        );
    }

    #[test]
    fn test_with_dimensions_keeps_other_fields() {
        let options = ExportOptions::builder()
            .file_name(Some("my-diagram"))
            .scale(Some(2.0))
            .background_color(Some("#fff"))
            .build()
            .expect("valid");

        let resized = options.with_dimensions(1024, 768).expect("valid");
        assert_eq!(resized.file_name(), Some("my-diagram"));
        assert_eq!(resized.width(), Some(1024));
        assert_eq!(resized.height(), Some(768));
        assert!((resized.scale() - 2.0).abs() < f64::EPSILON);
        assert_eq!(resized.background_color(), Some("#fff"));
    }

    #[test]
    fn test_payload_byte_len_counts_utf8() {
        assert_eq!(ImagePayload::Bytes(vec![1, 2, 3]).byte_len(), 3);
        assert_eq!(ImagePayload::Text("héllo".into()).byte_len(), 6);
        assert!(ImagePayload::Text(String::new()).is_empty());
    }

    #[test]
    fn test_format_extension_and_mime() {
        assert_eq!(ImageFormat::Png.extension(), "png");
        assert_eq!(ImageFormat::Svg.mime_type(), "image/svg+xml");
        assert_eq!("svg".parse::<ImageFormat>().ok(), Some(ImageFormat::Svg));
    }
}
