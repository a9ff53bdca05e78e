//! `Converter` backed by `resvg`.
//!
//! PNG output is sized to the requested viewport (or the SVG's own size),
//! multiplied by `scale`. The diagram is scaled uniformly to fit and centred.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use resvg::{
    tiny_skia::{Color, Pixmap, Transform},
    usvg::{fontdb, Options, Tree},
};

use crate::domain::{ConversionError, Converter, PngOptions};

/// Viewport used when the SVG reports no usable size.
pub const FALLBACK_WIDTH: f32 = 800.0;
pub const FALLBACK_HEIGHT: f32 = 600.0;

/// Largest pixmap side we are willing to allocate.
pub const MAX_DIMENSION: u32 = 16_384;

#[derive(Clone)]
pub struct ResvgConverter {
    fontdb: Arc<fontdb::Database>,
}

impl std::fmt::Debug for ResvgConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResvgConverter")
            .field("fonts", &self.fontdb.len())
            .finish()
    }
}

impl Default for ResvgConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ResvgConverter {
    /// Converter with the system fonts loaded once.
    #[must_use]
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        tracing::debug!(fonts = fontdb.len(), "Loaded system fonts");
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Converter without any fonts. Text nodes are dropped.
    #[must_use]
    pub fn without_fonts() -> Self {
        Self {
            fontdb: Arc::new(fontdb::Database::new()),
        }
    }
}

#[async_trait]
impl Converter for ResvgConverter {
    async fn convert_to_png(
        &self,
        svg: &str,
        options: &PngOptions,
    ) -> Result<Vec<u8>, ConversionError> {
        let svg = svg.to_string();
        let options = options.clone();
        let fontdb = Arc::clone(&self.fontdb);

        tokio::task::spawn_blocking(move || rasterize(&svg, &options, fontdb))
            .await
            .map_err(|e| ConversionError::Raster(e.to_string()))?
    }

    fn clean_svg(&self, svg: &str) -> String {
        clean_svg(svg)
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rasterize(
    svg: &str,
    options: &PngOptions,
    fontdb: Arc<fontdb::Database>,
) -> Result<Vec<u8>, ConversionError> {
    let mut usvg_options = Options::default();
    usvg_options.fontdb = fontdb;
    let tree = Tree::from_str(svg, &usvg_options)
        .map_err(|e| ConversionError::InvalidSvg(e.to_string()))?;

    let intrinsic = tree.size();
    let (svg_width, svg_height) = if intrinsic.width() > 0.0 && intrinsic.height() > 0.0 {
        (intrinsic.width(), intrinsic.height())
    } else {
        (FALLBACK_WIDTH, FALLBACK_HEIGHT)
    };

    let viewport_width = options.width.map_or(svg_width, |w| w as f32);
    let viewport_height = options.height.map_or(svg_height, |h| h as f32);
    let scale = options.scale as f32;

    let pixel_width = (viewport_width * scale).ceil() as u32;
    let pixel_height = (viewport_height * scale).ceil() as u32;
    if pixel_width == 0
        || pixel_height == 0
        || pixel_width > MAX_DIMENSION
        || pixel_height > MAX_DIMENSION
    {
        return Err(ConversionError::Raster(format!(
            "output size {pixel_width}x{pixel_height} is outside 1..={MAX_DIMENSION}"
        )));
    }

    let mut pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
        ConversionError::Raster(format!("cannot allocate {pixel_width}x{pixel_height} pixmap"))
    })?;
    pixmap.fill(parse_color(options.background_color.as_deref())?);

    let fit = (viewport_width / svg_width).min(viewport_height / svg_height) * scale;
    let offset_x = (pixel_width as f32 - svg_width * fit) / 2.0;
    let offset_y = (pixel_height as f32 - svg_height * fit) / 2.0;
    let transform = Transform::from_translate(offset_x, offset_y).pre_scale(fit, fit);

    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| ConversionError::Encode(e.to_string()))
}

/// Parse a background colour. `None` means white.
fn parse_color(color: Option<&str>) -> Result<Color, ConversionError> {
    let Some(raw) = color.map(str::trim) else {
        return Ok(Color::WHITE);
    };

    match raw.to_ascii_lowercase().as_str() {
        "white" => return Ok(Color::WHITE),
        "black" => return Ok(Color::BLACK),
        "transparent" | "none" => return Ok(Color::TRANSPARENT),
        _ => {}
    }

    let unsupported = || ConversionError::Raster(format!("unsupported background colour: {raw}"));
    let hex = raw.strip_prefix('#').ok_or_else(unsupported)?;
    if !hex.is_ascii() {
        return Err(unsupported());
    }

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16).map_err(|_| unsupported())
    };
    let short = |index: usize| channel(index..index + 1).map(|v| v * 17);

    match hex.len() {
        3 => Ok(Color::from_rgba8(short(0)?, short(1)?, short(2)?, 255)),
        6 => Ok(Color::from_rgba8(channel(0..2)?, channel(2..4)?, channel(4..6)?, 255)),
        8 => Ok(Color::from_rgba8(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => Err(unsupported()),
    }
}

/// Trim, then drop a leading XML prolog and every `<!-- -->` comment.
#[must_use]
pub fn clean_svg(svg: &str) -> String {
    let mut rest = svg.trim();
    if rest.starts_with("<?xml") {
        rest = rest.find("?>").map_or(rest, |end| rest[end + 2..].trim_start());
    }

    let mut cleaned = String::with_capacity(rest.len());
    while let Some(start) = rest.find("<!--") {
        cleaned.push_str(&rest[..start]);
        match rest[start..].find("-->") {
            Some(end) => rest = &rest[start + end + 3..],
            None => {
                rest = "";
                break;
            }
        }
    }
    cleaned.push_str(rest);
    cleaned.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="50"><rect width="100" height="50" fill="red"/></svg>"#;

    fn decode(bytes: &[u8]) -> Pixmap {
        Pixmap::decode_png(bytes).expect("valid png")
    }

    #[test]
    fn test_clean_svg_strips_prolog_and_comments() {
        let raw = "  <?xml version=\"1.0\"?>\n<!-- generated --><svg><!-- inner --><g/></svg>  ";
        assert_eq!(clean_svg(raw), "<svg><g/></svg>");
    }

    #[test]
    fn test_clean_svg_leaves_plain_markup_alone() {
        assert_eq!(clean_svg("<svg><g/></svg>"), "<svg><g/></svg>");
    }

    #[test]
    fn test_clean_svg_drops_unterminated_comment() {
        assert_eq!(clean_svg("<svg/><!-- dangling"), "<svg/>");
    }

    #[test]
    fn test_parse_color_forms() {
        assert_eq!(parse_color(None).ok(), Some(Color::WHITE));
        assert_eq!(parse_color(Some("Black")).ok(), Some(Color::BLACK));
        assert_eq!(parse_color(Some("transparent")).ok(), Some(Color::TRANSPARENT));
        assert_eq!(
            parse_color(Some("#f00")).ok(),
            Some(Color::from_rgba8(255, 0, 0, 255))
        );
        assert_eq!(
            parse_color(Some("#00ff0080")).ok(),
            Some(Color::from_rgba8(0, 255, 0, 128))
        );
        assert!(parse_color(Some("chartreuse")).is_err());
        assert!(parse_color(Some("#12345")).is_err());
    }

    #[tokio::test]
    async fn test_png_uses_intrinsic_size() {
        let converter = ResvgConverter::without_fonts();
        let png = converter
            .convert_to_png(RECT, &PngOptions::default())
            .await
            .expect("convert");

        let pixmap = decode(&png);
        assert_eq!((pixmap.width(), pixmap.height()), (100, 50));
    }

    #[tokio::test]
    async fn test_png_respects_viewport_and_scale() {
        let converter = ResvgConverter::without_fonts();
        let options = PngOptions {
            width: Some(200),
            height: Some(200),
            scale: 2.0,
            background_color: Some("transparent".into()),
        };
        let png = converter.convert_to_png(RECT, &options).await.expect("convert");

        let pixmap = decode(&png);
        assert_eq!((pixmap.width(), pixmap.height()), (400, 400));
        // letterboxed: the top-left corner is background
        let corner = pixmap.pixel(0, 0).expect("pixel");
        assert_eq!(corner.alpha(), 0);
        let centre = pixmap.pixel(200, 200).expect("pixel");
        assert_eq!(centre.alpha(), 255);
    }

    #[tokio::test]
    async fn test_invalid_svg_is_rejected() {
        let converter = ResvgConverter::without_fonts();
        let result = converter
            .convert_to_png("definitely not svg", &PngOptions::default())
            .await;
        assert!(matches!(result, Err(ConversionError::InvalidSvg(_))));
    }

    #[tokio::test]
    async fn test_svg_format_returns_cleaned_text() {
        let converter = ResvgConverter::without_fonts();
        let payload = converter
            .convert(
                "<?xml version=\"1.0\"?><svg/>",
                crate::domain::ImageFormat::Svg,
                &PngOptions::default(),
            )
            .await
            .expect("convert");
        assert_eq!(payload, crate::domain::ImagePayload::Text("<svg/>".into()));
    }
}
