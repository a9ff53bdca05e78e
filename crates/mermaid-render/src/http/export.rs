//! `/api/v1/export` routes. Successful exports return the raw file.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use mermaid_render_core::application::{ExportImageResult, ExportPngCommand};
use serde::Deserialize;

use super::response::{ApiError, ApiJson, ApiResult};
use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PngOptionsBody {
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub scale: Option<f64>,
    pub background_color: Option<String>,
    pub file_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPngRequest {
    pub mermaid_code: String,
    #[serde(default)]
    pub options: Option<PngOptionsBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSvgRequest {
    pub mermaid_code: String,
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Negative sizes fold to 0 so option validation reports them as non-positive.
fn dimension(value: Option<i64>) -> Option<u32> {
    value.map(|v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
}

fn attachment(result: ExportImageResult) -> Response {
    let headers = [
        (header::CONTENT_TYPE, result.format.mime_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", result.file_name),
        ),
    ];
    (headers, result.image_data.into_bytes()).into_response()
}

pub async fn export_png(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExportPngRequest>,
) -> ApiResult<Response> {
    let options = request.options.unwrap_or_default();
    let command = ExportPngCommand {
        mermaid_code: request.mermaid_code,
        width: dimension(options.width),
        height: dimension(options.height),
        scale: options.scale,
        background_color: options.background_color,
        file_name: options.file_name,
    };

    state
        .export_png
        .execute(command)
        .await
        .map(attachment)
        .map_err(ApiError::export)
}

pub async fn export_svg(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExportSvgRequest>,
) -> ApiResult<Response> {
    state
        .export_svg
        .execute(&request.mermaid_code, request.file_name)
        .await
        .map(attachment)
        .map_err(ApiError::export)
}
