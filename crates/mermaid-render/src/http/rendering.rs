//! `/api/v1/rendering` routes.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use mermaid_render_core::{
    application::RenderDiagramResult,
    domain::{AggregateId, Diagram, DiagramType, RenderStatus},
    Error,
};
use serde::{Deserialize, Serialize};

use super::response::{ok, ApiJson, ApiResult, Envelope};
use crate::app::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    pub mermaid_code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub diagram_id: AggregateId,
    pub rendered_svg: String,
    pub diagram_type: DiagramType,
    pub created_at: DateTime<Utc>,
}

impl From<RenderDiagramResult> for RenderView {
    fn from(result: RenderDiagramResult) -> Self {
        Self {
            diagram_id: result.diagram_id,
            rendered_svg: result.svg,
            diagram_type: result.diagram_type,
            created_at: result.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderErrorView {
    pub message: String,
    pub line: Option<u32>,
    pub column: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagramView {
    pub diagram_id: AggregateId,
    pub mermaid_code: String,
    pub diagram_type: DiagramType,
    pub rendered_svg: Option<String>,
    pub render_status: RenderStatus,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<RenderErrorView>,
}

impl From<&Diagram> for DiagramView {
    fn from(diagram: &Diagram) -> Self {
        Self {
            diagram_id: diagram.id(),
            mermaid_code: diagram.mermaid_code().raw_code().to_string(),
            diagram_type: diagram.diagram_type(),
            rendered_svg: diagram.rendered_svg().map(str::to_string),
            render_status: diagram.render_status(),
            created_at: diagram.created_at(),
            error: diagram.error().map(|e| RenderErrorView {
                message: e.message().to_string(),
                line: e.line(),
                column: e.column(),
            }),
        }
    }
}

/// Parse a path identifier; malformed ids are a 400.
pub(super) fn parse_id(raw: &str) -> Result<AggregateId, Error> {
    AggregateId::parse(raw).map_err(Error::from)
}

pub async fn render(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RenderRequest>,
) -> ApiResult<Json<Envelope<RenderView>>> {
    let result = state.render.execute(&request.mermaid_code).await?;
    Ok(ok(RenderView::from(result)))
}

pub async fn get_diagram(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<DiagramView>>> {
    let id = parse_id(&id)?;
    let diagram = state.render.find(&id).await?;
    Ok(ok(DiagramView::from(&diagram)))
}
