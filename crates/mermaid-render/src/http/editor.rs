//! `/api/v1/editor/sessions` routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use mermaid_render_core::{
    application::SessionRender,
    domain::{AggregateId, CursorPosition, EditorSession},
    Error,
};
use serde::{Deserialize, Serialize};

use super::{
    rendering::{parse_id, RenderView},
    response::{ok, ApiError, ApiJson, ApiResult, Envelope, ErrorBody},
};
use crate::app::AppState;

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct CursorBody {
    pub line: i64,
    pub column: i64,
}

impl TryFrom<CursorBody> for CursorPosition {
    type Error = Error;

    fn try_from(body: CursorBody) -> Result<Self, Self::Error> {
        Self::create(body.line, body.column).map_err(Error::from)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCodeRequest {
    pub code: String,
    #[serde(default)]
    pub cursor: CursorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: AggregateId,
    pub current_code: String,
    pub cursor: CursorBody,
    pub can_undo: bool,
    pub can_redo: bool,
    pub is_render_pending: bool,
    pub last_render_requested_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&EditorSession> for SessionView {
    fn from(session: &EditorSession) -> Self {
        let cursor = session.cursor_position();
        Self {
            session_id: session.id(),
            current_code: session.current_code().to_string(),
            cursor: CursorBody {
                line: i64::from(cursor.line()),
                column: i64::from(cursor.column()),
            },
            can_undo: session.can_undo(),
            can_redo: session.can_redo(),
            is_render_pending: session.is_render_pending(),
            last_render_requested_at: session.last_render_requested_at(),
            created_at: session.created_at(),
        }
    }
}

/// Session state after a preview request plus the preview outcome, if any.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRenderView {
    pub session: SessionView,
    pub rendered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
}

impl From<SessionRender> for SessionRenderView {
    fn from(outcome: SessionRender) -> Self {
        let session = SessionView::from(&outcome.session);
        match outcome.render {
            None => Self {
                session,
                rendered: false,
                render: None,
                error: None,
            },
            Some(Ok(result)) => Self {
                session,
                rendered: true,
                render: Some(RenderView::from(result)),
                error: None,
            },
            Some(Err(err)) => Self {
                session,
                rendered: false,
                render: None,
                error: Some(ApiError::from(err).body),
            },
        }
    }
}

type SessionResponse = ApiResult<Json<Envelope<SessionView>>>;

fn view(session: &EditorSession) -> Json<Envelope<SessionView>> {
    ok(SessionView::from(session))
}

pub async fn start(
    State(state): State<AppState>,
) -> ApiResult<(StatusCode, Json<Envelope<SessionView>>)> {
    let session = state.editor.start().await?;
    Ok((StatusCode::CREATED, view(&session)))
}

pub async fn get_session(State(state): State<AppState>, Path(id): Path<String>) -> SessionResponse {
    let session = state.editor.find(&parse_id(&id)?).await?;
    Ok(view(&session))
}

pub async fn update_code(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<UpdateCodeRequest>,
) -> SessionResponse {
    let id = parse_id(&id)?;
    let cursor = CursorPosition::try_from(request.cursor)?;
    let session = state.editor.update_code(&id, &request.code, cursor).await?;
    Ok(view(&session))
}

pub async fn update_cursor(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(cursor): ApiJson<CursorBody>,
) -> SessionResponse {
    let id = parse_id(&id)?;
    let session = state
        .editor
        .update_cursor(&id, CursorPosition::try_from(cursor)?)
        .await?;
    Ok(view(&session))
}

pub async fn undo(State(state): State<AppState>, Path(id): Path<String>) -> SessionResponse {
    let session = state.editor.undo(&parse_id(&id)?).await?;
    Ok(view(&session))
}

pub async fn redo(State(state): State<AppState>, Path(id): Path<String>) -> SessionResponse {
    let session = state.editor.redo(&parse_id(&id)?).await?;
    Ok(view(&session))
}

pub async fn request_render(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<SessionRenderView>>> {
    let outcome = state.editor.request_render(&parse_id(&id)?).await?;
    Ok(ok(SessionRenderView::from(outcome)))
}
