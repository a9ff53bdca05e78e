//! JSON envelopes and error-to-status mapping.
//!
//! Success: `{"success": true, "data": ...}`.
//! Failure: `{"success": false, "error": {"code": ..., "message": ...}}`.

use axum::{
    extract::{rejection::JsonRejection, FromRequest},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mermaid_render_core::Error;
use serde::Serialize;
use tracing::error;

pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
pub const EXPORT_FAILED: &str = "EXPORT_FAILED";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

/// Wrap `data` in a success envelope.
pub fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: ErrorBody,
}

/// A failed request: status plus error body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    /// Export routes: render failures are 422, bad input 400, anything else
    /// is reported as an export failure.
    pub fn export(err: Error) -> Self {
        if err.is_render_failure() || err.is_validation() {
            return Self::from(err);
        }
        error!(error = %err, "Export failed");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, EXPORT_FAILED, err.to_string())
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = if err.is_validation() {
            StatusCode::BAD_REQUEST
        } else {
            match &err {
                Error::Render(_) => StatusCode::UNPROCESSABLE_ENTITY,
                Error::NotFound { .. } => StatusCode::NOT_FOUND,
                Error::EditorSession(_) => StatusCode::CONFLICT,
                Error::Conversion(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => {
                    error!(error = %err, code = err.code(), "Unhandled request error");
                    return Self::new(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        INTERNAL_SERVER_ERROR,
                        err.to_string(),
                    );
                }
            }
        };
        Self::new(status, err.code(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, VALIDATION_ERROR, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let envelope = ErrorEnvelope {
            success: false,
            error: self.body,
        };
        (self.status, Json(envelope)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
