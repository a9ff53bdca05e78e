//! HTTP transport (axum).
//!
//! Thin handlers over the use cases in [`AppState`]. All JSON bodies are
//! camelCase; see [`response`] for the envelope and status mapping.

mod editor;
mod export;
mod rendering;
pub mod response;

use std::net::SocketAddr;

use axum::{
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::AppState;

/// Build the API router.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/rendering/render", post(rendering::render))
        .route("/rendering/diagram/:id", get(rendering::get_diagram))
        .route("/export/png", post(export::export_png))
        .route("/export/svg", post(export::export_svg))
        .route("/editor/sessions", post(editor::start))
        .route("/editor/sessions/:id", get(editor::get_session))
        .route("/editor/sessions/:id/code", put(editor::update_code))
        .route("/editor/sessions/:id/cursor", put(editor::update_cursor))
        .route("/editor/sessions/:id/undo", post(editor::undo))
        .route("/editor/sessions/:id/redo", post(editor::redo))
        .route("/editor/sessions/:id/render", post(editor::request_render));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn serve(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %listener.local_addr()?, "HTTP server listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl-C, shutting down");
            }
        })
        .await?;
    Ok(())
}
