//! HTTP invoke mode
//!
//! Exposes the pipeline over HTTP so that a queue poller, a function runtime
//! or a test harness can post invocation events to it.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::cli::runner::outcome_json;
use crate::envelope::ObjectRef;
use crate::error::{Error, Result};
use crate::pipeline::IngestPipeline;

/// App state shared across handlers
#[derive(Clone)]
struct AppState {
    pipeline: IngestPipeline,
}

/// Build the HTTP router
pub fn router(pipeline: IngestPipeline) -> Router {
    let state = AppState { pipeline };

    Router::new()
        .route("/health", get(health))
        .route("/invoke", post(invoke))
        .route("/objects", post(ingest_object))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(pipeline: IngestPipeline, port: u16) -> Result<()> {
    let app = router(pipeline);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Process an invocation event
///
/// Always answers HTTP 200; the body carries the invocation status code.
async fn invoke(State(state): State<Arc<AppState>>, Json(event): Json<Value>) -> impl IntoResponse {
    let response = state.pipeline.handle_event(&event).await;
    (StatusCode::OK, Json(response))
}

/// Ingest a single object
async fn ingest_object(
    State(state): State<Arc<AppState>>,
    Json(object): Json<ObjectRef>,
) -> impl IntoResponse {
    let outcome = state.pipeline.ingest_object(&object).await;
    let status = if outcome.is_success() {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, Json(outcome_json(&outcome)))
}
