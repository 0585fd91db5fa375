//! Demo producer
//!
//! A stand-in for the agent backend: accepts `{"message": ...}` and streams a
//! scripted reasoning trace plus a character-by-character answer in the wire
//! protocol. Useful for exercising the client end-to-end.

mod script;

pub use crate::config::ProducerConfig;
pub use script::{script_for, ScriptedEvent, TOOL_NAME};

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

const SERVICE_NAME: &str = "agentwire-producer";

/// Body of `POST /agent/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Create the producer router
pub fn create_router(config: ProducerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/agent/chat", post(chat))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

async fn chat(
    State(config): State<Arc<ProducerConfig>>,
    Json(req): Json<ChatRequest>,
) -> Response {
    if req.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "No message provided" })),
        )
            .into_response();
    }

    let script = script_for(&req.message, &config);
    tracing::info!(events = script.len(), "Streaming scripted response");

    let (tx, rx) = mpsc::channel::<Result<String, Infallible>>(64);
    tokio::spawn(async move {
        for scripted in script {
            if !scripted.delay.is_zero() {
                tokio::time::sleep(scripted.delay).await;
            }
            let frame = match scripted.event.to_frame() {
                Ok(frame) => frame,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to encode event, skipping");
                    continue;
                }
            };
            // Blank line after every frame, as SSE does
            if tx.send(Ok(format!("{frame}\n\n"))).await.is_err() {
                tracing::debug!("Client went away mid-stream");
                return;
            }
        }
    });

    (
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(ReceiverStream::new(rx)),
    )
        .into_response()
}
