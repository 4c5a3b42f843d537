//! HTTP transport for SevaHealth.
//!
//! Exposes the streaming chat endpoint the web frontend talks to, plus a
//! health probe:
//!
//! - `POST /chat`   — `{thread_id, user_query}`, answers as an SSE stream
//!   of turn events
//! - `GET  /health` — liveness probe
//!
//! Built on Axum. Each chat request hands its thread's state to the turn
//! runner and forwards the event channel as `data:` frames; the stream
//! closes when the turn reaches a terminal state.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::response::sse::{Event as SseEvent, Sse};
use axum::{Router, extract::State, response::Json, routing::get, routing::post};
use serde::{Deserialize, Serialize};
use tokio_stream::StreamExt;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use sevahealth_agent::{SessionStore, TurnOptions, TurnRunner, primer};
use sevahealth_config::AppConfig;
use sevahealth_core::event::TurnEvent;
use sevahealth_index::DocumentIndex;
use sevahealth_tools::HospitalDirectory;

/// Shared application state, built once at startup.
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub runner: Arc<TurnRunner>,
}

pub type SharedState = Arc<AppState>;

/// Build the Axum router with all gateway routes.
pub fn build_router(state: SharedState) -> Router {
    // The frontend may be served from anywhere; the API carries no
    // credentials, so any origin is acceptable.
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the gateway HTTP server.
///
/// Builds the provider, datasets, index, tool registry, and session store
/// once, then serves until the process is stopped. Any construction
/// failure aborts startup; nothing is retried lazily per request.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let provider = sevahealth_providers::build_from_config(&config)?;

    let directory = Arc::new(HospitalDirectory::load(
        &config.data.hospitals_path,
        &config.data.pincodes_path,
    )?);

    let index = match &config.data.index_path {
        Some(path) if Path::new(path).exists() => DocumentIndex::load_from(Path::new(path))?,
        Some(path) => {
            warn!(path = %path, "Document index not found, document search will return nothing");
            DocumentIndex::new(&config.model.embed_model)
        }
        None => DocumentIndex::new(&config.model.embed_model),
    };

    let registry = Arc::new(sevahealth_tools::build_registry(
        directory,
        Arc::new(index),
        Arc::clone(&provider),
    ));

    let primer = primer::load(&config.agent)?;
    let sessions = Arc::new(SessionStore::new(primer, config.server.session_capacity));
    let runner = Arc::new(TurnRunner::new(
        provider,
        registry,
        TurnOptions::from_config(&config),
    ));

    let state = Arc::new(AppState { sessions, runner });
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Deserialize)]
struct ChatRequest {
    thread_id: String,
    user_query: String,
}

/// Wire envelope around each turn event, one per SSE frame.
#[derive(Serialize)]
struct ChatStreamFrame {
    message: TurnEvent,
}

/// `POST /chat` — run one turn, streaming events as they happen.
///
/// The turn runs in its own task holding the thread's lock; dropping the
/// response stream cancels it cooperatively. Fatal turn errors arrive as
/// the terminal `error` event rather than an HTTP error, since the stream
/// is already open by then.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Sse<impl futures::Stream<Item = Result<SseEvent, Infallible>>> {
    info!(thread_id = %payload.thread_id, "Chat request received");

    let entry = state.sessions.get_or_create(&payload.thread_id).await;
    let rx = state.runner.run_stream(entry, payload.user_query);

    let stream = ReceiverStream::new(rx).map(|event| {
        let data = serde_json::to_string(&ChatStreamFrame { message: event }).unwrap_or_default();
        Ok(SseEvent::default().data(data))
    });

    Sse::new(stream)
}
