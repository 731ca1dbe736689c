//! HTTP surface
//!
//! A thin axum wrapper around [`GenerationOrchestrator`]; all fallback
//! behaviour lives in the orchestrator.

pub mod handlers;

use crate::error::Result;
use crate::llm::GenerationOrchestrator;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::future::Future;
use tokio::net::TcpListener;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: GenerationOrchestrator,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(orchestrator: GenerationOrchestrator) -> Self {
        Self {
            orchestrator,
            started_at: Utc::now(),
        }
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/text-generation", post(handlers::text_generation))
        .route("/api/openai", post(handlers::openai_compat))
        .route("/api/health", get(handlers::health))
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<S>(listener: TcpListener, state: AppState, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "Server listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
