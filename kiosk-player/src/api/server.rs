//! HTTP server setup and routing
//!
//! Serves the renderer-facing control surface and the SSE event stream.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::error::{Error, Result};
use crate::playback::EngineHandle;
use crate::state::SharedState;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<SharedState>,
    pub engine: EngineHandle,
    pub screen_id: String,
    pub port: u16,
}

/// Build the router with all routes
pub fn build_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/health", get(super::handlers::health))
        .route("/playback/state", get(super::handlers::get_playback_state))
        .route("/playback/active", get(super::handlers::get_active_item))
        .route("/playback/media-end", post(super::handlers::media_end))
        .route("/playlist", get(super::handlers::get_playlist))
        .route("/events", get(super::sse::event_stream))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for the local renderer
        .layer(CorsLayer::permissive())
}

/// Bind the listener up front so a taken port fails startup
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Http(format!("Failed to bind to {}: {}", addr, e)))
}

/// Run HTTP API server until `shutdown` resolves
pub async fn run<F>(listener: TcpListener, ctx: AppContext, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(ctx);

    if let Ok(addr) = listener.local_addr() {
        info!("Starting HTTP server on {}", addr);
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| Error::Http(format!("Server error: {}", e)))?;

    info!("HTTP server stopped");
    Ok(())
}
