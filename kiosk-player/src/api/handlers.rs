//! HTTP request handlers

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use kiosk_common::events::OrientationDirective;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::api::server::AppContext;
use crate::state::{ActiveItem, PlaybackStatus, PlaylistSummary};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
    git_hash: String,
    git_dirty: bool,
    build_timestamp: String,
    build_profile: String,
    screen_id: String,
    port: u16,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct PlaybackStateResponse {
    #[serde(flatten)]
    status: PlaybackStatus,
    /// Set while last-known content keeps playing after a failed refresh
    refresh_error: Option<String>,
    orientation: OrientationDirective,
    exit_requested: bool,
    mode_switches: u64,
    advances: u64,
}

#[derive(Debug, Serialize)]
pub struct PlaylistResponse {
    item_count: usize,
    malformed_count: usize,
    queue: Vec<String>,
    last_refresh: Option<DateTime<Utc>>,
}

impl From<PlaylistSummary> for PlaylistResponse {
    fn from(summary: PlaylistSummary) -> Self {
        Self {
            item_count: summary.item_count,
            malformed_count: summary.malformed_count,
            queue: summary.queue,
            last_refresh: summary.last_refresh,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MediaEndRequest {
    play_id: Option<Uuid>,
}

// ============================================================================
// Health
// ============================================================================

/// GET /health - Health check with build identification
pub async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "kiosk-player".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        git_hash: env!("GIT_HASH").to_string(),
        git_dirty: env!("GIT_DIRTY") == "true",
        build_timestamp: env!("BUILD_TIMESTAMP").to_string(),
        build_profile: env!("BUILD_PROFILE").to_string(),
        screen_id: ctx.screen_id,
        port: ctx.port,
    })
}

// ============================================================================
// Playback
// ============================================================================

/// GET /playback/state - Playback state, refresh indicator and counters
pub async fn get_playback_state(State(ctx): State<AppContext>) -> Json<PlaybackStateResponse> {
    let summary = ctx.state.get_summary().await;

    Json(PlaybackStateResponse {
        status: ctx.state.get_playback_state().await,
        refresh_error: ctx.state.refresh_error().await,
        orientation: ctx.state.get_orientation().await,
        exit_requested: ctx.state.exit_requested(),
        mode_switches: summary.mode_switches,
        advances: summary.advances,
    })
}

/// GET /playback/active - Active item and its play id, `null` when idle
pub async fn get_active_item(State(ctx): State<AppContext>) -> Json<Option<ActiveItem>> {
    Json(ctx.state.get_active_item().await)
}

/// POST /playback/media-end - Renderer reports the current video finished
///
/// Body is optional: `{"play_id": "<uuid>"}`. Signals carrying a play id
/// from an earlier playback start are discarded by the scheduler.
pub async fn media_end(
    State(ctx): State<AppContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<StatusResponse>), (StatusCode, Json<StatusResponse>)> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        MediaEndRequest::default()
    } else {
        serde_json::from_slice::<MediaEndRequest>(&body).map_err(|e| {
            warn!("Rejected media-end body: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(StatusResponse {
                    status: format!("error: invalid body: {}", e),
                }),
            )
        })?
    };

    debug!("Media end reported (play_id {:?})", request.play_id);
    match ctx.engine.media_ended(request.play_id) {
        Ok(()) => Ok((
            StatusCode::ACCEPTED,
            Json(StatusResponse {
                status: "accepted".to_string(),
            }),
        )),
        Err(e) => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(StatusResponse {
                status: format!("error: {}", e),
            }),
        )),
    }
}

// ============================================================================
// Playlist
// ============================================================================

/// GET /playlist - Playlist summary and active queue identity
pub async fn get_playlist(State(ctx): State<AppContext>) -> Json<PlaylistResponse> {
    Json(ctx.state.get_summary().await.into())
}
