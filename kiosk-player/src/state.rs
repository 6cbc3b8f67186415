//! Shared player state
//!
//! Read by the HTTP surface, written only by the engine driver task.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use kiosk_common::events::{KioskEvent, OrientationDirective};
use kiosk_common::PlaylistItem;
use serde::Serialize;
use tokio::sync::{broadcast, Notify, RwLock};
use uuid::Uuid;

/// Top-level playback state driving the UI branch
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// No playlist fetched yet
    Loading,
    /// Fetch failed and there is no content to fall back on
    Error { message: String },
    /// Content loaded but nothing eligible right now
    Waiting,
    Playing { item: PlaylistItem },
}

impl std::fmt::Display for PlaybackStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackStatus::Loading => write!(f, "loading"),
            PlaybackStatus::Error { message } => write!(f, "error: {}", message),
            PlaybackStatus::Waiting => write!(f, "waiting"),
            PlaybackStatus::Playing { item } => write!(f, "playing {}", item.id),
        }
    }
}

/// Current render target
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveItem {
    pub play_id: Uuid,
    pub item: PlaylistItem,
}

/// Playlist and scheduling summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaylistSummary {
    pub item_count: usize,
    pub malformed_count: usize,
    /// Identity of the active queue
    pub queue: Vec<String>,
    pub last_refresh: Option<DateTime<Utc>>,
    pub mode_switches: u64,
    pub advances: u64,
}

/// Shared state accessible by the engine and the HTTP handlers
pub struct SharedState {
    playback: RwLock<PlaybackStatus>,
    active: RwLock<Option<ActiveItem>>,
    refresh_error: RwLock<Option<String>>,
    orientation: RwLock<OrientationDirective>,
    summary: RwLock<PlaylistSummary>,

    /// Event broadcaster for SSE events
    event_tx: broadcast::Sender<KioskEvent>,

    exit_requested: AtomicBool,
    exit_notify: Notify,
}

impl SharedState {
    /// Create new shared state in the `Loading` state
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100); // Buffer up to 100 events
        Self {
            playback: RwLock::new(PlaybackStatus::Loading),
            active: RwLock::new(None),
            refresh_error: RwLock::new(None),
            orientation: RwLock::new(OrientationDirective::Unlock),
            summary: RwLock::new(PlaylistSummary::default()),
            event_tx,
            exit_requested: AtomicBool::new(false),
            exit_notify: Notify::new(),
        }
    }

    /// Broadcast an event to all SSE listeners
    pub fn broadcast_event(&self, event: KioskEvent) {
        // Ignore send errors (no receivers is OK)
        let _ = self.event_tx.send(event);
    }

    /// Subscribe to event stream for SSE
    pub fn subscribe_events(&self) -> broadcast::Receiver<KioskEvent> {
        self.event_tx.subscribe()
    }

    pub async fn get_playback_state(&self) -> PlaybackStatus {
        self.playback.read().await.clone()
    }

    pub async fn set_playback_state(&self, status: PlaybackStatus) {
        *self.playback.write().await = status;
    }

    pub async fn get_active_item(&self) -> Option<ActiveItem> {
        self.active.read().await.clone()
    }

    pub async fn set_active_item(&self, active: Option<ActiveItem>) {
        *self.active.write().await = active;
    }

    /// Non-blocking "retrying" indicator while last-known content plays
    pub async fn refresh_error(&self) -> Option<String> {
        self.refresh_error.read().await.clone()
    }

    pub async fn set_refresh_error(&self, error: Option<String>) {
        *self.refresh_error.write().await = error;
    }

    pub async fn get_orientation(&self) -> OrientationDirective {
        *self.orientation.read().await
    }

    pub async fn set_orientation(&self, directive: OrientationDirective) {
        *self.orientation.write().await = directive;
    }

    pub async fn get_summary(&self) -> PlaylistSummary {
        self.summary.read().await.clone()
    }

    pub async fn set_summary(&self, summary: PlaylistSummary) {
        *self.summary.write().await = summary;
    }

    /// Record a successful playlist fetch
    pub async fn mark_refreshed(&self, at: DateTime<Utc>) {
        self.summary.write().await.last_refresh = Some(at);
    }

    /// Signal that the screen is no longer paired
    pub fn request_exit(&self) {
        self.exit_requested.store(true, Ordering::SeqCst);
        self.exit_notify.notify_waiters();
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested.load(Ordering::SeqCst)
    }

    /// Resolve once [`SharedState::request_exit`] has been called
    pub async fn wait_for_exit(&self) {
        let notified = self.exit_notify.notified();
        if self.exit_requested() {
            return;
        }
        notified.await;
    }
}

impl Default for SharedState {
    fn default() -> Self {
        Self::new()
    }
}
