//! Display host seam
//!
//! The renderer and the orientation lock live outside the core. The engine
//! fires instructions at a [`DisplayHost`] and never waits for a result.

use std::sync::Arc;

use chrono::Utc;
use kiosk_common::events::{KioskEvent, OrientationDirective};
use kiosk_common::{Orientation, PlaylistItem};
use tracing::{debug, info};
use uuid::Uuid;

use crate::state::SharedState;

/// Fire-and-forget instructions to the renderer and host OS
pub trait DisplayHost: Send + Sync {
    /// Start rendering `item`; `play_id` tags this playback start
    fn show(&self, item: &PlaylistItem, play_id: Uuid, hold_ms: u64);

    /// Nothing to render
    fn clear(&self);

    /// Repeating the same lock is harmless
    fn lock_orientation(&self, orientation: Orientation);

    fn unlock_orientation(&self);
}

/// Publishes host instructions on the shared event bus for SSE consumers
pub struct BroadcastHost {
    state: Arc<SharedState>,
}

impl BroadcastHost {
    pub fn new(state: Arc<SharedState>) -> Self {
        Self { state }
    }

    fn orientation_changed(&self, directive: OrientationDirective) {
        debug!("Orientation: {}", directive);
        self.state.broadcast_event(KioskEvent::OrientationChanged {
            directive,
            timestamp: Utc::now(),
        });
    }
}

impl DisplayHost for BroadcastHost {
    fn show(&self, item: &PlaylistItem, play_id: Uuid, hold_ms: u64) {
        if item.media.kind.is_supported() {
            info!("Showing '{}' ({}, hold {} ms)", item.id, item.media.kind, hold_ms);
        } else {
            info!(
                "Showing placeholder for '{}': unsupported media {} (hold {} ms)",
                item.id, item.media.kind, hold_ms
            );
        }
        self.state.broadcast_event(KioskEvent::ItemStarted {
            play_id,
            item: item.clone(),
            hold_ms,
            timestamp: Utc::now(),
        });
    }

    fn clear(&self) {
        info!("Nothing eligible, clearing display");
        self.state.broadcast_event(KioskEvent::DisplayCleared { timestamp: Utc::now() });
    }

    fn lock_orientation(&self, orientation: Orientation) {
        self.orientation_changed(OrientationDirective::Lock(orientation));
    }

    fn unlock_orientation(&self) {
        self.orientation_changed(OrientationDirective::Unlock);
    }
}
