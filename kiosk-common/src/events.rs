//! Event types broadcast by the player
//!
//! Events are published on a `tokio::sync::broadcast` bus and serialized for
//! SSE transmission to the renderer and the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Orientation, PlaylistItem};

/// Orientation directive issued to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "orientation", rename_all = "lowercase")]
pub enum OrientationDirective {
    Lock(Orientation),
    Unlock,
}

impl std::fmt::Display for OrientationDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrientationDirective::Lock(o) => write!(f, "lock({})", o),
            OrientationDirective::Unlock => write!(f, "unlock"),
        }
    }
}

/// Player event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum KioskEvent {
    /// Renderer should start displaying this item
    ItemStarted {
        /// Unique per playback start; echo it back with the media-end signal
        play_id: Uuid,
        item: PlaylistItem,
        /// Hold time in milliseconds, 0 when waiting for media end
        hold_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// Nothing is eligible to play
    DisplayCleared { timestamp: DateTime<Utc> },

    /// Orientation lock changed
    OrientationChanged {
        directive: OrientationDirective,
        timestamp: DateTime<Utc>,
    },

    /// Active queue identity changed
    ModeSwitched {
        /// Item identifiers of the new active queue, in order
        queue: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// A changed playlist payload was accepted
    PlaylistUpdated {
        item_count: usize,
        malformed_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// Refresh failed; last known content keeps playing
    RefreshFailed {
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Screen is no longer paired; control returns to pairing
    ExitRequested { timestamp: DateTime<Utc> },
}

impl KioskEvent {
    /// Event name used as the SSE `event:` field
    pub fn event_type(&self) -> &'static str {
        match self {
            KioskEvent::ItemStarted { .. } => "ItemStarted",
            KioskEvent::DisplayCleared { .. } => "DisplayCleared",
            KioskEvent::OrientationChanged { .. } => "OrientationChanged",
            KioskEvent::ModeSwitched { .. } => "ModeSwitched",
            KioskEvent::PlaylistUpdated { .. } => "PlaylistUpdated",
            KioskEvent::RefreshFailed { .. } => "RefreshFailed",
            KioskEvent::ExitRequested { .. } => "ExitRequested",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = KioskEvent::ModeSwitched {
            queue: vec!["a".to_string(), "b".to_string()],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "ModeSwitched");
        assert_eq!(json["queue"][1], "b");
        assert_eq!(event.event_type(), "ModeSwitched");
    }

    #[test]
    fn test_orientation_directive_serialization() {
        let lock = serde_json::to_value(OrientationDirective::Lock(Orientation::Portrait)).unwrap();
        let unlock = serde_json::to_value(OrientationDirective::Unlock).unwrap();

        assert_eq!(lock["mode"], "lock");
        assert_eq!(lock["orientation"], "portrait");
        assert_eq!(unlock["mode"], "unlock");
    }
}
