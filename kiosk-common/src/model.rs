//! Playlist data model
//!
//! Items are built once per accepted playlist payload and never mutated in
//! place; a content change replaces the whole [`Playlist`].

use serde::{Deserialize, Serialize};

use crate::record::PlaylistRecord;
use crate::schedule::ScheduleSpec;

/// Ordered playlist snapshot. Order is the server-provided order.
pub type Playlist = Vec<PlaylistItem>;

/// Media kind as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    /// Unsupported kind; rendered as a placeholder but still timed
    Other(String),
}

impl MediaKind {
    /// Parse the backend's kind string (case-insensitive)
    pub fn from_wire(kind: &str) -> Self {
        match kind.trim().to_ascii_lowercase().as_str() {
            "image" => MediaKind::Image,
            "video" => MediaKind::Video,
            other => MediaKind::Other(other.to_string()),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, MediaKind::Other(_))
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
            MediaKind::Other(kind) => write!(f, "other({})", kind),
        }
    }
}

/// Screen orientation requested by an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Landscape,
    Portrait,
    #[default]
    Auto,
}

impl Orientation {
    /// Anything other than `landscape` or `portrait` means auto
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "landscape" => Orientation::Landscape,
            Some(v) if v == "portrait" => Orientation::Portrait,
            _ => Orientation::Auto,
        }
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
            Orientation::Auto => write!(f, "auto"),
        }
    }
}

/// Reference to the media file an item displays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
    pub name: String,
    /// Storage path or URL handed to the renderer
    pub path: String,
    pub kind: MediaKind,
}

/// One entry of the playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistItem {
    pub id: String,
    /// Explicit hold time in seconds; `None` means "auto"
    pub duration: Option<f64>,
    pub orientation: Orientation,
    pub schedule: ScheduleSpec,
    pub media: MediaRef,
}

impl PlaylistItem {
    /// Build an item from its wire record, classifying the schedule fields
    pub fn from_record(record: &PlaylistRecord) -> Self {
        let media_id = record
            .media_id
            .clone()
            .unwrap_or_else(|| record.id.clone());

        Self {
            id: record.id.clone(),
            duration: record.duration.filter(|secs| secs.is_finite() && *secs > 0.0),
            orientation: Orientation::from_wire(record.orientation.as_deref()),
            schedule: ScheduleSpec::from_record(record),
            media: MediaRef {
                id: media_id,
                name: record.name.clone().unwrap_or_default(),
                path: record.media_path.clone(),
                kind: MediaKind::from_wire(&record.media_kind),
            },
        }
    }

    /// Default items carry no schedule constraints at all
    pub fn is_default(&self) -> bool {
        matches!(self.schedule, ScheduleSpec::None)
    }
}
