//! Wire records as delivered by the content backend
//!
//! Records are parsed leniently: every schedule field is optional and kept as
//! raw text. Classification into a [`crate::ScheduleSpec`] happens at ingest.

use serde::{Deserialize, Serialize};

/// One playlist entry as sent by the backend (camelCase JSON keys)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Hold time in seconds (null, zero or negative means "auto")
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub media_id: Option<String>,
    pub media_path: String,
    pub media_kind: String,

    // One-time window (RFC 3339 instants)
    #[serde(default)]
    pub start_at: Option<String>,
    #[serde(default)]
    pub end_at: Option<String>,

    // Recurring window
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub daily_start: Option<String>,
    #[serde(default)]
    pub daily_end: Option<String>,
    #[serde(default)]
    pub days: Option<DaysField>,
}

impl PlaylistRecord {
    /// True when the record carries any schedule field at all
    pub fn has_schedule_fields(&self) -> bool {
        self.has_one_time_fields() || self.has_recurring_fields()
    }

    pub fn has_one_time_fields(&self) -> bool {
        present(&self.start_at) || present(&self.end_at)
    }

    pub fn has_recurring_fields(&self) -> bool {
        present(&self.start_date)
            || present(&self.end_date)
            || present(&self.daily_start)
            || present(&self.daily_end)
            || self.days.as_ref().is_some_and(|d| !d.codes().is_empty())
    }
}

/// Weekday list, accepted either as a JSON array or a comma-separated string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DaysField {
    List(Vec<String>),
    Csv(String),
}

impl DaysField {
    /// Non-empty, trimmed weekday codes
    pub fn codes(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            DaysField::List(list) => list.iter().map(String::as_str).collect(),
            DaysField::Csv(csv) => csv.split(',').collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Playlist response body: either a bare array or `{"items": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PlaylistPayload {
    Items(Vec<PlaylistRecord>),
    Wrapped { items: Vec<PlaylistRecord> },
}

impl PlaylistPayload {
    pub fn into_records(self) -> Vec<PlaylistRecord> {
        match self {
            PlaylistPayload::Items(items) => items,
            PlaylistPayload::Wrapped { items } => items,
        }
    }
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.trim().is_empty())
}
