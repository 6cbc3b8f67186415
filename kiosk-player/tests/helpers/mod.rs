//! Test helpers for kiosk-player integration tests
//!
//! - Record builders for default, recurring and one-time items
//! - `MockSource`: scriptable backend implementing `PlaylistSource`
//! - `RecordingHost`: `DisplayHost` that records every instruction

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone};
use kiosk_common::record::{DaysField, PlaylistRecord};
use kiosk_common::{Orientation, PlaylistItem};
use kiosk_player::host::DisplayHost;
use kiosk_player::source::{PairingStatus, PlaylistSource};
use kiosk_player::{Error, Result};
use uuid::Uuid;

// ============================================================================
// Records
// ============================================================================

/// Unscheduled (default) record
pub fn record(id: &str, kind: &str, duration: Option<f64>) -> PlaylistRecord {
    PlaylistRecord {
        id: id.to_string(),
        name: Some(format!("Item {}", id)),
        duration,
        orientation: None,
        media_id: Some(format!("media-{}", id)),
        media_path: format!("/media/{}.bin", id),
        media_kind: kind.to_string(),
        start_at: None,
        end_at: None,
        start_date: None,
        end_date: None,
        daily_start: None,
        daily_end: None,
        days: None,
    }
}

pub fn image(id: &str, duration: Option<f64>) -> PlaylistRecord {
    record(id, "image", duration)
}

pub fn video(id: &str, duration: Option<f64>) -> PlaylistRecord {
    record(id, "video", duration)
}

/// Recurring window across the whole of 2024
pub fn recurring(mut record: PlaylistRecord, days: &[&str], daily_start: &str, daily_end: &str) -> PlaylistRecord {
    record.start_date = Some("2024-01-01".to_string());
    record.end_date = Some("2024-12-31".to_string());
    record.daily_start = Some(daily_start.to_string());
    record.daily_end = Some(daily_end.to_string());
    record.days = Some(DaysField::List(days.iter().map(|d| d.to_string()).collect()));
    record
}

pub fn one_time(mut record: PlaylistRecord, start_at: &str, end_at: &str) -> PlaylistRecord {
    record.start_at = Some(start_at.to_string());
    record.end_at = Some(end_at.to_string());
    record
}

pub fn items(records: &[PlaylistRecord]) -> Vec<PlaylistItem> {
    records.iter().map(PlaylistItem::from_record).collect()
}

/// Local wall-clock time at UTC+02:00
pub fn local(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(2 * 3600)
        .unwrap()
        .with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// 2024-01-10 is a Wednesday
pub fn wednesday(hour: u32, minute: u32) -> DateTime<FixedOffset> {
    local(2024, 1, 10, hour, minute, 0)
}

// ============================================================================
// MockSource
// ============================================================================

/// What the mock backend answers on every refresh cycle
#[derive(Debug, Clone)]
pub enum Scripted {
    Playlist(Vec<PlaylistRecord>),
    TransportError(String),
    Status(String),
}

pub struct MockSource {
    response: Mutex<Scripted>,
    status_calls: AtomicUsize,
    playlist_calls: AtomicUsize,
}

impl MockSource {
    pub fn new(response: Scripted) -> Self {
        Self {
            response: Mutex::new(response),
            status_calls: AtomicUsize::new(0),
            playlist_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_playlist(records: Vec<PlaylistRecord>) -> Self {
        Self::new(Scripted::Playlist(records))
    }

    pub fn set(&self, response: Scripted) {
        *self.response.lock().unwrap() = response;
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn playlist_calls(&self) -> usize {
        self.playlist_calls.load(Ordering::SeqCst)
    }

    fn current(&self) -> Scripted {
        self.response.lock().unwrap().clone()
    }
}

#[async_trait]
impl PlaylistSource for MockSource {
    async fn fetch_status(&self, _screen_id: &str) -> Result<PairingStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        match self.current() {
            Scripted::Status(status) => Ok(PairingStatus::from_wire(&status)),
            Scripted::TransportError(message) => Err(Error::Transport(message)),
            Scripted::Playlist(_) => Ok(PairingStatus::Paired),
        }
    }

    async fn fetch_playlist(&self, _screen_id: &str) -> Result<Vec<PlaylistRecord>> {
        self.playlist_calls.fetch_add(1, Ordering::SeqCst);
        match self.current() {
            Scripted::Playlist(records) => Ok(records),
            Scripted::TransportError(message) => Err(Error::Transport(message)),
            Scripted::Status(_) => Ok(Vec::new()),
        }
    }
}

// ============================================================================
// RecordingHost
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    Show { item_id: String, play_id: Uuid, hold_ms: u64 },
    Clear,
    Lock(Orientation),
    Unlock,
}

#[derive(Default)]
pub struct RecordingHost {
    calls: Mutex<Vec<HostCall>>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Ids of shown items, in order
    pub fn shown(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::Show { item_id, .. } => Some(item_id),
                _ => None,
            })
            .collect()
    }

    pub fn last_play_id(&self) -> Option<Uuid> {
        self.calls().into_iter().rev().find_map(|call| match call {
            HostCall::Show { play_id, .. } => Some(play_id),
            _ => None,
        })
    }

    fn push(&self, call: HostCall) {
        self.calls.lock().unwrap().push(call);
    }
}

impl DisplayHost for RecordingHost {
    fn show(&self, item: &PlaylistItem, play_id: Uuid, hold_ms: u64) {
        self.push(HostCall::Show {
            item_id: item.id.clone(),
            play_id,
            hold_ms,
        });
    }

    fn clear(&self) {
        self.push(HostCall::Clear);
    }

    fn lock_orientation(&self, orientation: Orientation) {
        self.push(HostCall::Lock(orientation));
    }

    fn unlock_orientation(&self) {
        self.push(HostCall::Unlock);
    }
}
