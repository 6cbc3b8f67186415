//! # Kiosk Common Library
//!
//! Shared code for the kiosk display player:
//! - Playlist data model (items, media references, schedules)
//! - Wire records and schedule classification at ingest
//! - Event types broadcast to the renderer and UI
//! - Configuration loading
//! - Clock abstraction

pub mod config;
pub mod error;
pub mod events;
pub mod model;
pub mod record;
pub mod schedule;
pub mod time;

pub use error::{Error, Result};
pub use model::{MediaKind, MediaRef, Orientation, Playlist, PlaylistItem};
pub use schedule::{RecurringWindow, ScheduleSpec};
