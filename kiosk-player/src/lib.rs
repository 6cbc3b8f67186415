//! Kiosk Player
//!
//! Scheduled signage playback for a single paired screen: polls the content
//! backend for its playlist, picks the eligible items by schedule and cycles
//! through them, and exposes the resulting state over HTTP/SSE for the
//! renderer.

pub mod api;
pub mod config;
pub mod error;
pub mod host;
pub mod playback;
pub mod source;
pub mod state;

pub use error::{Error, Result};
pub use state::SharedState;
