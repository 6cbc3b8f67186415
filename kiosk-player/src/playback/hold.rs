//! Hold time computation
//!
//! - explicit duration: `duration * 1000`, at least 1 ms, images and video
//!   alike (the renderer loops video until the timer fires)
//! - no duration, video: 0, wait for the renderer's media-end signal
//! - no duration, anything else: the configured image fallback. Unsupported
//!   kinds are timed like images since their placeholder never ends.

use std::time::Duration;

use kiosk_common::time::millis_to_duration;
use kiosk_common::{MediaKind, PlaylistItem};

/// Image fallback when no duration is given
pub const DEFAULT_IMAGE_HOLD_MS: u64 = 3000;

/// Hold time in milliseconds; 0 means "no timer"
pub fn compute_hold_time(item: &PlaylistItem) -> u64 {
    compute_hold_time_with(item, DEFAULT_IMAGE_HOLD_MS)
}

/// Same as [`compute_hold_time`] with a configurable image fallback
pub fn compute_hold_time_with(item: &PlaylistItem, image_fallback_ms: u64) -> u64 {
    match (item.duration, &item.media.kind) {
        (Some(secs), _) => ((secs * 1000.0).round() as u64).max(1),
        (None, MediaKind::Video) => 0,
        (None, _) => image_fallback_ms,
    }
}

/// Hold time as a timer delay, `None` when waiting for media end
pub fn hold_delay(item: &PlaylistItem, image_fallback_ms: u64) -> Option<Duration> {
    match compute_hold_time_with(item, image_fallback_ms) {
        0 => None,
        ms => Some(millis_to_duration(ms)),
    }
}
