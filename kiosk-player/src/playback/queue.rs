//! Active queue construction
//!
//! Partitions the playlist into scheduled-now and default items. Scheduled
//! items win whenever at least one is eligible. Items with a malformed
//! schedule fall in neither partition.

use chrono::{DateTime, FixedOffset};
use kiosk_common::PlaylistItem;

use super::eligibility::is_eligible;

/// Ordered item identifiers; the only thing compared to detect a mode switch
pub type QueueIdentity = Vec<String>;

/// Build the active queue for `now`, preserving playlist order
pub fn build_queue(playlist: &[PlaylistItem], now: &DateTime<FixedOffset>) -> Vec<PlaylistItem> {
    let scheduled_now: Vec<PlaylistItem> = playlist
        .iter()
        .filter(|item| is_eligible(item, now))
        .cloned()
        .collect();

    if !scheduled_now.is_empty() {
        return scheduled_now;
    }

    playlist
        .iter()
        .filter(|item| item.is_default())
        .cloned()
        .collect()
}

/// Identity of a queue: its item ids in order
pub fn queue_identity(queue: &[PlaylistItem]) -> QueueIdentity {
    queue.iter().map(|item| item.id.clone()).collect()
}

/// Result of one rebuild
#[derive(Debug, Clone)]
pub struct QueueUpdate {
    pub queue: Vec<PlaylistItem>,
    /// Identity differs from the previous rebuild
    pub mode_switch: bool,
}

/// Rebuilds the queue each tick and tracks identity across rebuilds
#[derive(Debug, Default)]
pub struct QueueBuilder {
    identity: QueueIdentity,
}

impl QueueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity of the last built queue
    pub fn identity(&self) -> &[String] {
        &self.identity
    }

    pub fn rebuild(&mut self, playlist: &[PlaylistItem], now: &DateTime<FixedOffset>) -> QueueUpdate {
        let queue = build_queue(playlist, now);
        let identity = queue_identity(&queue);
        let mode_switch = identity != self.identity;
        if mode_switch {
            self.identity = identity;
        }
        QueueUpdate { queue, mode_switch }
    }
}
