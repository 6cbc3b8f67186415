//! Internal engine events (not exposed via SSE)
//!
//! Every timer task and the HTTP surface talk to the driver through one
//! channel of [`EngineEvent`]s, so events that fire in the same instant are
//! processed one at a time.

use kiosk_common::Playlist;
use uuid::Uuid;

/// Input to the engine driver loop
#[derive(Debug, Clone)]
pub enum EngineEvent {
    /// Scheduling tick
    Tick,

    /// Hold timer fired
    HoldExpired { generation: u64 },

    /// Renderer finished one playthrough
    ///
    /// `play_id` is the id the renderer received with the item, if it echoes it.
    MediaEnded { play_id: Option<Uuid> },

    /// Result of one refresh cycle
    Refreshed(RefreshOutcome),
}

/// What one refresh cycle produced
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    /// Paired and a playlist was fetched
    Playlist(Playlist),
    /// Status or playlist fetch failed; retried next cycle
    Failed(String),
    /// Status is no longer "paired"
    Unpaired(String),
}
