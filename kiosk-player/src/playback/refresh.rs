//! Refresh driver
//!
//! Polls pairing status and the playlist on a fixed cadence in its own task,
//! so slow network I/O never delays a scheduling tick. Unchanged payloads are
//! discarded later by the scheduler's structural comparison.

use std::sync::Arc;
use std::time::Duration;

use kiosk_common::PlaylistItem;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::events::{EngineEvent, RefreshOutcome};
use crate::source::{PairingStatus, PlaylistSource};

/// One refresh cycle: status first, then the playlist if still paired
pub async fn refresh_once(source: &dyn PlaylistSource, screen_id: &str) -> RefreshOutcome {
    match source.fetch_status(screen_id).await {
        Ok(PairingStatus::Paired) => {}
        Ok(PairingStatus::Other(status)) => {
            info!("Screen {} reports status '{}'", screen_id, status);
            return RefreshOutcome::Unpaired(status);
        }
        Err(e) => {
            warn!("Status fetch failed: {}", e);
            return RefreshOutcome::Failed(e.to_string());
        }
    }

    match source.fetch_playlist(screen_id).await {
        Ok(records) => {
            debug!("Fetched {} playlist records", records.len());
            RefreshOutcome::Playlist(records.iter().map(PlaylistItem::from_record).collect())
        }
        Err(e) => {
            warn!("Playlist fetch failed: {}", e);
            RefreshOutcome::Failed(e.to_string())
        }
    }
}

/// Refresh until unpaired or the engine goes away
///
/// The first cycle runs immediately.
pub async fn run_refresh_loop(
    source: Arc<dyn PlaylistSource>,
    screen_id: String,
    period: Duration,
    tx: UnboundedSender<EngineEvent>,
) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let outcome = refresh_once(source.as_ref(), &screen_id).await;
        let unpaired = matches!(outcome, RefreshOutcome::Unpaired(_));

        if tx.send(EngineEvent::Refreshed(outcome)).is_err() {
            debug!("Engine gone, stopping refresh loop");
            break;
        }
        if unpaired {
            break;
        }
    }
}
