//! Scheduler state container
//!
//! Owns the playlist snapshot, the active queue and the cursor. Every entry
//! point is synchronous and returns the [`Directive`]s the driver must carry
//! out, in order. The driver serializes all calls, so no locking is needed
//! here.
//!
//! Hold timer rule: any transition that changes the active index emits
//! `CancelHold` before the new item's `Show`, and every armed timer carries
//! a generation so a late expiry from a replaced timer is ignored.

use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use kiosk_common::events::OrientationDirective;
use kiosk_common::{Playlist, PlaylistItem};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::cursor::{CursorState, PlaybackCursor};
use super::hold::{compute_hold_time_with, hold_delay};
use super::orientation::derive_orientation;
use super::queue::{queue_identity, QueueBuilder, QueueIdentity};

/// Instruction for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Active queue identity changed
    ModeSwitched { queue: QueueIdentity },
    /// Render this item
    Show {
        item: PlaylistItem,
        play_id: Uuid,
        hold_ms: u64,
    },
    /// Nothing to render
    Clear,
    Orientation(OrientationDirective),
    /// Start the single-shot hold timer
    ArmHold { delay: Duration, generation: u64 },
    /// Cancel the pending hold timer
    CancelHold,
}

/// Scheduling core: playlist snapshot, active queue, cursor, hold timer state
#[derive(Debug)]
pub struct Scheduler {
    playlist: Playlist,
    has_content: bool,
    builder: QueueBuilder,
    queue: Vec<PlaylistItem>,
    cursor: PlaybackCursor,
    play_id: Option<Uuid>,
    hold_generation: u64,
    hold_armed: bool,
    image_hold_ms: u64,
    mode_switches: u64,
    advances: u64,
}

impl Scheduler {
    /// Create an empty scheduler
    ///
    /// `image_hold_ms` is the hold time for images without a duration.
    pub fn new(image_hold_ms: u64) -> Self {
        Self {
            playlist: Vec::new(),
            has_content: false,
            builder: QueueBuilder::new(),
            queue: Vec::new(),
            cursor: PlaybackCursor::new(),
            play_id: None,
            hold_generation: 0,
            hold_armed: false,
            image_hold_ms,
            mode_switches: 0,
            advances: 0,
        }
    }

    /// Replace the playlist snapshot
    ///
    /// Returns false, changing nothing, when `items` is structurally equal to
    /// the snapshot already held. The new content is picked up by the next
    /// [`Scheduler::tick`].
    pub fn replace_playlist(&mut self, items: Playlist) -> bool {
        if self.has_content && items == self.playlist {
            debug!("Playlist unchanged ({} items), discarding payload", items.len());
            return false;
        }

        for item in &items {
            if let kiosk_common::ScheduleSpec::Malformed { reason } = &item.schedule {
                warn!("Item '{}' has a malformed schedule and will not play: {}", item.id, reason);
            }
        }

        info!(
            "Playlist updated: {} items ({} malformed)",
            items.len(),
            items.iter().filter(|i| i.schedule.is_malformed()).count()
        );
        self.playlist = items;
        self.has_content = true;
        true
    }

    /// Scheduling tick: rebuild the active queue for `now`
    pub fn tick(&mut self, now: &DateTime<FixedOffset>) -> Vec<Directive> {
        let update = self.builder.rebuild(&self.playlist, now);
        self.queue = update.queue;
        let len = self.queue.len();
        let mut directives = Vec::new();

        // Identity covers length, so a shrunk queue always lands here
        if update.mode_switch {
            self.mode_switches += 1;
            let identity = queue_identity(&self.queue);
            info!("Mode switch at {}: active queue {:?}", now, identity);
            directives.push(Directive::ModeSwitched { queue: identity });
            self.cancel_hold(&mut directives);
            self.cursor.reset(len);
            self.start_current(&mut directives);
        }

        directives
    }

    /// The hold timer with `generation` fired
    pub fn on_hold_expired(&mut self, generation: u64) -> Vec<Directive> {
        if !self.hold_armed || generation != self.hold_generation {
            debug!(
                "Ignoring stale hold expiry (generation {}, current {})",
                generation, self.hold_generation
            );
            return Vec::new();
        }
        self.hold_armed = false;
        self.advance()
    }

    /// The renderer reported that the current media finished
    ///
    /// Ignored when `play_id` names an earlier playback, when nothing is
    /// playing, or when a hold timer is armed (the renderer loops such items).
    pub fn on_media_end(&mut self, play_id: Option<Uuid>) -> Vec<Directive> {
        if self.play_id.is_none() {
            debug!("Ignoring media end: nothing playing");
            return Vec::new();
        }
        if let Some(id) = play_id {
            if Some(id) != self.play_id {
                debug!("Ignoring media end for stale play {}", id);
                return Vec::new();
            }
        }
        if self.hold_armed {
            debug!("Ignoring media end: hold timer governs the current item");
            return Vec::new();
        }
        self.advance()
    }

    /// Teardown: cancel any pending hold
    pub fn shutdown(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        self.cancel_hold(&mut directives);
        directives
    }

    fn advance(&mut self) -> Vec<Directive> {
        let mut directives = Vec::new();
        self.cancel_hold(&mut directives);
        match self.cursor.advance(self.queue.len()) {
            Some(state) => {
                self.advances += 1;
                debug!("Cursor advanced to {:?}", state);
                self.start_current(&mut directives);
            }
            None => debug!("Advance requested with empty queue"),
        }
        directives
    }

    fn cancel_hold(&mut self, directives: &mut Vec<Directive>) {
        if self.hold_armed {
            self.hold_armed = false;
            directives.push(Directive::CancelHold);
        }
    }

    /// Emit render, orientation and timer directives for the cursor position
    fn start_current(&mut self, directives: &mut Vec<Directive>) {
        match self.cursor.state() {
            CursorState::Playing(index) => {
                let item = self.queue[index].clone();
                let play_id = Uuid::new_v4();
                let hold_ms = compute_hold_time_with(&item, self.image_hold_ms);
                let delay = hold_delay(&item, self.image_hold_ms);
                self.play_id = Some(play_id);

                directives.push(Directive::Orientation(derive_orientation(Some(&item))));
                directives.push(Directive::Show { item, play_id, hold_ms });
                if let Some(delay) = delay {
                    self.hold_generation += 1;
                    self.hold_armed = true;
                    directives.push(Directive::ArmHold {
                        delay,
                        generation: self.hold_generation,
                    });
                }
            }
            CursorState::Empty => {
                self.play_id = None;
                directives.push(Directive::Clear);
                directives.push(Directive::Orientation(derive_orientation(None)));
            }
        }
    }

    /// Current render target
    pub fn active_item(&self) -> Option<&PlaylistItem> {
        self.cursor.index().and_then(|i| self.queue.get(i))
    }

    pub fn play_id(&self) -> Option<Uuid> {
        self.play_id
    }

    pub fn cursor_state(&self) -> CursorState {
        self.cursor.state()
    }

    pub fn queue(&self) -> &[PlaylistItem] {
        &self.queue
    }

    pub fn queue_identity(&self) -> QueueIdentity {
        queue_identity(&self.queue)
    }

    pub fn playlist(&self) -> &[PlaylistItem] {
        &self.playlist
    }

    /// A playlist has been accepted at least once
    pub fn has_content(&self) -> bool {
        self.has_content
    }

    pub fn malformed_count(&self) -> usize {
        self.playlist.iter().filter(|i| i.schedule.is_malformed()).count()
    }

    pub fn is_hold_armed(&self) -> bool {
        self.hold_armed
    }

    pub fn mode_switch_count(&self) -> u64 {
        self.mode_switches
    }

    pub fn advance_count(&self) -> u64 {
        self.advances
    }
}
