//! Playback engine driver
//!
//! Owns the [`Scheduler`] and the [`TimerSet`] on a single task. Timer tasks,
//! the refresh task and the HTTP surface feed [`EngineEvent`]s into one
//! channel; the driver handles them one at a time and carries out the
//! resulting directives against the [`DisplayHost`].

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kiosk_common::events::{KioskEvent, OrientationDirective};
use kiosk_common::time::Clock;
use kiosk_common::Playlist;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{EngineEvent, RefreshOutcome};
use super::orientation::derive_orientation;
use super::scheduler::{Directive, Scheduler};
use super::timers::TimerSet;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::host::DisplayHost;
use crate::source::PlaylistSource;
use crate::state::{ActiveItem, PlaybackStatus, PlaylistSummary, SharedState};

/// Engine timing parameters
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub screen_id: String,
    pub refresh_interval: Duration,
    pub tick_interval: Duration,
    pub image_hold_ms: u64,
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            screen_id: config.screen_id.clone(),
            refresh_interval: config.refresh_interval,
            tick_interval: config.tick_interval,
            image_hold_ms: config.default_image_hold.as_millis() as u64,
        }
    }
}

/// Why the engine stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Shutdown requested locally
    Shutdown,
    /// Backend reported the screen as no longer paired
    Unpaired(String),
}

/// Cloneable handle for feeding the engine from outside
#[derive(Clone)]
pub struct EngineHandle {
    tx: mpsc::UnboundedSender<EngineEvent>,
    cancel: CancellationToken,
}

impl EngineHandle {
    /// Renderer's "playback finished" signal
    pub fn media_ended(&self, play_id: Option<Uuid>) -> Result<()> {
        self.send(EngineEvent::MediaEnded { play_id })
    }

    pub fn send(&self, event: EngineEvent) -> Result<()> {
        self.tx
            .send(event)
            .map_err(|_| Error::InvalidState("Playback engine is not running".to_string()))
    }

    /// Stop the engine and cancel all timers
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Playback engine
pub struct PlaybackEngine {
    config: EngineConfig,
    source: Arc<dyn PlaylistSource>,
    host: Arc<dyn DisplayHost>,
    state: Arc<SharedState>,
    clock: Arc<dyn Clock>,
    tx: mpsc::UnboundedSender<EngineEvent>,
    rx: mpsc::UnboundedReceiver<EngineEvent>,
    cancel: CancellationToken,
}

impl PlaybackEngine {
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn PlaylistSource>,
        host: Arc<dyn DisplayHost>,
        state: Arc<SharedState>,
        clock: Arc<dyn Clock>,
    ) -> (Self, EngineHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = EngineHandle {
            tx: tx.clone(),
            cancel: cancel.clone(),
        };
        let engine = Self {
            config,
            source,
            host,
            state,
            clock,
            tx,
            rx,
            cancel,
        };
        (engine, handle)
    }

    /// Run until shutdown or unpair; all timers are cancelled on return
    pub async fn run(mut self) -> ExitReason {
        info!(
            "Playback engine starting for screen {} (refresh {:?}, tick {:?})",
            self.config.screen_id, self.config.refresh_interval, self.config.tick_interval
        );

        let mut scheduler = Scheduler::new(self.config.image_hold_ms);
        let mut timers = TimerSet::new(self.tx.clone());
        timers.start_refresh(
            Arc::clone(&self.source),
            self.config.screen_id.clone(),
            self.config.refresh_interval,
        );
        timers.start_scheduling(self.config.tick_interval);
        self.state.set_playback_state(PlaybackStatus::Loading).await;

        let reason = loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break ExitReason::Shutdown,
                event = self.rx.recv() => {
                    let Some(event) = event else {
                        break ExitReason::Shutdown;
                    };
                    if let Some(reason) = self.handle_event(event, &mut scheduler, &mut timers).await {
                        break reason;
                    }
                }
            }
        };

        let directives = scheduler.shutdown();
        self.apply(directives, &mut timers);
        timers.cancel_all();
        info!("Playback engine stopped: {:?}", reason);
        reason
    }

    async fn handle_event(
        &self,
        event: EngineEvent,
        scheduler: &mut Scheduler,
        timers: &mut TimerSet,
    ) -> Option<ExitReason> {
        match event {
            EngineEvent::Tick => {
                let now = self.clock.now();
                let directives = scheduler.tick(&now);
                self.apply(directives, timers);
            }
            EngineEvent::HoldExpired { generation } => {
                timers.hold_fired();
                let directives = scheduler.on_hold_expired(generation);
                self.apply(directives, timers);
            }
            EngineEvent::MediaEnded { play_id } => {
                let directives = scheduler.on_media_end(play_id);
                self.apply(directives, timers);
            }
            EngineEvent::Refreshed(RefreshOutcome::Playlist(items)) => {
                self.state.set_refresh_error(None).await;
                self.state.mark_refreshed(Utc::now()).await;
                self.accept_playlist(items, scheduler, timers);
            }
            EngineEvent::Refreshed(RefreshOutcome::Failed(message)) => {
                warn!("Refresh failed, keeping last known content: {}", message);
                self.state.set_refresh_error(Some(message.clone())).await;
                self.state.broadcast_event(KioskEvent::RefreshFailed {
                    message,
                    timestamp: Utc::now(),
                });
            }
            EngineEvent::Refreshed(RefreshOutcome::Unpaired(status)) => {
                info!("Screen no longer paired (status '{}'), requesting exit", status);
                self.state.request_exit();
                self.state.broadcast_event(KioskEvent::ExitRequested { timestamp: Utc::now() });
                return Some(ExitReason::Unpaired(status));
            }
        }

        self.publish(scheduler).await;
        None
    }

    fn accept_playlist(&self, items: Playlist, scheduler: &mut Scheduler, timers: &mut TimerSet) {
        if !scheduler.replace_playlist(items) {
            return;
        }
        self.state.broadcast_event(KioskEvent::PlaylistUpdated {
            item_count: scheduler.playlist().len(),
            malformed_count: scheduler.malformed_count(),
            timestamp: Utc::now(),
        });

        // Pick up new content now rather than on the next tick
        let now = self.clock.now();
        let directives = scheduler.tick(&now);
        self.apply(directives, timers);
    }

    /// Carry out directives in order
    fn apply(&self, directives: Vec<Directive>, timers: &mut TimerSet) {
        for directive in directives {
            match directive {
                Directive::ModeSwitched { queue } => {
                    self.state.broadcast_event(KioskEvent::ModeSwitched {
                        queue,
                        timestamp: Utc::now(),
                    });
                }
                Directive::Show { item, play_id, hold_ms } => {
                    self.host.show(&item, play_id, hold_ms);
                }
                Directive::Clear => self.host.clear(),
                Directive::Orientation(OrientationDirective::Lock(orientation)) => {
                    self.host.lock_orientation(orientation);
                }
                Directive::Orientation(OrientationDirective::Unlock) => {
                    self.host.unlock_orientation();
                }
                Directive::ArmHold { delay, generation } => timers.arm_hold(delay, generation),
                Directive::CancelHold => timers.cancel_hold(),
            }
        }
    }

    /// Mirror scheduler state into the shared state read by the API
    async fn publish(&self, scheduler: &Scheduler) {
        let refresh_error = self.state.refresh_error().await;
        let status = if !scheduler.has_content() {
            match refresh_error {
                Some(message) => PlaybackStatus::Error { message },
                None => PlaybackStatus::Loading,
            }
        } else {
            match scheduler.active_item() {
                Some(item) => PlaybackStatus::Playing { item: item.clone() },
                None => PlaybackStatus::Waiting,
            }
        };

        let active = match (scheduler.active_item(), scheduler.play_id()) {
            (Some(item), Some(play_id)) => Some(ActiveItem {
                play_id,
                item: item.clone(),
            }),
            _ => None,
        };

        let summary = PlaylistSummary {
            item_count: scheduler.playlist().len(),
            malformed_count: scheduler.malformed_count(),
            queue: scheduler.queue_identity(),
            last_refresh: self.state.get_summary().await.last_refresh,
            mode_switches: scheduler.mode_switch_count(),
            advances: scheduler.advance_count(),
        };

        debug!("State: {}", status);
        self.state
            .set_orientation(derive_orientation(scheduler.active_item()))
            .await;
        self.state.set_active_item(active).await;
        self.state.set_summary(summary).await;
        self.state.set_playback_state(status).await;
    }
}
