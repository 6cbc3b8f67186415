//! Cancellable timers
//!
//! One handle per timer class: refresh, scheduling tick, hold. Each timer is
//! a spawned task that reports back through the engine channel; cancelling
//! aborts the task.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use tracing::debug;

use super::events::EngineEvent;
use super::refresh::run_refresh_loop;
use crate::source::PlaylistSource;

/// Handle to a running timer task
#[derive(Debug)]
pub struct TimerHandle {
    name: &'static str,
    abort: AbortHandle,
}

impl TimerHandle {
    fn spawn<F>(name: &'static str, task: F) -> Self
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let abort = tokio::spawn(task).abort_handle();
        Self { name, abort }
    }

    pub fn cancel(self) {
        debug!("Cancelling {} timer", self.name);
        self.abort.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.abort.is_finished()
    }
}

/// The engine's three timers
pub struct TimerSet {
    tx: UnboundedSender<EngineEvent>,
    refresh: Option<TimerHandle>,
    scheduling: Option<TimerHandle>,
    hold: Option<TimerHandle>,
}

impl TimerSet {
    pub fn new(tx: UnboundedSender<EngineEvent>) -> Self {
        Self {
            tx,
            refresh: None,
            scheduling: None,
            hold: None,
        }
    }

    /// Start (or restart) the refresh cycle; the first fetch runs immediately
    pub fn start_refresh(&mut self, source: Arc<dyn PlaylistSource>, screen_id: String, period: Duration) {
        if let Some(old) = self.refresh.take() {
            old.cancel();
        }
        let tx = self.tx.clone();
        self.refresh = Some(TimerHandle::spawn(
            "refresh",
            run_refresh_loop(source, screen_id, period, tx),
        ));
    }

    /// Start (or restart) the scheduling tick; the first tick fires immediately
    pub fn start_scheduling(&mut self, period: Duration) {
        if let Some(old) = self.scheduling.take() {
            old.cancel();
        }
        let tx = self.tx.clone();
        self.scheduling = Some(TimerHandle::spawn("scheduling", async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(EngineEvent::Tick).is_err() {
                    break;
                }
            }
        }));
    }

    /// Arm the single-shot hold timer, replacing any pending one
    pub fn arm_hold(&mut self, delay: Duration, generation: u64) {
        self.cancel_hold();
        let tx = self.tx.clone();
        debug!("Arming hold timer: {:?} (generation {})", delay, generation);
        self.hold = Some(TimerHandle::spawn("hold", async move {
            sleep(delay).await;
            let _ = tx.send(EngineEvent::HoldExpired { generation });
        }));
    }

    pub fn cancel_hold(&mut self) {
        if let Some(hold) = self.hold.take() {
            hold.cancel();
        }
    }

    /// Hold timer reported expiry; drop its finished handle
    pub fn hold_fired(&mut self) {
        if self.hold.as_ref().is_some_and(TimerHandle::is_finished) {
            self.hold = None;
        }
    }

    pub fn is_hold_pending(&self) -> bool {
        self.hold.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Teardown: cancel refresh, scheduling and hold timers
    pub fn cancel_all(&mut self) {
        for handle in [self.refresh.take(), self.scheduling.take(), self.hold.take()]
            .into_iter()
            .flatten()
        {
            handle.cancel();
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
