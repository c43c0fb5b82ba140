use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::clock::Clock;
use super::error::ScheduleResult;
use super::store::{SharedSchedule, SlotStore, SlotTemplate};
use super::window::micros_until;

/// A transition emitted by the watcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEvent {
    /// The slot's voting window just began.
    Opened(SlotTemplate),
    /// The slot's voting window just ended.
    Closed(SlotTemplate),
}

/// Downstream collaborator notified of slot transitions.
///
/// Implementations do their own I/O; the watcher dispatches fire-and-forget
/// and a failing observer never blocks siblings or the schedule computation.
#[async_trait]
pub trait SlotObserver: Send + Sync {
    /// Short name used in failure logs.
    fn name(&self) -> &str;

    /// Called when a slot's voting window begins.
    async fn on_slot_opened(&self, slot: &SlotTemplate) -> anyhow::Result<()>;

    /// Called when a slot's voting window ends.
    async fn on_slot_closed(&self, slot: &SlotTemplate) -> anyhow::Result<()>;
}

/// Control handle for a running [`SlotWatcher`].
#[derive(Clone)]
pub struct WatcherHandle {
    force_tx: mpsc::Sender<()>,
    shutdown_tx: Arc<watch::Sender<bool>>,
}

impl WatcherHandle {
    /// Requests an early close of the currently active slot. Returns false
    /// if the watcher is no longer running.
    pub async fn force_close(&self) -> bool {
        self.force_tx.send(()).await.is_ok()
    }

    /// Signals the watcher to exit at its next wake check.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Single per-process task that turns the published schedule into
/// `SlotOpened` / `SlotClosed` events.
///
/// The loop sleeps until the next transition boundary, re-derives "now" from
/// the [`Clock`] on every wake (resilient to clock adjustments), and diffs
/// the previously active slot against the current one. Snapshot replacements
/// wake it immediately and re-seed its state without synthesizing events for
/// the superseded schedule.
pub struct SlotWatcher {
    clock: Arc<dyn Clock>,
    store_rx: watch::Receiver<Arc<SlotStore>>,
    observers: Vec<Arc<dyn SlotObserver>>,
    shutdown_rx: watch::Receiver<bool>,
    force_rx: mpsc::Receiver<()>,
    active: Option<SlotTemplate>,
    suppressed: Option<String>,
}

impl SlotWatcher {
    /// Spawns the watcher task against the published schedule.
    pub fn spawn(
        clock: Arc<dyn Clock>,
        schedule: &SharedSchedule,
        observers: Vec<Arc<dyn SlotObserver>>,
    ) -> (WatcherHandle, JoinHandle<ScheduleResult<()>>) {
        let (force_tx, force_rx) = mpsc::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let watcher = Self {
            clock,
            store_rx: schedule.subscribe(),
            observers,
            shutdown_rx,
            force_rx,
            active: None,
            suppressed: None,
        };
        let handle = WatcherHandle {
            force_tx,
            shutdown_tx: Arc::new(shutdown_tx),
        };
        (handle, tokio::spawn(watcher.run()))
    }

    async fn run(mut self) -> ScheduleResult<()> {
        let mut store = self.store_rx.borrow_and_update().clone();
        let now = self.clock.now();
        // Initial state is derived from the clock, never assumed idle.
        self.active = store.active_slot(now)?.cloned();
        match &self.active {
            Some(slot) => info!("slot watcher started at {} inside slot {}", now, slot.number),
            None => info!("slot watcher started at {} with no active slot", now),
        }

        loop {
            let now = self.clock.now();
            let current = self.effective_active(&store, now)?;
            self.reconcile(now, current);

            let next = store.next_transition(now)?;
            if let Some(t) = &next {
                debug!(
                    "next transition: slot {} {:?} at {}",
                    t.slot.number, t.kind, t.at
                );
            }
            let wait = next
                .as_ref()
                .map(|t| Duration::from_micros(micros_until(now, t.at) as u64));

            tokio::select! {
                _ = sleep_or_park(wait) => {}
                changed = self.store_rx.changed() => {
                    if changed.is_err() {
                        info!("schedule publisher dropped, watcher exiting");
                        break;
                    }
                    store = self.store_rx.borrow_and_update().clone();
                    let now = self.clock.now();
                    self.suppressed = None;
                    self.active = store.active_slot(now)?.cloned();
                    info!(
                        "schedule snapshot replaced ({} slots), watcher re-seeded",
                        store.len()
                    );
                }
                changed = self.shutdown_rx.changed() => {
                    if changed.is_err() || *self.shutdown_rx.borrow() {
                        info!("slot watcher shutting down");
                        break;
                    }
                }
                Some(()) = self.force_rx.recv() => {
                    self.force_close_active();
                }
            }
        }
        Ok(())
    }

    /// The active slot with force-close suppression applied. Suppression
    /// ends as soon as the suppressed slot's window is over.
    fn effective_active(
        &mut self,
        store: &SlotStore,
        now: NaiveTime,
    ) -> ScheduleResult<Option<SlotTemplate>> {
        let current = store.active_slot(now)?.cloned();
        let still_suppressed = matches!(
            (&current, &self.suppressed),
            (Some(slot), Some(id)) if slot.id == *id
        );
        if still_suppressed {
            return Ok(None);
        }
        self.suppressed = None;
        Ok(current)
    }

    /// Diffs the tracked slot against the current one and emits the
    /// corresponding events, close before open.
    fn reconcile(&mut self, now: NaiveTime, current: Option<SlotTemplate>) {
        let unchanged = match (&self.active, &current) {
            (Some(prev), Some(cur)) => prev.id == cur.id,
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        if let Some(prev) = self.active.take() {
            info!("slot {} closed at {}", prev.number, now);
            self.dispatch(SlotEvent::Closed(prev));
        }
        if let Some(cur) = &current {
            info!("slot {} opened at {}", cur.number, now);
            self.dispatch(SlotEvent::Opened(cur.clone()));
        }
        self.active = current;
    }

    fn force_close_active(&mut self) {
        match self.active.take() {
            Some(slot) => {
                info!("force-closing slot {}", slot.number);
                self.suppressed = Some(slot.id.clone());
                self.dispatch(SlotEvent::Closed(slot));
            }
            None => warn!("force-close requested but no slot is active"),
        }
    }

    /// Fire-and-forget delivery; failures are logged per observer and never
    /// reach the loop or sibling observers.
    fn dispatch(&self, event: SlotEvent) {
        for observer in &self.observers {
            let observer = observer.clone();
            let event = event.clone();
            tokio::spawn(async move {
                let result = match &event {
                    SlotEvent::Opened(slot) => observer.on_slot_opened(slot).await,
                    SlotEvent::Closed(slot) => observer.on_slot_closed(slot).await,
                };
                if let Err(e) = result {
                    let (kind, slot) = match &event {
                        SlotEvent::Opened(s) => ("opened", s),
                        SlotEvent::Closed(s) => ("closed", s),
                    };
                    error!(
                        "observer {} failed handling slot {} {}: {e:#}",
                        observer.name(),
                        slot.number,
                        kind
                    );
                }
            });
        }
    }
}

async fn sleep_or_park(wait: Option<Duration>) {
    match wait {
        Some(d) => tokio::time::sleep(d).await,
        None => std::future::pending().await,
    }
}
