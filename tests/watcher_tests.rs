#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveTime;
use dipmail_bot::schedule::{
    Clock, SharedSchedule, SlotObserver, SlotStore, SlotTemplate, SlotWatcher,
};

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

/// Deterministic clock driven by tokio's (paused) timer: "now" is the base
/// time plus however far the test has advanced the runtime.
struct TestClock {
    base: NaiveTime,
    origin: tokio::time::Instant,
}

impl TestClock {
    fn new(base: NaiveTime) -> Self {
        Self {
            base,
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TestClock {
    fn now(&self) -> NaiveTime {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap();
        // NaiveTime addition wraps at midnight, matching the daily schedule.
        self.base + elapsed
    }
}

#[derive(Clone, Default)]
struct Recorder {
    events: Arc<Mutex<Vec<(&'static str, u32)>>>,
}

impl Recorder {
    fn events(&self) -> Vec<(&'static str, u32)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl SlotObserver for Recorder {
    fn name(&self) -> &str {
        "recorder"
    }

    async fn on_slot_opened(&self, slot: &SlotTemplate) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(("opened", slot.number));
        Ok(())
    }

    async fn on_slot_closed(&self, slot: &SlotTemplate) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(("closed", slot.number));
        Ok(())
    }
}

struct FailingObserver;

#[async_trait]
impl SlotObserver for FailingObserver {
    fn name(&self) -> &str {
        "failing"
    }

    async fn on_slot_opened(&self, _slot: &SlotTemplate) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("observer down"))
    }

    async fn on_slot_closed(&self, _slot: &SlotTemplate) -> anyhow::Result<()> {
        Err(anyhow::anyhow!("observer down"))
    }
}

/// Advances paused time and lets dispatched observer tasks run.
async fn advance(duration: Duration) {
    tokio::time::sleep(duration).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_watcher_emits_open_and_close_at_boundaries() {
    let clock = Arc::new(TestClock::new(NaiveTime::from_hms_opt(8, 59, 0).unwrap()));
    let store = SlotStore::build(vec![(t(9, 0), t(9, 5), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(90)).await;
    assert_eq!(recorder.events(), vec![("opened", 1)]);

    advance(Duration::from_secs(300)).await;
    assert_eq!(recorder.events(), vec![("opened", 1), ("closed", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_watcher_seeds_from_active_slot_without_emitting() {
    // Process starts mid-slot: state is ActiveSlot(1), not Idle, but no
    // opened event is synthesized for a boundary that already passed.
    let clock = Arc::new(TestClock::new(t(9, 2)));
    let store = SlotStore::build(vec![(t(9, 0), t(9, 5), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(60)).await;
    assert!(recorder.events().is_empty());

    // The seeded slot still closes on time.
    advance(Duration::from_secs(180)).await;
    assert_eq!(recorder.events(), vec![("closed", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_adjacent_boundary_emits_close_then_open() {
    let clock = Arc::new(TestClock::new(t(9, 59)));
    let store =
        SlotStore::build(vec![(t(9, 0), t(10, 0), 1), (t(10, 0), t(11, 0), 2)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(120)).await;
    // One shared instant: slot 1's close is delivered before slot 2's open.
    assert_eq!(recorder.events(), vec![("closed", 1), ("opened", 2)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_snapshot_swap_does_not_fire_stale_close() {
    // Watcher is waiting for slot 1 to close at 09:00; at 08:30 a snapshot
    // without slot 1 is installed. The stale close must never fire.
    let clock = Arc::new(TestClock::new(t(8, 20)));
    let store = SlotStore::build(vec![(t(8, 0), t(9, 0), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(600)).await; // 08:30
    let replacement = SlotStore::build(vec![(t(10, 0), t(11, 0), 1)]).unwrap();
    schedule.install(replacement);

    advance(Duration::from_secs(40 * 60)).await; // past 09:00
    assert!(recorder.events().is_empty(), "stale close was emitted");

    advance(Duration::from_secs(60 * 60)).await; // past 10:00
    assert_eq!(recorder.events(), vec![("opened", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_force_close_emits_once_and_suppresses_reopen() {
    let clock = Arc::new(TestClock::new(t(9, 30)));
    let store = SlotStore::build(vec![(t(9, 0), t(10, 0), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(1)).await;
    assert!(handle.force_close().await);

    advance(Duration::from_secs(1)).await;
    assert_eq!(recorder.events(), vec![("closed", 1)]);

    // The natural boundary at 10:00 must not produce a second close, and the
    // suppressed slot must not re-open within its own window.
    advance(Duration::from_secs(3600)).await;
    assert_eq!(recorder.events(), vec![("closed", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_empty_schedule_idles_until_slots_installed() {
    let clock = Arc::new(TestClock::new(t(8, 0)));
    let schedule = SharedSchedule::new(SlotStore::empty());
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, vec![Arc::new(recorder.clone())]);

    advance(Duration::from_secs(60)).await;
    assert!(recorder.events().is_empty());

    let store = SlotStore::build(vec![(t(9, 0), t(10, 0), 1)]).unwrap();
    schedule.install(store);

    advance(Duration::from_secs(3600)).await; // past 09:00
    assert_eq!(recorder.events(), vec![("opened", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_failing_observer_does_not_block_siblings() {
    let clock = Arc::new(TestClock::new(NaiveTime::from_hms_opt(8, 59, 0).unwrap()));
    let store = SlotStore::build(vec![(t(9, 0), t(9, 5), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);
    let recorder = Recorder::default();

    let (handle, task) = SlotWatcher::spawn(
        clock,
        &schedule,
        vec![Arc::new(FailingObserver), Arc::new(recorder.clone())],
    );

    advance(Duration::from_secs(120)).await;
    assert_eq!(recorder.events(), vec![("opened", 1)]);

    handle.shutdown();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_exits_cleanly() {
    let clock = Arc::new(TestClock::new(t(8, 0)));
    let store = SlotStore::build(vec![(t(9, 0), t(10, 0), 1)]).unwrap();
    let schedule = SharedSchedule::new(store);

    let (handle, task) = SlotWatcher::spawn(clock, &schedule, Vec::new());

    advance(Duration::from_secs(1)).await;
    handle.shutdown();

    let result = tokio::time::timeout(Duration::from_secs(5), task).await;
    assert!(result.unwrap().unwrap().is_ok());
}
