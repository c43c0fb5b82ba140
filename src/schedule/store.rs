use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use uuid::Uuid;

use super::error::{ScheduleError, ScheduleResult};
use super::window::TimeWindow;

/// One configured daily voting slot.
///
/// The id is assigned by the store at build time and never changes. The
/// number is the 1-based ordinal shown to users and used for tie-breaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTemplate {
    /// Store-assigned identifier, unique within a snapshot.
    pub id: String,
    /// Ordinal position among the day's slots.
    pub number: u32,
    /// The slot's daily voting window.
    pub window: TimeWindow,
}

/// A validated, immutable snapshot of the daily slot schedule.
///
/// Replacing the schedule means building a new store and installing it
/// through [`SharedSchedule`]; entries are never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotStore {
    slots: Vec<SlotTemplate>,
}

impl SlotStore {
    /// Builds a store from `(start, end, number)` entries.
    ///
    /// Validation order: individually invalid windows, then duplicate
    /// numbers, then number-vs-start ordering, then pairwise overlap with
    /// wrap-around windows split into two sub-intervals before the sweep.
    pub fn build<I>(entries: I) -> ScheduleResult<Self>
    where
        I: IntoIterator<Item = (NaiveTime, NaiveTime, u32)>,
    {
        let mut slots = Vec::new();
        for (start, end, number) in entries {
            let window = TimeWindow::new(start, end)?;
            slots.push(SlotTemplate {
                id: Uuid::new_v4().to_string(),
                number,
                window,
            });
        }

        let mut seen = HashSet::new();
        for slot in &slots {
            if !seen.insert(slot.number) {
                return Err(ScheduleError::DuplicateNumber(slot.number));
            }
        }

        slots.sort_by_key(|s| s.number);
        for pair in slots.windows(2) {
            if pair[1].window.start() <= pair[0].window.start() {
                return Err(ScheduleError::NumberOrder(pair[1].number));
            }
        }

        check_overlaps(&slots)?;
        Ok(Self { slots })
    }

    /// An empty schedule. Valid; the watcher idles on it.
    pub fn empty() -> Self {
        Self { slots: Vec::new() }
    }

    /// All slots, ordered by number.
    pub fn all(&self) -> &[SlotTemplate] {
        &self.slots
    }

    /// Whether the store holds no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of configured slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Looks a slot up by its store-assigned id.
    pub fn by_id(&self, id: &str) -> ScheduleResult<&SlotTemplate> {
        self.slots
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ScheduleError::NotFound(id.to_string()))
    }
}

/// Splits every window into non-wrapping `[start, end)` second intervals and
/// sweeps them sorted by start; any intersection between distinct slots is a
/// configuration error.
fn check_overlaps(slots: &[SlotTemplate]) -> ScheduleResult<()> {
    const DAY: u32 = 24 * 60 * 60;
    let mut intervals: Vec<(u32, u32, u32)> = Vec::new();

    for slot in slots {
        let start = seconds_of_day(slot.window.start());
        let end = seconds_of_day(slot.window.end());
        if slot.window.wraps_midnight() {
            intervals.push((start, DAY, slot.number));
            intervals.push((0, end, slot.number));
        } else {
            intervals.push((start, end, slot.number));
        }
    }

    intervals.sort_unstable();
    for pair in intervals.windows(2) {
        let (_, prev_end, prev_number) = pair[0];
        let (next_start, _, next_number) = pair[1];
        if prev_number != next_number && next_start < prev_end {
            return Err(ScheduleError::Overlap {
                first: prev_number.min(next_number),
                second: prev_number.max(next_number),
            });
        }
    }
    Ok(())
}

fn seconds_of_day(t: NaiveTime) -> u32 {
    use chrono::Timelike;
    t.num_seconds_from_midnight()
}

/// The process-wide published schedule snapshot.
///
/// Readers take cheap `Arc` clones of the current store; reconfiguration is
/// a single atomic replacement through the underlying watch channel, which
/// also wakes the watcher so it never waits on a stale transition.
#[derive(Debug, Clone)]
pub struct SharedSchedule {
    tx: Arc<watch::Sender<Arc<SlotStore>>>,
}

impl SharedSchedule {
    /// Publishes the initial snapshot.
    pub fn new(store: SlotStore) -> Self {
        let (tx, _) = watch::channel(Arc::new(store));
        Self { tx: Arc::new(tx) }
    }

    /// The currently published snapshot.
    pub fn snapshot(&self) -> Arc<SlotStore> {
        self.tx.borrow().clone()
    }

    /// Atomically replaces the published snapshot.
    pub fn install(&self, store: SlotStore) {
        self.tx.send_replace(Arc::new(store));
    }

    /// Subscribes to snapshot replacements (used by the watcher).
    pub fn subscribe(&self) -> watch::Receiver<Arc<SlotStore>> {
        self.tx.subscribe()
    }
}
