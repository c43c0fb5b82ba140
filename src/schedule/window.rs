use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::{ScheduleError, ScheduleResult};

/// Seconds in a calendar day, used for midnight-wrap arithmetic.
const DAY_SECONDS: i64 = 24 * 60 * 60;

/// An immutable daily time window `[start, end)`.
///
/// A window with `start > end` wraps midnight: it opens on one calendar day
/// and closes on the next (`22:00-02:00` covers `23:30` and `01:00` but not
/// `12:00`). Equal start and end is rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeWindow {
    /// Builds a window, rejecting zero-duration input.
    pub fn new(start: NaiveTime, end: NaiveTime) -> ScheduleResult<Self> {
        if start == end {
            return Err(ScheduleError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// Time of day at which the window opens.
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Time of day at which the window closes (exclusive).
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether the window crosses midnight.
    pub fn wraps_midnight(&self) -> bool {
        self.start > self.end
    }

    /// True iff `t` falls within `[start, end)`, wrap-aware.
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.wraps_midnight() {
            t >= self.start || t < self.end
        } else {
            t >= self.start && t < self.end
        }
    }

    /// Window length in minutes, always positive.
    pub fn duration_minutes(&self) -> i64 {
        let raw = (self.end - self.start).num_seconds();
        let seconds = raw.rem_euclid(DAY_SECONDS);
        seconds / 60
    }
}

/// Microseconds in a calendar day.
const DAY_MICROS: i64 = DAY_SECONDS * 1_000_000;

/// Microseconds from `now` until the next occurrence of `at`, treating an
/// exact match as a full day away (at the boundary instant the transition
/// has already happened). Sub-second precision matters here: truncating to
/// seconds would turn an imminent boundary into a day-long wait.
pub(crate) fn micros_until(now: NaiveTime, at: NaiveTime) -> i64 {
    let delta = (at - now)
        .num_microseconds()
        .unwrap_or(0)
        .rem_euclid(DAY_MICROS);
    if delta == 0 {
        DAY_MICROS
    } else {
        delta
    }
}
