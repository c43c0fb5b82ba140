use chrono::NaiveTime;
use thiserror::Error;

/// Errors produced by the slot scheduling engine.
///
/// The configuration variants (`InvalidWindow`, `DuplicateNumber`,
/// `NumberOrder`, `Overlap`) can only occur while building a store and are
/// fatal at load time: a store is never published partially valid.
/// `NotFound` is recoverable and returned to the caller. `InvariantViolation`
/// indicates a corrupted snapshot and terminates the watcher.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// A slot window has zero duration. Wrapping windows (start after end)
    /// are valid; equal start and end is not.
    #[error("slot window {start}..{end} has zero duration")]
    InvalidWindow {
        /// Start of the rejected window.
        start: NaiveTime,
        /// End of the rejected window.
        end: NaiveTime,
    },

    /// Two slot templates share the same ordinal number.
    #[error("duplicate slot number {0}")]
    DuplicateNumber(u32),

    /// Slot numbers do not increase with their start times.
    #[error("slot {0} is numbered out of start-time order")]
    NumberOrder(u32),

    /// Two slot windows intersect after midnight-wrap resolution.
    #[error("slot {first} overlaps slot {second}")]
    Overlap {
        /// Number of the earlier-starting slot.
        first: u32,
        /// Number of the later-starting slot.
        second: u32,
    },

    /// No slot with the requested id exists in the store.
    #[error("no slot with id {0}")]
    NotFound(String),

    /// The store answered a query in a way its invariants forbid.
    #[error("schedule invariant violated: {0}")]
    InvariantViolation(String),
}

impl ScheduleError {
    /// True for errors that can only arise from bad configuration input.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ScheduleError::InvalidWindow { .. }
                | ScheduleError::DuplicateNumber(_)
                | ScheduleError::NumberOrder(_)
                | ScheduleError::Overlap { .. }
        )
    }
}

/// Result alias used throughout the scheduling engine.
pub type ScheduleResult<T> = std::result::Result<T, ScheduleError>;
