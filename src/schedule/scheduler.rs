use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::error::{ScheduleError, ScheduleResult};
use super::store::{SlotStore, SlotTemplate};
use super::window::micros_until;

/// Whether a transition opens or closes a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// The slot's voting window begins.
    Opens,
    /// The slot's voting window ends.
    Closes,
}

/// The nearest future schedule boundary as seen from a given instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Time of day at which the transition occurs.
    pub at: NaiveTime,
    /// Whether the slot opens or closes at that instant.
    pub kind: TransitionKind,
    /// The slot the transition belongs to.
    pub slot: SlotTemplate,
}

impl SlotStore {
    /// The slot whose window contains `now`, if any.
    ///
    /// Store validation guarantees at most one match; finding more than one
    /// means the snapshot is corrupted and the query fails loudly instead of
    /// picking a winner.
    pub fn active_slot(&self, now: NaiveTime) -> ScheduleResult<Option<&SlotTemplate>> {
        let mut matches = self.all().iter().filter(|s| s.window.contains(now));
        let first = matches.next();
        if let Some(second) = matches.next() {
            let numbers: Vec<u32> = first
                .iter()
                .chain(std::iter::once(&second))
                .map(|s| s.number)
                .collect();
            return Err(ScheduleError::InvariantViolation(format!(
                "slots {numbers:?} are simultaneously active at {now}"
            )));
        }
        Ok(first)
    }

    /// The nearest strictly-future boundary across all slots, wrap-aware.
    ///
    /// Returns `None` for an empty store. When `now` lies inside a slot the
    /// next transition is that slot's close, even if another slot opens at
    /// the same instant. Boundary ties seen from outside any slot prefer
    /// `Opens` over `Closes`, then the lowest slot number.
    pub fn next_transition(&self, now: NaiveTime) -> ScheduleResult<Option<Transition>> {
        let active = self.active_slot(now)?.map(|s| s.id.clone());

        let mut best: Option<(i64, u8, u32, Transition)> = None;
        for slot in self.all() {
            for (at, kind) in [
                (slot.window.start(), TransitionKind::Opens),
                (slot.window.end(), TransitionKind::Closes),
            ] {
                let delta = micros_until(now, at);
                let rank = match kind {
                    // The active slot's own close outranks a simultaneous
                    // open; all other closes lose to opens.
                    TransitionKind::Closes if active.as_deref() == Some(slot.id.as_str()) => 0,
                    TransitionKind::Opens => 1,
                    TransitionKind::Closes => 2,
                };
                let candidate = (
                    delta,
                    rank,
                    slot.number,
                    Transition {
                        at,
                        kind,
                        slot: slot.clone(),
                    },
                );
                let better = match &best {
                    None => true,
                    Some((d, r, n, _)) => {
                        (candidate.0, candidate.1, candidate.2) < (*d, *r, *n)
                    }
                };
                if better {
                    best = Some(candidate);
                }
            }
        }
        Ok(best.map(|(_, _, _, t)| t))
    }
}
