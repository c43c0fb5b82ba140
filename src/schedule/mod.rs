//! Slot scheduling engine: validated daily voting windows, pure queries over
//! "now", and the watcher task that drives transition notifications.

/// Clock abstraction used by the watcher.
pub mod clock;
/// Engine error taxonomy.
pub mod error;
/// Pure scheduling queries (`active_slot`, `next_transition`).
pub mod scheduler;
/// Slot templates, the validated store and the published snapshot.
pub mod store;
/// The transition watcher task and observer interface.
pub mod watcher;
/// Daily time windows with midnight-wrap support.
pub mod window;

pub use clock::{Clock, SystemClock};
#[allow(unused_imports)]
pub use error::{ScheduleError, ScheduleResult};
#[allow(unused_imports)]
pub use scheduler::{Transition, TransitionKind};
pub use store::{SharedSchedule, SlotStore, SlotTemplate};
#[allow(unused_imports)]
pub use watcher::{SlotEvent, SlotObserver, SlotWatcher, WatcherHandle};
#[allow(unused_imports)]
pub use window::TimeWindow;
