use chrono::NaiveTime;

/// Source of the authoritative "current time of day".
///
/// The watcher re-reads this on every wake instead of trusting elapsed-sleep
/// accounting, so system clock adjustments cannot desynchronize the
/// schedule. Tests substitute a deterministic implementation.
pub trait Clock: Send + Sync + 'static {
    /// Current time of day on the configured calendar.
    fn now(&self) -> NaiveTime;
}

/// Host-local wall clock. The configured culture picks display conventions;
/// the calendar day itself follows the host timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }
}
