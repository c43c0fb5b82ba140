/// Morning schedule digest (cron)
pub mod digest;
/// HTTP health endpoint
pub mod health;
/// Slot transition announcements to enrolled groups
pub mod notifier;
