/// Culture-aware time-of-day formatting
pub mod datetime;
/// Telegram MarkdownV2 escaping helpers
pub mod markdown;
/// Input validation for configuration and chat data
pub mod validation;
