use anyhow::{anyhow, Context, Result};
use chrono::NaiveTime;
use std::env;

use crate::utils::validation::{validate_bot_token, validate_culture};

/// Runtime configuration, loaded once at startup from the environment.
///
/// Invalid credentials, culture or slot definitions are fatal: the process
/// never starts with a partially valid configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Telegram bot API token (`<bot-id>:<secret>`).
    pub telegram_bot_token: String,
    /// Culture identifier driving time-of-day formatting.
    pub culture: String,
    /// Daily voting slots as `(start, end, number)` tuples, unvalidated
    /// against each other; `SlotStore::build` owns the cross-slot checks.
    pub vote_slots: Vec<(NaiveTime, NaiveTime, u32)>,
    /// SQLite connection string.
    pub database_url: String,
    /// Port of the health endpoint.
    pub http_port: u16,
}

impl Config {
    /// Reads configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| anyhow!("TELEGRAM_BOT_TOKEN must be set"))?;
        validate_bot_token(&token).context("TELEGRAM_BOT_TOKEN is invalid")?;

        let culture =
            env::var("BOT_CULTURE").map_err(|_| anyhow!("BOT_CULTURE must be set"))?;
        validate_culture(&culture).context("BOT_CULTURE is invalid")?;

        let vote_slots = match env::var("VOTE_SLOTS") {
            Ok(spec) => parse_slot_spec(&spec).context("VOTE_SLOTS is invalid")?,
            Err(_) => Vec::new(),
        };

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:./data/dipmail.db".to_string());
        let database_url = if database_url.trim().is_empty() {
            "sqlite:./data/dipmail.db".to_string()
        } else {
            database_url
        };

        let port_str = env::var("HTTP_PORT").unwrap_or_else(|_| "3000".to_string());
        let http_port = port_str
            .trim()
            .parse()
            .map_err(|_| anyhow!("Invalid HTTP_PORT"))?;

        Ok(Config {
            telegram_bot_token: token,
            culture: culture.trim().to_string(),
            vote_slots,
            database_url,
            http_port,
        })
    }
}

/// Parses a slot schedule definition of the form
/// `1=09:00-10:00,2=20:00-21:00`.
///
/// Each entry is `<number>=<start>-<end>` with `HH:MM` times. Windows whose
/// start is later than their end wrap past midnight.
pub fn parse_slot_spec(spec: &str) -> Result<Vec<(NaiveTime, NaiveTime, u32)>> {
    let spec = spec.trim();
    if spec.is_empty() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for part in spec.split(',') {
        let part = part.trim();
        let (number, window) = part
            .split_once('=')
            .ok_or_else(|| anyhow!("slot entry '{part}' is missing '='"))?;
        let number: u32 = number
            .trim()
            .parse()
            .map_err(|_| anyhow!("slot number '{number}' is not a positive integer"))?;
        if number == 0 {
            return Err(anyhow!("slot numbers are 1-based, got 0"));
        }
        let (start, end) = window
            .split_once('-')
            .ok_or_else(|| anyhow!("slot window '{window}' is missing '-'"))?;
        let start = parse_time(start)?;
        let end = parse_time(end)?;
        entries.push((start, end, number));
    }
    Ok(entries)
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| anyhow!("'{s}' is not a valid HH:MM time"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slot_spec() {
        let slots = parse_slot_spec("1=09:00-10:00, 2=20:00-21:00").unwrap();
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].2, 1);
        assert_eq!(slots[1].0, NaiveTime::from_hms_opt(20, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_slot_spec_empty() {
        assert!(parse_slot_spec("").unwrap().is_empty());
        assert!(parse_slot_spec("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_slot_spec_rejects_malformed() {
        assert!(parse_slot_spec("09:00-10:00").is_err());
        assert!(parse_slot_spec("1=09:00").is_err());
        assert!(parse_slot_spec("1=25:00-26:00").is_err());
        assert!(parse_slot_spec("0=09:00-10:00").is_err());
        assert!(parse_slot_spec("x=09:00-10:00").is_err());
    }
}
