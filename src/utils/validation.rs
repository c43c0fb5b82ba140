use anyhow::{anyhow, Result};

/// Minimum plausible length of a Telegram bot API token.
const MIN_TOKEN_LEN: usize = 20;

/// Minimum length of a culture identifier ("ru", "en-US", ...).
const MIN_CULTURE_LEN: usize = 2;

/// Validates the bot API credential: non-empty, long enough, and shaped like
/// `<bot-id>:<secret>`.
pub fn validate_bot_token(token: &str) -> Result<()> {
    let token = token.trim();

    if token.is_empty() {
        return Err(anyhow!("Bot token cannot be empty"));
    }

    if token.len() < MIN_TOKEN_LEN {
        return Err(anyhow!(
            "Bot token must be at least {MIN_TOKEN_LEN} characters long"
        ));
    }

    if !token.contains(':') {
        return Err(anyhow!("Bot token must contain the ':' separator"));
    }

    Ok(())
}

/// Validates the configured culture identifier used for time formatting.
pub fn validate_culture(culture: &str) -> Result<()> {
    let culture = culture.trim();

    if culture.len() < MIN_CULTURE_LEN {
        return Err(anyhow!(
            "Culture identifier must be at least {MIN_CULTURE_LEN} characters long"
        ));
    }

    if !culture
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(anyhow!(
            "Culture identifier may only contain letters, digits, '-' and '_'"
        ));
    }

    Ok(())
}

/// Validates a Telegram chat id against the ranges Telegram actually hands
/// out: positive ids for private chats, small negatives for groups, large
/// negatives for supergroups.
pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    if chat_id > 2_147_483_647 {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    if chat_id < -2_000_000_000_000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_bot_token_accepts_real_shape() {
        assert!(validate_bot_token("123456789:AAF-abcDEFghiJKLmnoPQRstu").is_ok());
    }

    #[test]
    fn test_validate_bot_token_rejects_bad_input() {
        assert!(validate_bot_token("").is_err());
        assert!(validate_bot_token("   ").is_err());
        assert!(validate_bot_token("short:tok").is_err());
        assert!(validate_bot_token("a-long-token-without-any-separator").is_err());
    }

    #[test]
    fn test_validate_culture() {
        assert!(validate_culture("ru-RU").is_ok());
        assert!(validate_culture("en").is_ok());
        assert!(validate_culture("en_US").is_ok());
        assert!(validate_culture("r").is_err());
        assert!(validate_culture("").is_err());
        assert!(validate_culture("en US").is_err());
    }

    #[test]
    fn test_validate_telegram_chat_id() {
        assert!(validate_telegram_chat_id(123_456_789).is_ok());
        assert!(validate_telegram_chat_id(-987_654_321).is_ok());
        assert!(validate_telegram_chat_id(-1_001_234_567_890).is_ok());
        assert!(validate_telegram_chat_id(0).is_err());
        assert!(validate_telegram_chat_id(3_000_000_000).is_err());
        assert!(validate_telegram_chat_id(-3_000_000_000_000).is_err());
    }
}
