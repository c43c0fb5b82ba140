use async_trait::async_trait;
use teloxide::prelude::*;

/// Capability check consumed by moderation commands.
///
/// Every admin-gated command goes through this trait, so the concrete lookup
/// (live API call, cached membership, test stub) is free to vary.
#[async_trait]
pub trait AdminGate: Send + Sync {
    /// Whether the sender of `msg` is an administrator of `chat_id`.
    async fn is_sent_by_chat_admin(
        &self,
        msg: &Message,
        chat_id: ChatId,
    ) -> anyhow::Result<bool>;
}

/// Live gate backed by the `getChatAdministrators` Bot API call.
pub struct TelegramAdminGate {
    bot: Bot,
}

impl TelegramAdminGate {
    /// Creates a gate using the given bot credentials.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl AdminGate for TelegramAdminGate {
    async fn is_sent_by_chat_admin(
        &self,
        msg: &Message,
        chat_id: ChatId,
    ) -> anyhow::Result<bool> {
        let Some(user) = msg.from() else {
            // Channel posts and service messages carry no sender.
            return Ok(false);
        };
        let admins = self.bot.get_chat_administrators(chat_id).await?;
        Ok(admins.iter().any(|member| member.user.id == user.id))
    }
}
