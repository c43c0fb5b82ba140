use std::sync::Arc;

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
};

use crate::database::{connection::DatabaseManager, models::Group};
use crate::schedule::{SlotObserver, SlotTemplate};
use crate::utils::{datetime::format_time_of_day, markdown::escape_markdown};

/// Observer that announces slot transitions to every enrolled group.
///
/// Delivery is best-effort per group: a chat that blocked the bot or was
/// deleted is logged and skipped, never failing the announcement round.
pub struct GroupNotifier {
    bot: Bot,
    db: Arc<DatabaseManager>,
    culture: String,
}

impl GroupNotifier {
    /// Creates the notifier for the given bot and enrollment store.
    pub fn new(bot: Bot, db: Arc<DatabaseManager>, culture: String) -> Self {
        Self { bot, db, culture }
    }

    async fn announce(&self, text: String) -> anyhow::Result<()> {
        let groups = Group::all(&self.db.pool).await?;
        if groups.is_empty() {
            tracing::debug!("No enrolled groups, skipping announcement");
            return Ok(());
        }

        for group in groups {
            let send = self
                .bot
                .send_message(ChatId(group.chat_id), text.clone())
                .parse_mode(ParseMode::MarkdownV2)
                .await;
            if let Err(e) = send {
                tracing::error!(
                    "Failed to deliver announcement to chat {}: {}",
                    group.chat_id,
                    e
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl SlotObserver for GroupNotifier {
    fn name(&self) -> &str {
        "group-notifier"
    }

    async fn on_slot_opened(&self, slot: &SlotTemplate) -> anyhow::Result<()> {
        let text = escape_markdown(&format!(
            "📬 Voting slot {} is open until {}. Cast your votes on today's diplomatic mail!",
            slot.number,
            format_time_of_day(slot.window.end(), &self.culture)
        ));
        self.announce(text).await
    }

    async fn on_slot_closed(&self, slot: &SlotTemplate) -> anyhow::Result<()> {
        let text = escape_markdown(&format!(
            "📪 Voting slot {} has closed. Votes are no longer accepted.",
            slot.number
        ));
        self.announce(text).await
    }
}
