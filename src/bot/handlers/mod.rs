/// Command routing
pub mod message;

use std::sync::Arc;

use teloxide::{
    dispatching::{dialogue, UpdateHandler},
    prelude::*,
};

use crate::bot::admin::AdminGate;
use crate::database::connection::DatabaseManager;
use crate::schedule::{Clock, SharedSchedule, WatcherHandle};

/// Dependencies shared by every command handler.
#[derive(Clone)]
pub struct BotContext {
    /// Database access for enrollment records.
    pub db: DatabaseManager,
    /// The published slot schedule.
    pub schedule: SharedSchedule,
    /// Admin capability check for moderation commands.
    pub gate: Arc<dyn AdminGate>,
    /// Control handle of the running slot watcher.
    pub watcher: WatcherHandle,
    /// Authoritative time source for status queries.
    pub clock: Arc<dyn Clock>,
    /// Culture identifier for time formatting.
    pub culture: String,
}

/// Builds the dptree update schema around a [`BotContext`].
pub struct BotHandler {
    /// Context cloned into every endpoint.
    pub ctx: BotContext,
}

impl BotHandler {
    /// Wraps the shared context.
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// The dispatcher schema: command messages routed through
    /// [`message::command_handler`].
    pub fn schema(&self) -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
        use teloxide::dispatching::UpdateFilterExt;

        let ctx = self.ctx.clone();

        dialogue::enter::<Update, teloxide::dispatching::dialogue::InMemStorage<()>, (), _>()
            .branch(
                Update::filter_message()
                    .filter_command::<crate::bot::commands::Command>()
                    .endpoint(move |bot, msg, cmd| {
                        let ctx = ctx.clone();
                        async move { message::command_handler(bot, msg, cmd, ctx).await }
                    }),
            )
    }
}
