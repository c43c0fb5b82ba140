use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::Command;
use crate::bot::handlers::BotContext;

/// Routes a parsed command to its handler.
pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: BotContext,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string())
                .await?;
        }
        Command::Start => {
            bot.send_message(
                msg.chat.id,
                "📯 Welcome to the Diplomatic Mail Bot!\n\nVoting on diplomatic mail happens \
                 during daily slots. Use /slots to see the schedule and /status for the \
                 current state.\nAdmins can /enroll this group into the exchange.",
            )
            .await?;
        }
        Command::Slots => {
            crate::bot::commands::slots::handle_slots(bot, msg, &ctx).await?;
        }
        Command::Status => {
            crate::bot::commands::slots::handle_status(bot, msg, &ctx).await?;
        }
        Command::Enroll => {
            crate::bot::commands::moderation::handle_enroll(bot, msg, &ctx).await?;
        }
        Command::Withdraw => {
            crate::bot::commands::moderation::handle_withdraw(bot, msg, &ctx).await?;
        }
        Command::SetSlots { spec } => {
            crate::bot::commands::moderation::handle_setslots(bot, msg, spec, &ctx).await?;
        }
        Command::ForceClose => {
            crate::bot::commands::moderation::handle_forceclose(bot, msg, &ctx).await?;
        }
    }
    Ok(())
}
