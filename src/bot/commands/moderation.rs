use teloxide::prelude::*;

use crate::bot::handlers::BotContext;
use crate::config::parse_slot_spec;
use crate::database::models::Group;
use crate::schedule::SlotStore;
use crate::utils::validation::validate_telegram_chat_id;

/// Replies when the sender is not an admin; returns whether to proceed.
async fn require_admin(bot: &Bot, msg: &Message, ctx: &BotContext) -> ResponseResult<bool> {
    match ctx.gate.is_sent_by_chat_admin(msg, msg.chat.id).await {
        Ok(true) => Ok(true),
        Ok(false) => {
            bot.send_message(
                msg.chat.id,
                "❌ Only chat administrators can use this command.",
            )
            .await?;
            Ok(false)
        }
        Err(e) => {
            tracing::error!("Admin check failed in chat {}: {}", msg.chat.id, e);
            bot.send_message(msg.chat.id, "❌ Could not verify administrator status.")
                .await?;
            Ok(false)
        }
    }
}

/// `/enroll`: registers this chat for slot announcements and mail exchange.
pub async fn handle_enroll(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;
    let user_id = msg.from().map(|u| u.id.0 as i64).unwrap_or(0);

    if let Err(e) = validate_telegram_chat_id(chat_id) {
        bot.send_message(msg.chat.id, format!("❌ Invalid chat: {e}"))
            .await?;
        return Ok(());
    }
    if !require_admin(&bot, &msg, ctx).await? {
        return Ok(());
    }

    match Group::find_by_chat_id(&ctx.db.pool, chat_id).await {
        Ok(Some(_)) => {
            bot.send_message(msg.chat.id, "ℹ️ This group is already enrolled.")
                .await?;
        }
        Ok(None) => {
            let title = msg.chat.title().map(str::to_string);
            match Group::enroll(&ctx.db.pool, chat_id, title, user_id).await {
                Ok(group) => {
                    tracing::info!(
                        "Chat {} enrolled into the mail exchange by user {}",
                        chat_id,
                        user_id
                    );
                    bot.send_message(
                        msg.chat.id,
                        format!(
                            "✅ Group enrolled. Slot announcements will be posted here (id {}).",
                            group.id
                        ),
                    )
                    .await?;
                }
                Err(e) => {
                    tracing::error!("Failed to enroll chat {}: {}", chat_id, e);
                    bot.send_message(msg.chat.id, "❌ Enrollment failed, try again later.")
                        .await?;
                }
            }
        }
        Err(e) => {
            tracing::error!("Enrollment lookup failed for chat {}: {}", chat_id, e);
            bot.send_message(msg.chat.id, "❌ Enrollment failed, try again later.")
                .await?;
        }
    }
    Ok(())
}

/// `/withdraw`: removes this chat from the exchange.
pub async fn handle_withdraw(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let chat_id = msg.chat.id.0;

    if !require_admin(&bot, &msg, ctx).await? {
        return Ok(());
    }

    match Group::remove(&ctx.db.pool, chat_id).await {
        Ok(true) => {
            tracing::info!("Chat {} withdrew from the mail exchange", chat_id);
            bot.send_message(msg.chat.id, "✅ Group withdrawn from the mail exchange.")
                .await?;
        }
        Ok(false) => {
            bot.send_message(msg.chat.id, "ℹ️ This group was not enrolled.")
                .await?;
        }
        Err(e) => {
            tracing::error!("Withdrawal failed for chat {}: {}", chat_id, e);
            bot.send_message(msg.chat.id, "❌ Withdrawal failed, try again later.")
                .await?;
        }
    }
    Ok(())
}

/// `/setslots`: validates and atomically installs a new slot schedule.
pub async fn handle_setslots(
    bot: Bot,
    msg: Message,
    spec: String,
    ctx: &BotContext,
) -> ResponseResult<()> {
    if !require_admin(&bot, &msg, ctx).await? {
        return Ok(());
    }

    let entries = match parse_slot_spec(&spec) {
        Ok(entries) => entries,
        Err(e) => {
            bot.send_message(
                msg.chat.id,
                format!("❌ Invalid schedule: {e}\nExample: /setslots 1=09:00-10:00,2=20:00-21:00"),
            )
            .await?;
            return Ok(());
        }
    };

    match SlotStore::build(entries) {
        Ok(store) => {
            let count = store.len();
            ctx.schedule.install(store);
            tracing::info!(
                "Slot schedule replaced with {} slots by user {:?} in chat {}",
                count,
                msg.from().map(|u| u.id),
                msg.chat.id
            );
            bot.send_message(
                msg.chat.id,
                format!("✅ Schedule replaced: {count} slot(s) configured."),
            )
            .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, format!("❌ Invalid schedule: {e}"))
                .await?;
        }
    }
    Ok(())
}

/// `/forceclose`: ends the currently open slot ahead of its window.
pub async fn handle_forceclose(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    if !require_admin(&bot, &msg, ctx).await? {
        return Ok(());
    }

    let store = ctx.schedule.snapshot();
    match store.active_slot(ctx.clock.now()) {
        Ok(Some(slot)) => {
            let number = slot.number;
            if ctx.watcher.force_close().await {
                tracing::info!(
                    "Slot {} force-closed by user {:?} in chat {}",
                    number,
                    msg.from().map(|u| u.id),
                    msg.chat.id
                );
                bot.send_message(msg.chat.id, format!("✅ Slot {number} is being closed early."))
                    .await?;
            } else {
                tracing::error!("Force-close request dropped: watcher is not running");
                bot.send_message(msg.chat.id, "❌ The schedule watcher is not running.")
                    .await?;
            }
        }
        Ok(None) => {
            bot.send_message(msg.chat.id, "ℹ️ No voting slot is open right now.")
                .await?;
        }
        Err(e) => {
            tracing::error!("Schedule state query failed: {}", e);
            bot.send_message(msg.chat.id, "❌ The schedule is in an inconsistent state.")
                .await?;
        }
    }
    Ok(())
}
