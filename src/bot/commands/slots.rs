use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::handlers::BotContext;
use crate::schedule::TransitionKind;
use crate::utils::{datetime::format_time_of_day, markdown::escape_markdown};

/// `/slots`: lists the configured daily schedule.
pub async fn handle_slots(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let store = ctx.schedule.snapshot();

    if store.is_empty() {
        bot.send_message(msg.chat.id, "No voting slots are configured.")
            .await?;
        return Ok(());
    }

    let mut text = String::from("🗳 *Daily voting slots*\n\n");
    for slot in store.all() {
        let line = format!(
            "Slot {}: {} to {} ({} min)",
            slot.number,
            format_time_of_day(slot.window.start(), &ctx.culture),
            format_time_of_day(slot.window.end(), &ctx.culture),
            slot.window.duration_minutes()
        );
        text.push_str(&escape_markdown(&line));
        text.push('\n');
    }

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .await?;
    Ok(())
}

/// `/status`: shows the currently open slot and the next transition.
pub async fn handle_status(bot: Bot, msg: Message, ctx: &BotContext) -> ResponseResult<()> {
    let store = ctx.schedule.snapshot();
    let now = ctx.clock.now();

    let mut lines = Vec::new();
    match store.active_slot(now) {
        Ok(Some(slot)) => lines.push(format!(
            "Slot {} is open until {}.",
            slot.number,
            format_time_of_day(slot.window.end(), &ctx.culture)
        )),
        Ok(None) => lines.push("No voting slot is open right now.".to_string()),
        Err(e) => {
            tracing::error!("Schedule state query failed: {}", e);
            bot.send_message(msg.chat.id, "❌ The schedule is in an inconsistent state.")
                .await?;
            return Ok(());
        }
    }

    match store.next_transition(now) {
        Ok(Some(t)) => {
            let verb = match t.kind {
                TransitionKind::Opens => "opens",
                TransitionKind::Closes => "closes",
            };
            lines.push(format!(
                "Next: slot {} {} at {}.",
                t.slot.number,
                verb,
                format_time_of_day(t.at, &ctx.culture)
            ));
        }
        Ok(None) => lines.push("No transitions are scheduled.".to_string()),
        Err(e) => {
            tracing::error!("Next-transition query failed: {}", e);
        }
    }

    bot.send_message(msg.chat.id, lines.join("\n")).await?;
    Ok(())
}
