use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{ChatId, ParseMode},
};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::database::{connection::DatabaseManager, models::Group};
use crate::schedule::SharedSchedule;
use crate::utils::{datetime::format_time_of_day, markdown::escape_markdown};

/// Posts the day's voting schedule to every enrolled group each morning.
pub struct DigestService {
    bot: Bot,
    db: Arc<DatabaseManager>,
    schedule: SharedSchedule,
    culture: String,
    scheduler: JobScheduler,
}

impl DigestService {
    /// Creates the service without starting the cron job.
    pub async fn new(
        bot: Bot,
        db: Arc<DatabaseManager>,
        schedule: SharedSchedule,
        culture: String,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            bot,
            db,
            schedule,
            culture,
            scheduler,
        })
    }

    /// Schedules the daily digest at 6 AM UTC.
    pub async fn start(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bot = self.bot.clone();
        let db = self.db.clone();
        let schedule = self.schedule.clone();
        let culture = self.culture.clone();

        let digest_job = Job::new_async("0 0 6 * * *", move |_uuid, _l| {
            let bot = bot.clone();
            let db = db.clone();
            let schedule = schedule.clone();
            let culture = culture.clone();
            Box::pin(async move {
                if let Err(e) = send_schedule_digest(bot, db, schedule, culture).await {
                    tracing::error!("Failed to send schedule digest: {}", e);
                }
            })
        })?;

        self.scheduler.add(digest_job).await?;
        self.scheduler.start().await?;

        tracing::info!("Digest service started - posting the schedule daily at 6 AM UTC");
        Ok(())
    }

    /// Stops the cron scheduler.
    pub async fn stop(&mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.scheduler.shutdown().await?;
        Ok(())
    }

    // Manual trigger for testing
    /// Sends the digest immediately.
    pub async fn send_digest_now(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        send_schedule_digest(
            self.bot.clone(),
            self.db.clone(),
            self.schedule.clone(),
            self.culture.clone(),
        )
        .await
    }
}

async fn send_schedule_digest(
    bot: Bot,
    db: Arc<DatabaseManager>,
    schedule: SharedSchedule,
    culture: String,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let store = schedule.snapshot();
    if store.is_empty() {
        tracing::debug!("No slots configured, skipping digest");
        return Ok(());
    }

    let groups = Group::all(&db.pool).await?;
    if groups.is_empty() {
        return Ok(());
    }

    let mut text = String::from("📯 *Today's voting slots*\n\n");
    for slot in store.all() {
        let line = format!(
            "Slot {}: {} to {}",
            slot.number,
            format_time_of_day(slot.window.start(), &culture),
            format_time_of_day(slot.window.end(), &culture)
        );
        text.push_str(&escape_markdown(&line));
        text.push('\n');
    }

    for group in groups {
        let send = bot
            .send_message(ChatId(group.chat_id), text.clone())
            .parse_mode(ParseMode::MarkdownV2)
            .await;
        if let Err(e) = send {
            tracing::error!("Failed to send digest to chat {}: {}", group.chat_id, e);
        }
    }

    Ok(())
}
