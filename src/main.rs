//! # Diplomatic Mail Bot Main Entry Point
//!
//! Initializes logging, loads and validates configuration, builds the slot
//! schedule snapshot (fail-fast on configuration errors), starts the slot
//! watcher and digest services, and runs the Telegram bot alongside the
//! health endpoint.

use anyhow::Result;
use teloxide::dispatching::dialogue::InMemStorage;
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod bot;
mod config;
mod database;
mod schedule;
mod services;
mod utils;

use crate::bot::admin::TelegramAdminGate;
use crate::bot::handlers::{BotContext, BotHandler};
use crate::config::Config;
use crate::database::connection::DatabaseManager;
use crate::schedule::{SharedSchedule, SlotObserver, SlotStore, SlotWatcher, SystemClock};
use crate::services::digest::DigestService;
use crate::services::health::HealthService;
use crate::services::notifier::GroupNotifier;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dipmail_bot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!("Starting Diplomatic Mail Bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded - Database: {}, HTTP Port: {}, Culture: {}",
        config.database_url, config.http_port, config.culture
    );

    // Build and publish the slot schedule. Configuration errors abort the
    // process; a partially valid schedule is never installed.
    let store = SlotStore::build(config.vote_slots.clone())
        .map_err(|e| anyhow::anyhow!("Invalid slot schedule: {e}"))?;
    info!("Slot schedule validated with {} slot(s)", store.len());
    let schedule = SharedSchedule::new(store);

    // Initialize database
    info!("Initializing database connection...");
    let db_manager = DatabaseManager::new(&config.database_url).await?;
    info!("Running database migrations...");
    db_manager.run_migrations().await?;
    let db_arc = Arc::new(db_manager);
    info!("Database initialized successfully");

    // Initialize bot
    info!("Initializing Telegram bot...");
    let bot = Bot::new(&config.telegram_bot_token);
    let clock = Arc::new(SystemClock);

    // Start the slot watcher with the group notifier observing transitions
    let observers: Vec<Arc<dyn SlotObserver>> = vec![Arc::new(GroupNotifier::new(
        bot.clone(),
        db_arc.clone(),
        config.culture.clone(),
    ))];
    let (watcher_handle, watcher_task) = SlotWatcher::spawn(clock.clone(), &schedule, observers);
    info!("Slot watcher started");

    let handler = BotHandler::new(BotContext {
        db: db_arc.as_ref().clone(),
        schedule: schedule.clone(),
        gate: Arc::new(TelegramAdminGate::new(bot.clone())),
        watcher: watcher_handle.clone(),
        clock: clock.clone(),
        culture: config.culture.clone(),
    });
    info!("Telegram bot initialized successfully");

    // Initialize and start the digest service
    info!("Initializing digest service...");
    let mut digest_service = match DigestService::new(
        bot.clone(),
        db_arc.clone(),
        schedule.clone(),
        config.culture.clone(),
    )
    .await
    {
        Ok(service) => {
            info!("Digest service initialized successfully");
            service
        }
        Err(e) => {
            tracing::error!("Failed to create digest service: {}", e);
            return Err(anyhow::anyhow!("Failed to create digest service: {}", e));
        }
    };

    if let Err(e) = digest_service.start().await {
        tracing::error!("Failed to start digest service: {}", e);
    } else {
        info!("Digest service started successfully");
    }

    // Initialize health service
    let health_service = HealthService::new(db_arc.clone(), schedule.clone(), clock);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.http_port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to port {}: {}", config.http_port, e))?;

    info!("Health check server starting on port {}", config.http_port);

    // Run the bot and health server concurrently, supervising the watcher
    let bot_task = tokio::spawn(async move {
        let storage: std::sync::Arc<InMemStorage<()>> = InMemStorage::new().into();
        Dispatcher::builder(bot, handler.schema())
            .dependencies(dptree::deps![storage])
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    });

    let health_task = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, health_service.router).await {
            tracing::error!("Health server error: {}", e);
        }
    });

    tokio::select! {
        result1 = bot_task => {
            if let Err(e) = result1 {
                tracing::error!("Bot task error: {}", e);
            }
        }
        result2 = health_task => {
            if let Err(e) = result2 {
                tracing::error!("Health task error: {}", e);
            }
        }
        watcher_result = watcher_task => {
            // An invariant violation in the watcher is fatal for the process.
            match watcher_result {
                Ok(Ok(())) => info!("Slot watcher exited"),
                Ok(Err(e)) => {
                    tracing::error!("Slot watcher failed: {}", e);
                    return Err(anyhow::anyhow!("Slot watcher failed: {}", e));
                }
                Err(e) => tracing::error!("Slot watcher task error: {}", e),
            }
        }
    }

    // Stop background services on shutdown
    watcher_handle.shutdown();
    if let Err(e) = digest_service.stop().await {
        tracing::warn!("Error stopping digest service: {}", e);
    }

    info!("Application stopped");
    Ok(())
}
