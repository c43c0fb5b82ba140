//! # Diplomatic Mail Bot
//!
//! A Telegram bot managing diplomatic mail exchange between groups, organized
//! around recurring daily voting slots.
//!
//! ## Features
//! - Validated, immutable daily slot schedule with midnight-wrap support
//! - Watcher task emitting slot opened/closed events to observers
//! - Slot announcements and a morning schedule digest for enrolled groups
//! - Admin-gated moderation commands (enroll, schedule replacement, force close)
//! - Persistent enrollment storage with SQLite

/// Bot command handlers, update routing and the admin gate
pub mod bot;
/// Configuration management and environment variables
pub mod config;
/// Database connection and persistent models
pub mod database;
/// The slot scheduling engine
pub mod schedule;
/// Background services: notifier, digest, health endpoint
pub mod services;
/// Utility functions for formatting and validation
pub mod utils;
