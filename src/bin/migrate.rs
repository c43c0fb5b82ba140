//! Database migration tool for the Diplomatic Mail Bot.

use anyhow::{anyhow, Result};
use dipmail_bot::config::Config;
use dipmail_bot::database::connection::DatabaseManager;
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("migrate");

    match command {
        "migrate" | "up" => run_migrations().await,
        "check" => check_database().await,
        "reset" => reset_database().await,
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {command}");
            print_help();
            Err(anyhow!("unknown command"))
        }
    }
}

async fn run_migrations() -> Result<()> {
    println!("📯 Diplomatic Mail Bot - Database Migration Tool");
    println!("================================================");

    let config = load_config()?;
    println!("📊 Database URL: {}", mask_url(&config.database_url));

    ensure_sqlite_dir(&config.database_url)?;

    let db = DatabaseManager::new(&config.database_url).await?;
    db.run_migrations().await?;

    println!("✅ Migrations applied successfully");
    Ok(())
}

async fn check_database() -> Result<()> {
    let config = load_config()?;
    println!("📊 Checking database: {}", mask_url(&config.database_url));

    let db = DatabaseManager::new(&config.database_url).await?;
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM groups")
        .fetch_one(&db.pool)
        .await?;

    println!("✅ Database reachable, {} enrolled group(s)", row.0);
    Ok(())
}

async fn reset_database() -> Result<()> {
    let config = load_config()?;
    println!("⚠️  Resetting database: {}", mask_url(&config.database_url));

    let db = DatabaseManager::new(&config.database_url).await?;
    sqlx::query("DROP TABLE IF EXISTS groups")
        .execute(&db.pool)
        .await?;
    sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
        .execute(&db.pool)
        .await?;
    db.run_migrations().await?;

    println!("✅ Database reset and migrated");
    Ok(())
}

fn load_config() -> Result<Config> {
    dotenvy::dotenv().ok();
    Config::from_env()
}

fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    if let Some(db_path) = database_url.strip_prefix("sqlite:") {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.exists() {
                println!("📁 Creating directory: {}", parent.display());
                std::fs::create_dir_all(parent)?;
            }
        }
    }
    Ok(())
}

fn mask_url(url: &str) -> String {
    match url.split_once('@') {
        Some((_, host)) => format!("***@{host}"),
        None => url.to_string(),
    }
}

fn print_help() {
    println!("Usage: migrate [COMMAND]");
    println!();
    println!("Commands:");
    println!("  migrate | up   Apply pending migrations (default)");
    println!("  check          Verify database connectivity");
    println!("  reset          Drop and re-create all tables");
    println!("  help           Show this message");
}
