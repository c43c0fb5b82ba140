use anyhow::Result;
use sqlx::{migrate::MigrateDatabase, Sqlite, SqlitePool};
use tracing::info;

/// Owns the SQLite connection pool shared by the bot and its services.
#[derive(Clone)]
pub struct DatabaseManager {
    /// The underlying connection pool.
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Connects to the database, creating the file if it does not exist.
    pub async fn new(database_url: &str) -> Result<Self> {
        if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
            info!("Creating database {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        Ok(Self { pool })
    }

    /// Applies all pending migrations from `./migrations`.
    pub async fn run_migrations(&self) -> Result<()> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}
