use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A group chat enrolled in the diplomatic mail exchange.
///
/// Enrolled groups receive slot open/close announcements and the morning
/// schedule digest.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Group {
    /// Store-assigned identifier.
    pub id: String,
    /// Telegram chat id of the group.
    pub chat_id: i64,
    /// Chat title at enrollment time, if known.
    pub title: Option<String>,
    /// Telegram user id of the admin who enrolled the group.
    pub enrolled_by: i64,
    /// RFC 3339 enrollment timestamp.
    pub enrolled_at: String,
}

impl Group {
    /// Enrolls a chat into the exchange.
    pub async fn enroll(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
        title: Option<String>,
        enrolled_by: i64,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO groups (id, chat_id, title, enrolled_by, enrolled_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(chat_id)
        .bind(&title)
        .bind(enrolled_by)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_chat_id(pool, chat_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Looks an enrolled group up by chat id.
    pub async fn find_by_chat_id(
        pool: &sqlx::SqlitePool,
        chat_id: i64,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, chat_id, title, enrolled_by, enrolled_at FROM groups WHERE chat_id = ?",
        )
        .bind(chat_id)
        .fetch_optional(pool)
        .await
    }

    /// All enrolled groups, oldest enrollment first.
    pub async fn all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT id, chat_id, title, enrolled_by, enrolled_at FROM groups
             ORDER BY enrolled_at ASC",
        )
        .fetch_all(pool)
        .await
    }

    /// Withdraws a chat from the exchange. Returns whether a row was removed.
    pub async fn remove(pool: &sqlx::SqlitePool, chat_id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE chat_id = ?")
            .bind(chat_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
