//! Append-only chat log with explicit edit, delete and clear.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::model::{ConversationMessage, Role};

const COLUMNS: &str = "id, role, content, created_at, edited";

/// Append a question and its answer in one transaction.
pub async fn append_exchange(
    pool: &PgPool,
    question: &str,
    answer: &str,
) -> Result<(ConversationMessage, ConversationMessage), sqlx::Error> {
    let sql = format!(
        "INSERT INTO chat_messages (id, role, content, created_at) VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    );
    let asked_at = Utc::now();
    let mut tx = pool.begin().await?;

    let user = sqlx::query(&sql)
        .bind(Uuid::now_v7())
        .bind(Role::User.as_str())
        .bind(question)
        .bind(asked_at)
        .fetch_one(&mut *tx)
        .await?;
    let assistant = sqlx::query(&sql)
        .bind(Uuid::now_v7())
        .bind(Role::Assistant.as_str())
        .bind(answer)
        .bind(Utc::now().max(asked_at))
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok((message_from_row(&user)?, message_from_row(&assistant)?))
}

/// Whole log, oldest first.
pub async fn list(pool: &PgPool) -> Result<Vec<ConversationMessage>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM chat_messages ORDER BY created_at ASC, id ASC");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.iter().map(message_from_row).collect()
}

/// The `limit` most recent messages, oldest first.
pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<ConversationMessage>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM (
            SELECT {COLUMNS} FROM chat_messages ORDER BY created_at DESC, id DESC LIMIT $1
        ) latest ORDER BY created_at ASC, id ASC"
    );
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;
    rows.iter().map(message_from_row).collect()
}

/// Replace a message's content and mark it edited. `None` if no such message.
pub async fn edit(
    pool: &PgPool,
    id: Uuid,
    content: &str,
) -> Result<Option<ConversationMessage>, sqlx::Error> {
    let sql = format!(
        "UPDATE chat_messages SET content = $2, edited = TRUE WHERE id = $1 RETURNING {COLUMNS}"
    );
    let row = sqlx::query(&sql)
        .bind(id)
        .bind(content)
        .fetch_optional(pool)
        .await?;
    row.as_ref().map(message_from_row).transpose()
}

/// Delete one message. Returns whether it existed.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chat_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete every message. Returns how many were removed.
pub async fn clear(pool: &PgPool) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM chat_messages").execute(pool).await?;
    Ok(result.rows_affected())
}

fn message_from_row(row: &PgRow) -> Result<ConversationMessage, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    Ok(ConversationMessage {
        id: row.try_get("id")?,
        role,
        content: row.try_get("content")?,
        created_at,
        edited: row.try_get("edited")?,
    })
}
