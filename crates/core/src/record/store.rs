//! Persistence of the active dataset in the `social_posts` table.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::dataset::Dataset;
use super::model::NormalizedRecord;
use crate::ingest::date::format_long_date;

const INSERT_POST: &str = r#"
INSERT INTO social_posts (
    position, network, message_url, date, occurred_at, message,
    type, content_type, profile, followers, engagements
) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
"#;

const SELECT_POSTS: &str = r#"
SELECT network, message_url, date, occurred_at, message,
       type, content_type, profile, followers, engagements
FROM social_posts
ORDER BY position ASC
"#;

/// Replace every stored post with `dataset` in one transaction.
pub async fn replace_dataset(pool: &PgPool, dataset: &Dataset) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM social_posts")
        .execute(&mut *tx)
        .await?;

    for (position, record) in dataset.records().iter().enumerate() {
        sqlx::query(INSERT_POST)
            .bind(position as i64)
            .bind(&record.network)
            .bind(&record.message_url)
            .bind(&record.date)
            .bind(record.occurred_at)
            .bind(&record.message)
            .bind(&record.kind)
            .bind(&record.content_type)
            .bind(&record.profile)
            .bind(to_column(record.followers))
            .bind(to_column(record.engagements))
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(records = dataset.len(), "stored dataset replaced");
    Ok(())
}

/// Load the stored dataset, in its stored order.
pub async fn load_dataset(pool: &PgPool) -> Result<Dataset, sqlx::Error> {
    let rows = sqlx::query(SELECT_POSTS).fetch_all(pool).await?;
    let records = rows
        .iter()
        .map(record_from_row)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Dataset::from_records(records))
}

fn record_from_row(row: &PgRow) -> Result<NormalizedRecord, sqlx::Error> {
    let occurred_at: DateTime<Utc> = row.try_get("occurred_at")?;
    Ok(NormalizedRecord {
        network: row.try_get("network")?,
        message_url: row.try_get("message_url")?,
        date: row.try_get("date")?,
        message: row.try_get("message")?,
        kind: row.try_get("type")?,
        content_type: row.try_get("content_type")?,
        profile: row.try_get("profile")?,
        followers: from_column(row.try_get("followers")?),
        engagements: from_column(row.try_get("engagements")?),
        formatted_date: format_long_date(&occurred_at),
        occurred_at,
    })
}

// BIGINT is signed; counts beyond i64::MAX saturate.
fn to_column(count: u64) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

fn from_column(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}
