/// Group chat message model
///
/// Messages hang off a group and vanish with it; they play no part in the
/// aggregation paths.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// A message posted in a group
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A message joined with its author's username, for listings
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MessageWithAuthor {
    pub id: Uuid,
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Posts a message to a group
    pub async fn create(
        pool: &PgPool,
        group_id: Uuid,
        user_id: Uuid,
        content: String,
    ) -> Result<Self, sqlx::Error> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (group_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, group_id, user_id, content, created_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await?;

        Ok(message)
    }

    /// Lists a group's messages with author usernames, newest first
    pub async fn list_for_group(
        pool: &PgPool,
        group_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageWithAuthor>, sqlx::Error> {
        let messages = sqlx::query_as::<_, MessageWithAuthor>(
            r#"
            SELECT m.id, m.group_id, m.user_id, u.username, m.content, m.created_at
            FROM messages m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = $1
            ORDER BY m.created_at DESC, m.id ASC
            LIMIT $2
            "#,
        )
        .bind(group_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(messages)
    }
}
