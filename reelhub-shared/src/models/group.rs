/// Group model and database operations
///
/// Groups are the third level of the hierarchy, owned by a community.
/// Creation always goes through [`Group::create_with_owner`], which inserts
/// the group and an admin membership for its creator in one transaction:
/// the creator is the first admin, and a group is never admin-less at
/// birth. The video count is computed on demand rather than stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::member::MemberRole;

/// Group model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Group {
    /// Unique group ID (UUID v4)
    pub id: Uuid,

    /// Owning community
    pub community_id: Uuid,

    /// Display name
    pub name: String,

    /// Optional avatar image URL
    pub avatar_url: Option<String>,

    /// User who created the group (not a foreign key)
    pub created_by: Uuid,

    /// When the group was created
    pub created_at: DateTime<Utc>,

    /// When the group was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGroup {
    pub community_id: Uuid,
    pub name: String,
    pub avatar_url: Option<String>,
    pub created_by: Uuid,
}

impl Group {
    /// Creates a group and its creator's admin membership atomically
    ///
    /// # Errors
    ///
    /// Returns an error if the community id points nowhere (foreign key
    /// violation) or the database connection fails; either insert failing
    /// rolls back both.
    pub async fn create_with_owner(pool: &PgPool, data: CreateGroup) -> Result<Self, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let group = sqlx::query_as::<_, Group>(
            r#"
            INSERT INTO groups (community_id, name, avatar_url, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, community_id, name, avatar_url, created_by, created_at, updated_at
            "#,
        )
        .bind(data.community_id)
        .bind(data.name)
        .bind(data.avatar_url)
        .bind(data.created_by)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO group_members (group_id, user_id, role) VALUES ($1, $2, $3)")
            .bind(group.id)
            .bind(group.created_by)
            .bind(MemberRole::Admin)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(group)
    }

    /// Finds a group by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let group = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, community_id, name, avatar_url, created_by, created_at, updated_at
            FROM groups
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(group)
    }

    /// Checks whether a group exists (target check for joins and messages)
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM groups WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Lists all groups, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let groups = sqlx::query_as::<_, Group>(
            r#"
            SELECT id, community_id, name, avatar_url, created_by, created_at, updated_at
            FROM groups
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(groups)
    }

    /// Counts videos currently attached to this group
    ///
    /// Computed on demand; there is no stored counter to drift.
    pub async fn video_count(pool: &PgPool, id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM videos WHERE group_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes a group, its memberships and messages, in one transaction
    ///
    /// Videos attached to the group survive with group_id cleared.
    ///
    /// # Returns
    ///
    /// True if the group existed and was deleted, false otherwise
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE videos SET group_id = NULL, updated_at = NOW() WHERE group_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM messages WHERE group_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM group_members WHERE group_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM groups WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
