/// Community model and database operations
///
/// A community lives under exactly one brand and owns groups. Creation
/// requires the parent brand to exist (checked by the caller and backed by
/// the FK); deletion cascades through groups, memberships and messages in
/// one transaction, nulling video references along the way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Community model, the second level of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Community {
    /// Unique community ID (UUID v4)
    pub id: Uuid,

    /// Owning brand
    pub brand_id: Uuid,

    /// Display name
    pub name: String,

    /// Optional thumbnail image URL
    pub thumbnail_url: Option<String>,

    /// Optional avatar image URL
    pub avatar_url: Option<String>,

    /// User who created the community (not a foreign key)
    pub created_by: Uuid,

    /// When the community was created
    pub created_at: DateTime<Utc>,

    /// When the community was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new community
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCommunity {
    pub brand_id: Uuid,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_by: Uuid,
}

impl Community {
    /// Creates a new community under a brand
    ///
    /// # Errors
    ///
    /// Returns an error if the brand id points nowhere (foreign key
    /// violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateCommunity) -> Result<Self, sqlx::Error> {
        let community = sqlx::query_as::<_, Community>(
            r#"
            INSERT INTO communities (brand_id, name, thumbnail_url, avatar_url, created_by)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, brand_id, name, thumbnail_url, avatar_url, created_by,
                      created_at, updated_at
            "#,
        )
        .bind(data.brand_id)
        .bind(data.name)
        .bind(data.thumbnail_url)
        .bind(data.avatar_url)
        .bind(data.created_by)
        .fetch_one(pool)
        .await?;

        Ok(community)
    }

    /// Finds a community by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let community = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, brand_id, name, thumbnail_url, avatar_url, created_by,
                   created_at, updated_at
            FROM communities
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(community)
    }

    /// Checks whether a community exists (parent check for groups and joins)
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM communities WHERE id = $1)")
                .bind(id)
                .fetch_one(pool)
                .await?;

        Ok(exists)
    }

    /// Lists all communities, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let communities = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, brand_id, name, thumbnail_url, avatar_url, created_by,
                   created_at, updated_at
            FROM communities
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(communities)
    }

    /// Lists communities belonging to a brand, newest first
    pub async fn find_by_brand(pool: &PgPool, brand_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        let communities = sqlx::query_as::<_, Community>(
            r#"
            SELECT id, brand_id, name, thumbnail_url, avatar_url, created_by,
                   created_at, updated_at
            FROM communities
            WHERE brand_id = $1
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .bind(brand_id)
        .fetch_all(pool)
        .await?;

        Ok(communities)
    }

    /// Deletes a community and everything beneath it, in one transaction
    ///
    /// Same leaves-first order as the brand cascade, scoped to one
    /// community: video references are nulled, then messages, group
    /// memberships and community memberships go, then groups, then the
    /// community row itself.
    ///
    /// # Returns
    ///
    /// True if the community existed and was deleted, false otherwise
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE videos SET group_id = NULL, updated_at = NOW()
            WHERE group_id IN (SELECT id FROM groups WHERE community_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE videos SET community_id = NULL, updated_at = NOW() WHERE community_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM messages WHERE group_id IN (SELECT id FROM groups WHERE community_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_id IN (SELECT id FROM groups WHERE community_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM community_members WHERE community_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM groups WHERE community_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM communities WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
