/// Brand model and database operations
///
/// Brands are the root of the content hierarchy: a brand owns communities,
/// communities own groups, and videos can attach to any of the three
/// levels. Deleting a brand tears down everything beneath it in one
/// transaction; see [`Brand::delete`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE brands (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     username VARCHAR(50) NOT NULL UNIQUE,
///     website VARCHAR(512),
///     primary_color VARCHAR(16),
///     secondary_color VARCHAR(16),
///     thumbnail_url VARCHAR(512),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use reelhub_shared::models::brand::{Brand, CreateBrand};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), sqlx::Error> {
/// let brand = Brand::create(&pool, CreateBrand {
///     name: "Nike".to_string(),
///     username: "nike_off".to_string(),
///     website: Some("https://nike.com".to_string()),
///     primary_color: None,
///     secondary_color: None,
///     thumbnail_url: None,
/// }).await?;
/// println!("Created brand: {}", brand.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Brand model, the root entity of the content hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    /// Unique brand ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Public handle, unique across all brands, immutable after creation
    pub username: String,

    /// Optional marketing site URL
    pub website: Option<String>,

    /// Optional brand color (hex string)
    pub primary_color: Option<String>,

    /// Optional brand color (hex string)
    pub secondary_color: Option<String>,

    /// Optional thumbnail image URL
    pub thumbnail_url: Option<String>,

    /// When the brand was created
    pub created_at: DateTime<Utc>,

    /// When the brand was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new brand
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub username: String,
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Input for updating a brand's presentation fields
///
/// Only non-None fields are written. The username handle cannot change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub website: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl UpdateBrand {
    /// True when no field is set (nothing to write)
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.website.is_none()
            && self.primary_color.is_none()
            && self.secondary_color.is_none()
            && self.thumbnail_url.is_none()
    }
}

impl Brand {
    /// Creates a new brand
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The username handle is already taken (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateBrand) -> Result<Self, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            INSERT INTO brands (name, username, website, primary_color, secondary_color, thumbnail_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, username, website, primary_color, secondary_color, thumbnail_url,
                      created_at, updated_at
            "#,
        )
        .bind(data.name)
        .bind(data.username)
        .bind(data.website)
        .bind(data.primary_color)
        .bind(data.secondary_color)
        .bind(data.thumbnail_url)
        .fetch_one(pool)
        .await?;

        Ok(brand)
    }

    /// Finds a brand by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let brand = sqlx::query_as::<_, Brand>(
            r#"
            SELECT id, name, username, website, primary_color, secondary_color, thumbnail_url,
                   created_at, updated_at
            FROM brands
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(brand)
    }

    /// Checks whether a brand exists (parent check for community creation)
    pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM brands WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;

        Ok(exists)
    }

    /// Lists all brands, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let brands = sqlx::query_as::<_, Brand>(
            r#"
            SELECT id, name, username, website, primary_color, secondary_color, thumbnail_url,
                   created_at, updated_at
            FROM brands
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(brands)
    }

    /// Updates a brand's presentation fields
    ///
    /// # Returns
    ///
    /// The updated brand, or None if the brand doesn't exist
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateBrand,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE brands SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.website.is_some() {
            bind_count += 1;
            query.push_str(&format!(", website = ${}", bind_count));
        }
        if data.primary_color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", primary_color = ${}", bind_count));
        }
        if data.secondary_color.is_some() {
            bind_count += 1;
            query.push_str(&format!(", secondary_color = ${}", bind_count));
        }
        if data.thumbnail_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", thumbnail_url = ${}", bind_count));
        }

        query.push_str(
            " WHERE id = $1 RETURNING id, name, username, website, primary_color, \
             secondary_color, thumbnail_url, created_at, updated_at",
        );

        let mut q = sqlx::query_as::<_, Brand>(&query).bind(id);

        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(website) = data.website {
            q = q.bind(website);
        }
        if let Some(primary_color) = data.primary_color {
            q = q.bind(primary_color);
        }
        if let Some(secondary_color) = data.secondary_color {
            q = q.bind(secondary_color);
        }
        if let Some(thumbnail_url) = data.thumbnail_url {
            q = q.bind(thumbnail_url);
        }

        let brand = q.fetch_optional(pool).await?;

        Ok(brand)
    }

    /// Deletes a brand and everything beneath it, in one transaction
    ///
    /// Order matters: the schema declares no ON DELETE action between
    /// hierarchy levels, so rows must go leaves-first. Videos under the
    /// subtree are kept; only the reference that pointed into the subtree
    /// is cleared.
    ///
    /// 1. Null out video references to the brand's groups, communities,
    ///    and the brand itself.
    /// 2. Delete messages and memberships under the subtree.
    /// 3. Delete groups, then communities, then the brand.
    ///
    /// A brand with no communities still deletes cleanly; the child
    /// statements are no-ops.
    ///
    /// # Returns
    ///
    /// True if the brand existed and was deleted, false otherwise
    ///
    /// # Errors
    ///
    /// Any failing step aborts the transaction; no partial cascade is ever
    /// visible.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"
            UPDATE videos SET group_id = NULL, updated_at = NOW()
            WHERE group_id IN (
                SELECT g.id FROM groups g
                JOIN communities c ON c.id = g.community_id
                WHERE c.brand_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            UPDATE videos SET community_id = NULL, updated_at = NOW()
            WHERE community_id IN (SELECT id FROM communities WHERE brand_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE videos SET brand_id = NULL, updated_at = NOW() WHERE brand_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            DELETE FROM messages
            WHERE group_id IN (
                SELECT g.id FROM groups g
                JOIN communities c ON c.id = g.community_id
                WHERE c.brand_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM group_members
            WHERE group_id IN (
                SELECT g.id FROM groups g
                JOIN communities c ON c.id = g.community_id
                WHERE c.brand_id = $1
            )
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM community_members
            WHERE community_id IN (SELECT id FROM communities WHERE brand_id = $1)
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM groups WHERE community_id IN (SELECT id FROM communities WHERE brand_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM communities WHERE brand_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_brand_is_empty() {
        assert!(UpdateBrand::default().is_empty());

        let update = UpdateBrand {
            website: Some("https://nike.com".to_string()),
            ..Default::default()
        };
        assert!(!update.is_empty());
    }

    #[test]
    fn test_create_brand_roundtrip() {
        let data = CreateBrand {
            name: "Nike".to_string(),
            username: "nike_off".to_string(),
            website: None,
            primary_color: Some("#111111".to_string()),
            secondary_color: None,
            thumbnail_url: None,
        };

        let json = serde_json::to_string(&data).unwrap();
        let back: CreateBrand = serde_json::from_str(&json).unwrap();
        assert_eq!(back.username, "nike_off");
        assert_eq!(back.primary_color.as_deref(), Some("#111111"));
    }

    // Cascade delete behavior is covered by tests/cascade_delete_tests.rs
}
