/// Video model and database operations
///
/// Videos attach optionally to a brand, community and group, and always to
/// their uploader. The binary itself lives in external object storage; the
/// row only carries the stable URL that storage handed back. Views are a
/// monotonic counter incremented in place.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Video model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Video {
    /// Unique video ID (UUID v4)
    pub id: Uuid,

    /// Title shown in listings
    pub title: String,

    /// Optional longer description
    pub description: Option<String>,

    /// Reference URL into external object storage
    pub url: String,

    /// Monotonic view counter, starts at 0
    pub views: i64,

    /// Owning brand, cleared if the brand is deleted
    pub brand_id: Option<Uuid>,

    /// Owning community, cleared if the community is deleted
    pub community_id: Option<Uuid>,

    /// Owning group, cleared if the group is deleted
    pub group_id: Option<Uuid>,

    /// Uploader; a video never outlives its uploader
    pub uploaded_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for registering a new video
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub brand_id: Option<Uuid>,
    pub community_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub uploaded_by: Uuid,
}

impl Video {
    /// Registers a new video
    ///
    /// # Errors
    ///
    /// Returns an error if any provided hierarchy reference points nowhere
    /// (foreign key violation) or the database connection fails
    pub async fn create(pool: &PgPool, data: CreateVideo) -> Result<Self, sqlx::Error> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            INSERT INTO videos (title, description, url, brand_id, community_id, group_id, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, description, url, views, brand_id, community_id, group_id,
                      uploaded_by, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.url)
        .bind(data.brand_id)
        .bind(data.community_id)
        .bind(data.group_id)
        .bind(data.uploaded_by)
        .fetch_one(pool)
        .await?;

        Ok(video)
    }

    /// Finds a video by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let video = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, title, description, url, views, brand_id, community_id, group_id,
                   uploaded_by, created_at, updated_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(video)
    }

    /// Lists all videos, newest first
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let videos = sqlx::query_as::<_, Video>(
            r#"
            SELECT id, title, description, url, views, brand_id, community_id, group_id,
                   uploaded_by, created_at, updated_at
            FROM videos
            ORDER BY created_at DESC, id ASC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(videos)
    }

    /// Increments the view counter by one
    ///
    /// # Returns
    ///
    /// The new view count, or None if the video doesn't exist
    pub async fn increment_views(pool: &PgPool, id: Uuid) -> Result<Option<i64>, sqlx::Error> {
        let views: Option<i64> = sqlx::query_scalar(
            "UPDATE videos SET views = views + 1, updated_at = NOW() WHERE id = $1 RETURNING views",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(views)
    }
}
