/// Aggregation queries over brands, videos and groups
///
/// Pure reads, no mutation: leaderboards ("top"), recency feeds ("recent")
/// and the paginated per-brand video listing. Every ordering carries the
/// entity id ascending as a secondary key so equal view counts or equal
/// timestamps still produce a stable, non-overlapping order across calls.
///
/// These are the computations the cache-aside layer sits in front of; the
/// functions themselves know nothing about caching.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::group::Group;
use crate::models::video::Video;

/// How many brands the leaderboard shows
pub const TOP_BRANDS_LIMIT: i64 = 5;

/// How many videos the global leaderboard shows
pub const TOP_VIDEOS_LIMIT: i64 = 10;

/// Default size of "recent" feeds
pub const DEFAULT_RECENT_LIMIT: i64 = 10;

/// A brand with its total video views, one leaderboard row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BrandViewTotal {
    pub id: Uuid,
    pub name: String,
    pub username: String,
    pub thumbnail_url: Option<String>,

    /// Sum of views across every video attached to the brand
    pub total_views: i64,
}

/// A video row annotated with its uploader's public identity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VideoWithUploader {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub views: i64,
    pub brand_id: Option<Uuid>,
    pub community_id: Option<Uuid>,
    pub group_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub uploader_id: Uuid,
    pub uploader_username: String,
    pub uploader_email: String,
}

/// One page of a brand's videos
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoPage {
    pub total_videos: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub videos: Vec<VideoWithUploader>,
}

/// Number of pages needed for `total` rows at `limit` per page
///
/// `limit` must be positive; callers validate it at the boundary.
pub fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

/// Top brands by summed video views, descending
///
/// Brands with no videos have nothing to sum and are excluded by the inner
/// join rather than shown with zero.
pub async fn top_brands(pool: &PgPool, limit: i64) -> Result<Vec<BrandViewTotal>, sqlx::Error> {
    let brands = sqlx::query_as::<_, BrandViewTotal>(
        r#"
        SELECT b.id, b.name, b.username, b.thumbnail_url,
               SUM(v.views)::BIGINT AS total_views
        FROM brands b
        JOIN videos v ON v.brand_id = b.id
        GROUP BY b.id
        ORDER BY total_views DESC, b.id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(brands)
}

/// Most viewed videos across the whole platform
pub async fn top_videos(pool: &PgPool, limit: i64) -> Result<Vec<Video>, sqlx::Error> {
    let videos = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, title, description, url, views, brand_id, community_id, group_id,
               uploaded_by, created_at, updated_at
        FROM videos
        ORDER BY views DESC, id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(videos)
}

/// All of a brand's videos ordered by views, descending, no limit
pub async fn top_videos_by_brand(pool: &PgPool, brand_id: Uuid) -> Result<Vec<Video>, sqlx::Error> {
    let videos = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, title, description, url, views, brand_id, community_id, group_id,
               uploaded_by, created_at, updated_at
        FROM videos
        WHERE brand_id = $1
        ORDER BY views DESC, id ASC
        "#,
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;

    Ok(videos)
}

/// Most recently created videos, optionally narrowed to one brand
pub async fn recent_videos(
    pool: &PgPool,
    brand_id: Option<Uuid>,
    limit: i64,
) -> Result<Vec<Video>, sqlx::Error> {
    let videos = sqlx::query_as::<_, Video>(
        r#"
        SELECT id, title, description, url, views, brand_id, community_id, group_id,
               uploaded_by, created_at, updated_at
        FROM videos
        WHERE ($1::uuid IS NULL OR brand_id = $1)
        ORDER BY created_at DESC, id ASC
        LIMIT $2
        "#,
    )
    .bind(brand_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(videos)
}

/// Most recently created groups
pub async fn recent_groups(pool: &PgPool, limit: i64) -> Result<Vec<Group>, sqlx::Error> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, community_id, name, avatar_url, created_by, created_at, updated_at
        FROM groups
        ORDER BY created_at DESC, id ASC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(groups)
}

/// One page of a brand's videos, newest first, uploader identity attached
///
/// `page` is 1-based; `offset = (page - 1) * limit`. An out-of-range page
/// returns an empty `videos` list with the real totals so clients can
/// correct themselves.
pub async fn brand_video_page(
    pool: &PgPool,
    brand_id: Uuid,
    page: i64,
    limit: i64,
) -> Result<VideoPage, sqlx::Error> {
    let (total_videos,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM videos WHERE brand_id = $1")
            .bind(brand_id)
            .fetch_one(pool)
            .await?;

    let offset = (page - 1) * limit;

    let videos = sqlx::query_as::<_, VideoWithUploader>(
        r#"
        SELECT v.id, v.title, v.description, v.url, v.views,
               v.brand_id, v.community_id, v.group_id, v.created_at, v.updated_at,
               u.id AS uploader_id, u.username AS uploader_username, u.email AS uploader_email
        FROM videos v
        JOIN users u ON u.id = v.uploaded_by
        WHERE v.brand_id = $1
        ORDER BY v.created_at DESC, v.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(brand_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(VideoPage {
        total_videos,
        total_pages: page_count(total_videos, limit),
        current_page: page,
        videos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(99, 10), 10);
        assert_eq!(page_count(100, 10), 10);
    }

    #[test]
    fn test_page_count_limit_one() {
        assert_eq!(page_count(7, 1), 7);
    }

    // Monotonicity and pagination completeness are covered by
    // tests/stats_tests.rs against a live database
}
