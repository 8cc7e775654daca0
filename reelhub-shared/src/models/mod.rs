/// Database models for ReelHub
///
/// This module contains all database models and their operations, one file
/// per entity plus the cross-entity aggregation queries.
///
/// # Models
///
/// - `user`: registered accounts
/// - `brand`: hierarchy roots (brand → community → group)
/// - `community`: brand-owned communities
/// - `group`: community-owned groups
/// - `member`: community/group memberships with roles
/// - `video`: uploaded videos and their view counters
/// - `message`: group chat messages
/// - `stats`: top/recent aggregations and the paginated brand video feed
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
///     website: None,
///     primary_color: None,
///     secondary_color: None,
///     thumbnail_url: None,
/// }).await?;
///
/// let found = Brand::find_by_id(&pool, brand.id).await?;
/// # Ok(())
/// # }
/// ```

pub mod brand;
pub mod community;
pub mod group;
pub mod member;
pub mod message;
pub mod stats;
pub mod user;
pub mod video;
