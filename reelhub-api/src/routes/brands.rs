/// Brand endpoints
///
/// Brands are the root of the content hierarchy. This module provides
/// CRUD endpoints plus the brand-scoped video reads: the view leaderboard,
/// per-brand top videos, and the paginated video listing.
///
/// # Endpoints
///
/// - `POST /brand` - Create brand (auth)
/// - `GET /brand` - List brands
/// - `GET /brand/top` - Top brands by summed video views (cached)
/// - `GET /brand/videos/top?brand_id=` - A brand's videos by views
/// - `GET /brand/:id` - Fetch brand
/// - `PUT /brand/:id` - Partial update (auth)
/// - `DELETE /brand/:id` - Cascade delete (auth)
/// - `GET /brand/:id/videos?page=&limit=` - Paginated videos
/// - `POST /brand/:id/video` - Register uploaded video (auth)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use reelhub_shared::{
    auth::AuthUser,
    cache::keys,
    models::{
        brand::{Brand, CreateBrand, UpdateBrand},
        stats::{self, BrandViewTotal, VideoPage},
        video::{CreateVideo, Video},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create brand request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBrandRequest {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Public handle, unique, immutable after creation
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Optional marketing site URL
    #[validate(length(max = 512, message = "Website must be at most 512 characters"))]
    pub website: Option<String>,

    /// Optional brand color (hex string)
    #[validate(length(max = 32, message = "Primary color must be at most 32 characters"))]
    pub primary_color: Option<String>,

    /// Optional brand color (hex string)
    #[validate(length(max = 32, message = "Secondary color must be at most 32 characters"))]
    pub secondary_color: Option<String>,

    /// Optional thumbnail image URL
    #[validate(length(max = 512, message = "Thumbnail URL must be at most 512 characters"))]
    pub thumbnail_url: Option<String>,
}

/// Update brand request
///
/// Every field is optional; only provided fields are written. The
/// username handle is absent on purpose: it cannot change.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBrandRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 512, message = "Website must be at most 512 characters"))]
    pub website: Option<String>,

    #[validate(length(max = 32, message = "Primary color must be at most 32 characters"))]
    pub primary_color: Option<String>,

    #[validate(length(max = 32, message = "Secondary color must be at most 32 characters"))]
    pub secondary_color: Option<String>,

    #[validate(length(max = 512, message = "Thumbnail URL must be at most 512 characters"))]
    pub thumbnail_url: Option<String>,
}

/// Register video request (brand-scoped)
#[derive(Debug, Deserialize, Validate)]
pub struct UploadVideoRequest {
    /// Title shown in listings
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional longer description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Reference URL returned by object storage
    #[validate(length(min = 1, max = 512, message = "URL must be 1-512 characters"))]
    pub url: String,
}

/// Query parameters for `GET /brand/videos/top`
#[derive(Debug, Deserialize)]
pub struct TopBrandVideosQuery {
    /// Brand to rank videos for; required
    pub brand_id: Option<Uuid>,
}

/// Query parameters for `GET /brand/:id/videos`
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size (default 10, max 100)
    pub limit: Option<i64>,
}

/// List brands response
#[derive(Debug, Serialize)]
pub struct ListBrandsResponse {
    /// All brands
    pub brands: Vec<Brand>,
}

/// Top brands response
#[derive(Debug, Serialize)]
pub struct TopBrandsResponse {
    /// Brands ranked by total video views, descending
    pub brands: Vec<BrandViewTotal>,
}

/// Brand videos response (unpaginated, ranked by views)
#[derive(Debug, Serialize)]
pub struct BrandVideosResponse {
    /// Videos ranked by views, descending
    pub videos: Vec<Video>,
}

/// Delete brand response
#[derive(Debug, Serialize)]
pub struct DeleteBrandResponse {
    /// Whether the brand existed and was deleted
    pub deleted: bool,
}

/// Create a new brand
///
/// # Endpoint
///
/// ```text
/// POST /brand
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "name": "Nike",
///   "username": "nike",
///   "website": "https://nike.com",
///   "primary_color": "#111111"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `409 Conflict`: Handle already taken
pub async fn create_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateBrandRequest>,
) -> ApiResult<(StatusCode, Json<Brand>)> {
    req.validate()?;

    let brand = Brand::create(
        &state.db,
        CreateBrand {
            name: req.name,
            username: req.username,
            website: req.website,
            primary_color: req.primary_color,
            secondary_color: req.secondary_color,
            thumbnail_url: req.thumbnail_url,
        },
    )
    .await?;

    tracing::info!("User {} created brand {} ({})", auth.id, brand.username, brand.id);

    Ok((StatusCode::CREATED, Json(brand)))
}

/// List all brands
pub async fn list_brands(State(state): State<AppState>) -> ApiResult<Json<ListBrandsResponse>> {
    let brands = Brand::find_all(&state.db).await?;

    Ok(Json(ListBrandsResponse { brands }))
}

/// Fetch a single brand
///
/// # Errors
///
/// - `404 Not Found`: No brand with this id
pub async fn get_brand(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Brand>> {
    let brand = Brand::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand not found".to_string()))?;

    Ok(Json(brand))
}

/// Update a brand's presentation fields
///
/// Partial update: only provided fields change. The username handle is
/// immutable.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or no fields provided
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No brand with this id
pub async fn update_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateBrandRequest>,
) -> ApiResult<Json<Brand>> {
    req.validate()?;

    let update = UpdateBrand {
        name: req.name,
        website: req.website,
        primary_color: req.primary_color,
        secondary_color: req.secondary_color,
        thumbnail_url: req.thumbnail_url,
    };

    if update.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let brand = Brand::update(&state.db, id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Brand not found".to_string()))?;

    tracing::info!("User {} updated brand {}", auth.id, brand.id);

    Ok(Json(brand))
}

/// Delete a brand and everything beneath it
///
/// Removes the brand's communities, groups, memberships and messages in
/// one transaction. Videos under the subtree survive with their hierarchy
/// references cleared.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No brand with this id
pub async fn delete_brand(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteBrandResponse>> {
    let deleted = Brand::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }

    tracing::info!("User {} deleted brand {}", auth.id, id);

    Ok(Json(DeleteBrandResponse { deleted: true }))
}

/// Top brands by summed video views
///
/// Answers from the cache when fresh; otherwise runs the aggregation and
/// caches the result. Brands with no videos do not appear.
///
/// # Endpoint
///
/// ```text
/// GET /brand/top
/// ```
///
/// # Response
///
/// ```json
/// {
///   "brands": [
///     { "id": "uuid", "name": "Nike", "username": "nike", "total_views": 4200 }
///   ]
/// }
/// ```
pub async fn top_brands(State(state): State<AppState>) -> ApiResult<Json<TopBrandsResponse>> {
    let brands = state
        .cache
        .get_or_compute(
            keys::TOP_BRANDS_KEY,
            keys::TOP_BRANDS_TTL_SECS,
            stats::top_brands(&state.db, stats::TOP_BRANDS_LIMIT),
        )
        .await?;

    Ok(Json(TopBrandsResponse { brands }))
}

/// A brand's videos ranked by views
///
/// # Endpoint
///
/// ```text
/// GET /brand/videos/top?brand_id=<uuid>
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `brand_id` missing
/// - `404 Not Found`: No brand with this id
pub async fn top_brand_videos(
    State(state): State<AppState>,
    Query(query): Query<TopBrandVideosQuery>,
) -> ApiResult<Json<BrandVideosResponse>> {
    let brand_id = query
        .brand_id
        .ok_or_else(|| ApiError::BadRequest("brand_id query parameter is required".to_string()))?;

    if !Brand::exists(&state.db, brand_id).await? {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }

    let videos = stats::top_videos_by_brand(&state.db, brand_id).await?;

    Ok(Json(BrandVideosResponse { videos }))
}

/// One page of a brand's videos, newest first, with uploader identity
///
/// # Endpoint
///
/// ```text
/// GET /brand/:id/videos?page=1&limit=10
/// ```
///
/// # Response
///
/// ```json
/// {
///   "total_videos": 23,
///   "total_pages": 3,
///   "current_page": 1,
///   "videos": [ ... ]
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-positive page, or limit outside 1-100
/// - `404 Not Found`: No brand with this id
pub async fn list_brand_videos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<VideoPage>> {
    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(stats::DEFAULT_RECENT_LIMIT);

    if page < 1 {
        return Err(ApiError::BadRequest("page must be at least 1".to_string()));
    }
    if !(1..=100).contains(&limit) {
        return Err(ApiError::BadRequest("limit must be 1-100".to_string()));
    }

    if !Brand::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }

    let page = stats::brand_video_page(&state.db, id, page, limit).await?;

    Ok(Json(page))
}

/// Register an uploaded video under a brand
///
/// The binary already lives in object storage; this records its reference
/// URL. The uploader is the authenticated user.
///
/// # Endpoint
///
/// ```text
/// POST /brand/:id/video
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Air Max launch",
///   "url": "https://storage.example.com/v/abc123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No brand with this id
pub async fn upload_brand_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<UploadVideoRequest>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    req.validate()?;

    if !Brand::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }

    let video = Video::create(
        &state.db,
        CreateVideo {
            title: req.title,
            description: req.description,
            url: req.url,
            brand_id: Some(id),
            community_id: None,
            group_id: None,
            uploaded_by: auth.id,
        },
    )
    .await?;

    tracing::info!("User {} registered video {} under brand {}", auth.id, video.id, id);

    Ok((StatusCode::CREATED, Json(video)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_brand_request_validation() {
        // Valid request
        let valid = CreateBrandRequest {
            name: "Nike".to_string(),
            username: "nike".to_string(),
            website: Some("https://nike.com".to_string()),
            primary_color: Some("#111111".to_string()),
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(valid.validate().is_ok());

        // Empty name
        let empty_name = CreateBrandRequest {
            name: "".to_string(),
            username: "nike".to_string(),
            website: None,
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(empty_name.validate().is_err());

        // Name too long
        let long_name = CreateBrandRequest {
            name: "a".repeat(101),
            username: "nike".to_string(),
            website: None,
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(long_name.validate().is_err());

        // Username too short
        let short_username = CreateBrandRequest {
            name: "Nike".to_string(),
            username: "ab".to_string(),
            website: None,
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(short_username.validate().is_err());
    }

    #[test]
    fn test_update_brand_request_validation() {
        // No fields is still valid at this layer; the handler rejects
        // empty updates with 400
        let empty = UpdateBrandRequest {
            name: None,
            website: None,
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(empty.validate().is_ok());

        // Provided fields are still bounds-checked
        let blank_name = UpdateBrandRequest {
            name: Some("".to_string()),
            website: None,
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(blank_name.validate().is_err());

        let long_website = UpdateBrandRequest {
            name: None,
            website: Some("w".repeat(513)),
            primary_color: None,
            secondary_color: None,
            thumbnail_url: None,
        };
        assert!(long_website.validate().is_err());
    }

    #[test]
    fn test_top_brands_response_serialization() {
        let response = TopBrandsResponse {
            brands: vec![BrandViewTotal {
                id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
                name: "Nike".to_string(),
                username: "nike".to_string(),
                thumbnail_url: None,
                total_views: 1200,
            }],
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("total_views"));
        assert!(json.contains("1200"));
        assert!(json.contains("nike"));
    }
}
