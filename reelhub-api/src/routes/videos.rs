/// Video endpoints
///
/// Videos live in external object storage; the platform stores reference
/// URLs, hierarchy attachments and the view counter. This module provides
/// registration, reads, the view leaderboard, the recency feed and view
/// counting.
///
/// # Endpoints
///
/// - `POST /video` - Register video, optional hierarchy refs (auth)
/// - `GET /video` - List videos
/// - `GET /video/top` - Most viewed videos (cached)
/// - `GET /video/recent?brand_id=&limit=` - Newest videos (cached)
/// - `GET /video/:id` - Fetch video
/// - `POST /video/:id/views` - Increment view counter

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
        brand::Brand,
        community::Community,
        group::Group,
        stats,
        video::{CreateVideo, Video},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Register video request
///
/// Each hierarchy reference is optional and independently verified; a
/// video may hang off any combination of brand, community and group.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideoRequest {
    /// Title shown in listings
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    /// Optional longer description
    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Reference URL returned by object storage
    #[validate(length(min = 1, max = 512, message = "URL must be 1-512 characters"))]
    pub url: String,

    /// Optional owning brand
    pub brand_id: Option<Uuid>,

    /// Optional owning community
    pub community_id: Option<Uuid>,

    /// Optional owning group
    pub group_id: Option<Uuid>,
}

/// Query parameters for `GET /video/recent`
#[derive(Debug, Deserialize)]
pub struct RecentVideosQuery {
    /// Narrow the feed to one brand
    pub brand_id: Option<Uuid>,

    /// Trim the feed below its cached size of 10
    pub limit: Option<i64>,
}

/// List videos response
#[derive(Debug, Serialize)]
pub struct ListVideosResponse {
    /// Videos, newest first
    pub videos: Vec<Video>,
}

/// Top videos response
#[derive(Debug, Serialize)]
pub struct TopVideosResponse {
    /// Videos ranked by views, descending
    pub videos: Vec<Video>,
}

/// Recent videos response
#[derive(Debug, Serialize)]
pub struct RecentVideosResponse {
    /// Most recently registered videos
    pub videos: Vec<Video>,
}

/// View count response
#[derive(Debug, Serialize)]
pub struct ViewCountResponse {
    /// The video
    pub id: Uuid,

    /// View count after this increment
    pub views: i64,
}

/// Register a new video
///
/// Every provided hierarchy reference is resolved before the insert; a
/// dangling reference fails the whole request with 404.
///
/// # Endpoint
///
/// ```text
/// POST /video
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "title": "Air Max launch",
///   "url": "https://storage.example.com/v/abc123",
///   "brand_id": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: A referenced brand/community/group does not exist
pub async fn create_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateVideoRequest>,
) -> ApiResult<(StatusCode, Json<Video>)> {
    req.validate()?;

    if let Some(brand_id) = req.brand_id {
        if !Brand::exists(&state.db, brand_id).await? {
            return Err(ApiError::NotFound("Brand not found".to_string()));
        }
    }
    if let Some(community_id) = req.community_id {
        if !Community::exists(&state.db, community_id).await? {
            return Err(ApiError::NotFound("Community not found".to_string()));
        }
    }
    if let Some(group_id) = req.group_id {
        if !Group::exists(&state.db, group_id).await? {
            return Err(ApiError::NotFound("Group not found".to_string()));
        }
    }

    let video = Video::create(
        &state.db,
        CreateVideo {
            title: req.title,
            description: req.description,
            url: req.url,
            brand_id: req.brand_id,
            community_id: req.community_id,
            group_id: req.group_id,
            uploaded_by: auth.id,
        },
    )
    .await?;

    tracing::info!("User {} registered video {}", auth.id, video.id);

    Ok((StatusCode::CREATED, Json(video)))
}

/// List all videos
pub async fn list_videos(State(state): State<AppState>) -> ApiResult<Json<ListVideosResponse>> {
    let videos = Video::find_all(&state.db).await?;

    Ok(Json(ListVideosResponse { videos }))
}

/// Fetch a single video
///
/// # Errors
///
/// - `404 Not Found`: No video with this id
pub async fn get_video(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Video>> {
    let video = Video::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    Ok(Json(video))
}

/// Most viewed videos across the platform
///
/// Answers from the cache when fresh; otherwise queries and caches the
/// ten most viewed videos.
///
/// # Endpoint
///
/// ```text
/// GET /video/top
/// ```
pub async fn top_videos(State(state): State<AppState>) -> ApiResult<Json<TopVideosResponse>> {
    let videos = state
        .cache
        .get_or_compute(
            keys::TOP_VIDEOS_KEY,
            keys::TOP_VIDEOS_TTL_SECS,
            stats::top_videos(&state.db, stats::TOP_VIDEOS_LIMIT),
        )
        .await?;

    Ok(Json(TopVideosResponse { videos }))
}

/// Most recently registered videos, optionally narrowed to one brand
///
/// The cache stores one full-size feed per scope; a `limit` below the
/// feed size trims the cached result rather than forking a new cache
/// entry per limit.
///
/// # Endpoint
///
/// ```text
/// GET /video/recent?brand_id=<uuid>&limit=5
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Non-positive limit
pub async fn recent_videos(
    State(state): State<AppState>,
    Query(query): Query<RecentVideosQuery>,
) -> ApiResult<Json<RecentVideosResponse>> {
    let limit = query.limit.unwrap_or(stats::DEFAULT_RECENT_LIMIT);
    if limit < 1 {
        return Err(ApiError::BadRequest("limit must be at least 1".to_string()));
    }

    let key = keys::recent_videos_key(query.brand_id);
    let mut videos = state
        .cache
        .get_or_compute(
            &key,
            keys::RECENT_VIDEOS_TTL_SECS,
            stats::recent_videos(&state.db, query.brand_id, stats::DEFAULT_RECENT_LIMIT),
        )
        .await?;

    videos.truncate(limit as usize);

    Ok(Json(RecentVideosResponse { videos }))
}

/// Increment a video's view counter
///
/// Atomic in the store; concurrent increments never lose counts. Returns
/// the count after this increment.
///
/// # Endpoint
///
/// ```text
/// POST /video/:id/views
/// ```
///
/// # Response
///
/// ```json
/// { "id": "uuid", "views": 4201 }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No video with this id
pub async fn increment_views(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ViewCountResponse>> {
    let views = Video::increment_views(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Video not found".to_string()))?;

    Ok(Json(ViewCountResponse { id, views }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_video_request_validation() {
        // Valid request, no hierarchy references
        let valid = CreateVideoRequest {
            title: "Air Max launch".to_string(),
            description: Some("Behind the scenes".to_string()),
            url: "https://storage.example.com/v/abc123".to_string(),
            brand_id: None,
            community_id: None,
            group_id: None,
        };
        assert!(valid.validate().is_ok());

        // Empty title
        let empty_title = CreateVideoRequest {
            title: "".to_string(),
            description: None,
            url: "https://storage.example.com/v/abc123".to_string(),
            brand_id: None,
            community_id: None,
            group_id: None,
        };
        assert!(empty_title.validate().is_err());

        // Title too long
        let long_title = CreateVideoRequest {
            title: "a".repeat(201),
            description: None,
            url: "https://storage.example.com/v/abc123".to_string(),
            brand_id: None,
            community_id: None,
            group_id: None,
        };
        assert!(long_title.validate().is_err());

        // Empty URL
        let empty_url = CreateVideoRequest {
            title: "Air Max launch".to_string(),
            description: None,
            url: "".to_string(),
            brand_id: None,
            community_id: None,
            group_id: None,
        };
        assert!(empty_url.validate().is_err());
    }

    #[test]
    fn test_view_count_response_serialization() {
        let response = ViewCountResponse {
            id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            views: 7,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"views\":7"));
        assert!(json.contains("550e8400"));
    }
}
