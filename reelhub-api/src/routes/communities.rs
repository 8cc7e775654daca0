/// Community endpoints
///
/// Communities sit under a brand and carry memberships. Creating one
/// requires the parent brand to exist; deleting one removes its groups,
/// memberships and messages and detaches videos that pointed into the
/// subtree.
///
/// # Endpoints
///
/// - `POST /community` - Create community (auth)
/// - `GET /community` - List communities, optional `?brand_id=` filter
/// - `GET /community/:id` - Fetch community
/// - `DELETE /community/:id` - Cascade delete (auth)
/// - `POST /community/:id/join` - Join as member (auth)
/// - `GET /community/:id/members` - Member profiles + count

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
    models::{
        brand::Brand,
        community::{Community, CreateCommunity},
        member::{CommunityMember, MemberProfile, MemberRole},
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create community request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCommunityRequest {
    /// Parent brand; must exist
    pub brand_id: Uuid,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional thumbnail image URL
    #[validate(length(max = 512, message = "Thumbnail URL must be at most 512 characters"))]
    pub thumbnail_url: Option<String>,

    /// Optional avatar image URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

/// Query parameters for `GET /community`
#[derive(Debug, Deserialize)]
pub struct ListCommunitiesQuery {
    /// Narrow the listing to one brand
    pub brand_id: Option<Uuid>,
}

/// List communities response
#[derive(Debug, Serialize)]
pub struct ListCommunitiesResponse {
    /// Communities, newest first
    pub communities: Vec<Community>,
}

/// Members response
#[derive(Debug, Serialize)]
pub struct MembersResponse {
    /// Member rows with public user identity
    pub members: Vec<MemberProfile>,

    /// Total member count
    pub count: i64,
}

/// Delete community response
#[derive(Debug, Serialize)]
pub struct DeleteCommunityResponse {
    /// Whether the community existed and was deleted
    pub deleted: bool,
}

/// Create a new community under a brand
///
/// # Endpoint
///
/// ```text
/// POST /community
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "brand_id": "uuid",
///   "name": "Nike Fans"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Parent brand does not exist
pub async fn create_community(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateCommunityRequest>,
) -> ApiResult<(StatusCode, Json<Community>)> {
    req.validate()?;

    // Resolve the parent before writing anything
    if !Brand::exists(&state.db, req.brand_id).await? {
        return Err(ApiError::NotFound("Brand not found".to_string()));
    }

    let community = Community::create(
        &state.db,
        CreateCommunity {
            brand_id: req.brand_id,
            name: req.name,
            thumbnail_url: req.thumbnail_url,
            avatar_url: req.avatar_url,
            created_by: auth.id,
        },
    )
    .await?;

    tracing::info!(
        "User {} created community {} under brand {}",
        auth.id,
        community.id,
        community.brand_id
    );

    Ok((StatusCode::CREATED, Json(community)))
}

/// List communities, optionally narrowed to one brand
pub async fn list_communities(
    State(state): State<AppState>,
    Query(query): Query<ListCommunitiesQuery>,
) -> ApiResult<Json<ListCommunitiesResponse>> {
    let communities = match query.brand_id {
        Some(brand_id) => Community::find_by_brand(&state.db, brand_id).await?,
        None => Community::find_all(&state.db).await?,
    };

    Ok(Json(ListCommunitiesResponse { communities }))
}

/// Fetch a single community
///
/// # Errors
///
/// - `404 Not Found`: No community with this id
pub async fn get_community(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Community>> {
    let community = Community::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))?;

    Ok(Json(community))
}

/// Delete a community and everything beneath it
///
/// Removes the community's groups, memberships and messages in one
/// transaction. Videos that pointed into the subtree survive with those
/// references cleared. Sibling communities of the same brand are untouched.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No community with this id
pub async fn delete_community(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteCommunityResponse>> {
    let deleted = Community::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    tracing::info!("User {} deleted community {}", auth.id, id);

    Ok(Json(DeleteCommunityResponse { deleted: true }))
}

/// Join a community as a regular member
///
/// Membership insert is atomic: two concurrent joins for the same user
/// produce one row and one 409.
///
/// # Endpoint
///
/// ```text
/// POST /community/:id/join
/// Authorization: Bearer <token>
/// ```
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No community with this id
/// - `409 Conflict`: Already a member
pub async fn join_community(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<CommunityMember>)> {
    if !Community::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    let member = CommunityMember::join(&state.db, id, auth.id, MemberRole::Member)
        .await?
        .ok_or_else(|| ApiError::Conflict("Already a member of this community".to_string()))?;

    tracing::info!("User {} joined community {}", auth.id, id);

    Ok((StatusCode::CREATED, Json(member)))
}

/// List a community's members with their public identity
///
/// # Response
///
/// ```json
/// {
///   "members": [
///     { "user_id": "uuid", "username": "maya", "role": "member", ... }
///   ],
///   "count": 1
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: No community with this id
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MembersResponse>> {
    if !Community::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    let members = CommunityMember::list_profiles(&state.db, id).await?;
    let count = members.len() as i64;

    Ok(Json(MembersResponse { members, count }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_create_community_request_validation() {
        // Valid request
        let valid = CreateCommunityRequest {
            brand_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "Sneakerheads".to_string(),
            thumbnail_url: None,
            avatar_url: None,
        };
        assert!(valid.validate().is_ok());

        // Empty name
        let empty_name = CreateCommunityRequest {
            brand_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "".to_string(),
            thumbnail_url: None,
            avatar_url: None,
        };
        assert!(empty_name.validate().is_err());

        // Thumbnail URL too long
        let long_thumbnail = CreateCommunityRequest {
            brand_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "Sneakerheads".to_string(),
            thumbnail_url: Some("t".repeat(513)),
            avatar_url: None,
        };
        assert!(long_thumbnail.validate().is_err());
    }

    #[test]
    fn test_members_response_serialization() {
        let response = MembersResponse {
            members: vec![MemberProfile {
                user_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
                username: "maya".to_string(),
                email: "maya@example.com".to_string(),
                country: Some("CA".to_string()),
                role: MemberRole::Admin,
                joined_at: Utc::now(),
            }],
            count: 1,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"role\":\"admin\""));
        assert!(json.contains("\"count\":1"));
        assert!(json.contains("maya"));
    }
}
