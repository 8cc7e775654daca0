/// Group endpoints
///
/// Groups sit under a community and carry memberships and a message feed.
/// Creating a group also makes its creator an admin member, atomically.
///
/// # Endpoints
///
/// - `POST /group` - Create group + creator admin membership (auth)
/// - `GET /group` - List groups
/// - `GET /group/recent` - Most recently created groups (cached)
/// - `GET /group/:id` - Fetch group with live video count
/// - `DELETE /group/:id` - Cascade delete (auth)
/// - `POST /group/:id/join` - Join as member (auth)
/// - `GET /group/:id/members` - Member profiles + count
/// - `POST /group/:id/messages` - Post message (auth)
/// - `GET /group/:id/messages` - Recent messages with author username

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
        community::Community,
        group::{CreateGroup, Group},
        member::{GroupMember, MemberProfile, MemberRole},
        message::{Message, MessageWithAuthor},
        stats,
    },
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Default number of messages returned by the feed
const DEFAULT_MESSAGE_LIMIT: i64 = 50;

/// Create group request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateGroupRequest {
    /// Parent community; must exist
    pub community_id: Uuid,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    /// Optional avatar image URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,
}

/// Post message request
#[derive(Debug, Deserialize, Validate)]
pub struct PostMessageRequest {
    /// Message body
    #[validate(length(min = 1, max = 2000, message = "Content must be 1-2000 characters"))]
    pub content: String,
}

/// Query parameters for `GET /group/:id/messages`
#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    /// Maximum messages to return (default 50, max 200)
    pub limit: Option<i64>,
}

/// List groups response
#[derive(Debug, Serialize)]
pub struct ListGroupsResponse {
    /// Groups, newest first
    pub groups: Vec<Group>,
}

/// Recent groups response
#[derive(Debug, Serialize)]
pub struct RecentGroupsResponse {
    /// Most recently created groups
    pub groups: Vec<Group>,
}

/// A group with its live video count
///
/// The count is computed from the videos table on read rather than kept
/// as a stored counter that could drift.
#[derive(Debug, Serialize)]
pub struct GroupDetail {
    /// The group
    #[serde(flatten)]
    pub group: Group,

    /// Videos currently attached to this group
    pub video_count: i64,
}

/// Members response
#[derive(Debug, Serialize)]
pub struct MembersResponse {
    /// Member rows with public user identity
    pub members: Vec<MemberProfile>,

    /// Total member count
    pub count: i64,
}

/// Messages response
#[derive(Debug, Serialize)]
pub struct MessagesResponse {
    /// Messages, newest first, with author usernames
    pub messages: Vec<MessageWithAuthor>,
}

/// Delete group response
#[derive(Debug, Serialize)]
pub struct DeleteGroupResponse {
    /// Whether the group existed and was deleted
    pub deleted: bool,
}

/// Create a new group under a community
///
/// The creator becomes an admin member in the same transaction; a group
/// is never visible without its first member.
///
/// # Endpoint
///
/// ```text
/// POST /group
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// {
///   "community_id": "uuid",
///   "name": "Launch Week"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: Parent community does not exist
pub async fn create_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateGroupRequest>,
) -> ApiResult<(StatusCode, Json<Group>)> {
    req.validate()?;

    // Resolve the parent before writing anything
    if !Community::exists(&state.db, req.community_id).await? {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    let group = Group::create_with_owner(
        &state.db,
        CreateGroup {
            community_id: req.community_id,
            name: req.name,
            avatar_url: req.avatar_url,
            created_by: auth.id,
        },
    )
    .await?;

    tracing::info!(
        "User {} created group {} under community {}",
        auth.id,
        group.id,
        group.community_id
    );

    Ok((StatusCode::CREATED, Json(group)))
}

/// List all groups
pub async fn list_groups(State(state): State<AppState>) -> ApiResult<Json<ListGroupsResponse>> {
    let groups = Group::find_all(&state.db).await?;

    Ok(Json(ListGroupsResponse { groups }))
}

/// Most recently created groups
///
/// Answers from the cache when fresh; otherwise queries and caches the
/// newest ten groups.
///
/// # Endpoint
///
/// ```text
/// GET /group/recent
/// ```
pub async fn recent_groups(State(state): State<AppState>) -> ApiResult<Json<RecentGroupsResponse>> {
    let groups = state
        .cache
        .get_or_compute(
            keys::RECENT_GROUPS_KEY,
            keys::RECENT_GROUPS_TTL_SECS,
            stats::recent_groups(&state.db, stats::DEFAULT_RECENT_LIMIT),
        )
        .await?;

    Ok(Json(RecentGroupsResponse { groups }))
}

/// Fetch a single group with its live video count
///
/// # Errors
///
/// - `404 Not Found`: No group with this id
pub async fn get_group(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GroupDetail>> {
    let group = Group::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))?;

    let video_count = Group::video_count(&state.db, id).await?;

    Ok(Json(GroupDetail { group, video_count }))
}

/// Delete a group and everything beneath it
///
/// Removes the group's memberships and messages in one transaction and
/// clears the group reference on its videos. The parent community and
/// its other groups are untouched.
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No group with this id
pub async fn delete_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteGroupResponse>> {
    let deleted = Group::delete(&state.db, id).await?;

    if !deleted {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    tracing::info!("User {} deleted group {}", auth.id, id);

    Ok(Json(DeleteGroupResponse { deleted: true }))
}

/// Join a group as a regular member
///
/// # Errors
///
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No group with this id
/// - `409 Conflict`: Already a member
pub async fn join_group(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<GroupMember>)> {
    if !Group::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    let member = GroupMember::join(&state.db, id, auth.id, MemberRole::Member)
        .await?
        .ok_or_else(|| ApiError::Conflict("Already a member of this group".to_string()))?;

    tracing::info!("User {} joined group {}", auth.id, id);

    Ok((StatusCode::CREATED, Json(member)))
}

/// List a group's members with their public identity
///
/// # Errors
///
/// - `404 Not Found`: No group with this id
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MembersResponse>> {
    if !Group::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    let members = GroupMember::list_profiles(&state.db, id).await?;
    let count = members.len() as i64;

    Ok(Json(MembersResponse { members, count }))
}

/// Post a message to a group
///
/// # Endpoint
///
/// ```text
/// POST /group/:id/messages
/// Authorization: Bearer <token>
/// Content-Type: application/json
///
/// { "content": "Launch moved to Friday" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Missing or invalid token
/// - `404 Not Found`: No group with this id
pub async fn post_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(req): Json<PostMessageRequest>,
) -> ApiResult<(StatusCode, Json<Message>)> {
    req.validate()?;

    if !Group::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    let message = Message::create(&state.db, id, auth.id, req.content).await?;

    Ok((StatusCode::CREATED, Json(message)))
}

/// List a group's messages, newest first, with author usernames
///
/// # Errors
///
/// - `400 Bad Request`: Limit outside 1-200
/// - `404 Not Found`: No group with this id
pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<MessagesQuery>,
) -> ApiResult<Json<MessagesResponse>> {
    let limit = query.limit.unwrap_or(DEFAULT_MESSAGE_LIMIT);
    if !(1..=200).contains(&limit) {
        return Err(ApiError::BadRequest("limit must be 1-200".to_string()));
    }

    if !Group::exists(&state.db, id).await? {
        return Err(ApiError::NotFound("Group not found".to_string()));
    }

    let messages = Message::list_for_group(&state.db, id, limit).await?;

    Ok(Json(MessagesResponse { messages }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_create_group_request_validation() {
        // Valid request
        let valid = CreateGroupRequest {
            community_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "Launch Week".to_string(),
            avatar_url: None,
        };
        assert!(valid.validate().is_ok());

        // Empty name
        let empty_name = CreateGroupRequest {
            community_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "".to_string(),
            avatar_url: None,
        };
        assert!(empty_name.validate().is_err());

        // Name too long
        let long_name = CreateGroupRequest {
            community_id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
            name: "a".repeat(101),
            avatar_url: None,
        };
        assert!(long_name.validate().is_err());
    }

    #[test]
    fn test_post_message_request_validation() {
        let valid = PostMessageRequest {
            content: "Launch moved to Friday".to_string(),
        };
        assert!(valid.validate().is_ok());

        // Empty content
        let empty = PostMessageRequest {
            content: "".to_string(),
        };
        assert!(empty.validate().is_err());

        // Content too long
        let long = PostMessageRequest {
            content: "a".repeat(2001),
        };
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_group_detail_serialization_flattens_group() {
        let detail = GroupDetail {
            group: Group {
                id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
                community_id: Uuid::parse_str("650e8400-e29b-41d4-a716-446655440000").unwrap(),
                name: "Launch Week".to_string(),
                avatar_url: None,
                created_by: Uuid::parse_str("750e8400-e29b-41d4-a716-446655440000").unwrap(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            video_count: 3,
        };

        let json = serde_json::to_string(&detail).unwrap();
        assert!(json.contains("\"video_count\":3"));
        assert!(json.contains("community_id"));
        // Group fields sit at the top level, not under a "group" key
        assert!(!json.contains("\"group\""));
    }
}
