/// Membership models and database operations
///
/// Users attach to communities and groups through membership rows carrying
/// a role. The composite primary key (target, user) is the uniqueness
/// guarantee: joining is a single `INSERT ... ON CONFLICT DO NOTHING
/// RETURNING`, so two racing joins for the same pair can never both
/// succeed; the loser simply gets no row back and is reported as already
/// a member. There is no separate existence check to race against.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE member_role AS ENUM ('admin', 'member');
///
/// CREATE TABLE community_members (
///     community_id UUID NOT NULL REFERENCES communities(id),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role member_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (community_id, user_id)
/// );
/// -- group_members is identical with group_id in place of community_id
/// ```
///
/// # Example
///
/// ```no_run
/// use reelhub_shared::models::member::{CommunityMember, MemberRole};
/// use sqlx::PgPool;
/// use uuid::Uuid;
///
/// # async fn example(pool: PgPool, community_id: Uuid, user_id: Uuid) -> Result<(), sqlx::Error> {
/// match CommunityMember::join(&pool, community_id, user_id, MemberRole::Member).await? {
///     Some(member) => println!("joined as {}", member.role.as_str()),
///     None => println!("already a member"),
/// }
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Role a user holds within a community or group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "member_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    /// Can manage the community/group
    Admin,

    /// Regular participant
    Member,
}

impl MemberRole {
    /// Converts role to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Member => "member",
        }
    }
}

impl Default for MemberRole {
    fn default() -> Self {
        MemberRole::Member
    }
}

/// Membership of a user in a community
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommunityMember {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// Membership of a user in a group
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct GroupMember {
    pub group_id: Uuid,
    pub user_id: Uuid,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

/// A member row joined with the user's public identity
///
/// This is what member listings return. The password hash is never part of
/// the projection.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MemberProfile {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub country: Option<String>,
    pub role: MemberRole,
    pub joined_at: DateTime<Utc>,
}

impl CommunityMember {
    /// Adds a user to a community, atomically
    ///
    /// # Returns
    ///
    /// The new membership, or None if the user was already a member (the
    /// conflict with the composite key swallows the insert)
    ///
    /// # Errors
    ///
    /// Returns an error if the community vanished underneath the call
    /// (foreign key violation) or the database connection fails
    pub async fn join(
        pool: &PgPool,
        community_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, CommunityMember>(
            r#"
            INSERT INTO community_members (community_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (community_id, user_id) DO NOTHING
            RETURNING community_id, user_id, role, joined_at
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership
    pub async fn find(
        pool: &PgPool,
        community_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, CommunityMember>(
            r#"
            SELECT community_id, user_id, role, joined_at
            FROM community_members
            WHERE community_id = $1 AND user_id = $2
            "#,
        )
        .bind(community_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Lists a community's members with their public user identity
    pub async fn list_profiles(
        pool: &PgPool,
        community_id: Uuid,
    ) -> Result<Vec<MemberProfile>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT m.user_id, u.username, u.email, u.country, m.role, m.joined_at
            FROM community_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.community_id = $1
            ORDER BY m.joined_at ASC, m.user_id ASC
            "#,
        )
        .bind(community_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Counts members of a community
    pub async fn count(pool: &PgPool, community_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM community_members WHERE community_id = $1")
                .bind(community_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

impl GroupMember {
    /// Adds a user to a group, atomically
    ///
    /// # Returns
    ///
    /// The new membership, or None if the user was already a member
    pub async fn join(
        pool: &PgPool,
        group_id: Uuid,
        user_id: Uuid,
        role: MemberRole,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            INSERT INTO group_members (group_id, user_id, role)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id, user_id) DO NOTHING
            RETURNING group_id, user_id, role, joined_at
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .bind(role)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Finds a specific membership
    pub async fn find(
        pool: &PgPool,
        group_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let member = sqlx::query_as::<_, GroupMember>(
            r#"
            SELECT group_id, user_id, role, joined_at
            FROM group_members
            WHERE group_id = $1 AND user_id = $2
            "#,
        )
        .bind(group_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(member)
    }

    /// Lists a group's members with their public user identity
    pub async fn list_profiles(
        pool: &PgPool,
        group_id: Uuid,
    ) -> Result<Vec<MemberProfile>, sqlx::Error> {
        let members = sqlx::query_as::<_, MemberProfile>(
            r#"
            SELECT m.user_id, u.username, u.email, u.country, m.role, m.joined_at
            FROM group_members m
            JOIN users u ON u.id = m.user_id
            WHERE m.group_id = $1
            ORDER BY m.joined_at ASC, m.user_id ASC
            "#,
        )
        .bind(group_id)
        .fetch_all(pool)
        .await?;

        Ok(members)
    }

    /// Counts members of a group
    pub async fn count(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM group_members WHERE group_id = $1")
                .bind(group_id)
                .fetch_one(pool)
                .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_role_as_str() {
        assert_eq!(MemberRole::Admin.as_str(), "admin");
        assert_eq!(MemberRole::Member.as_str(), "member");
    }

    #[test]
    fn test_member_role_default() {
        assert_eq!(MemberRole::default(), MemberRole::Member);
    }

    #[test]
    fn test_member_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&MemberRole::Admin).unwrap(), "\"admin\"");
        let parsed: MemberRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(parsed, MemberRole::Member);
    }

    // The duplicate-join race is covered by tests/membership_tests.rs
}
