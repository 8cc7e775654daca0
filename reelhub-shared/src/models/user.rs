/// User model and database operations
///
/// This module provides the User model and the operations the registration
/// and login paths need. Users join communities and groups via the
/// membership models and own the videos they upload.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_gender AS ENUM ('male', 'female', 'other');
///
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     username VARCHAR(50) NOT NULL UNIQUE,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     phone VARCHAR(32) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     age INTEGER,
///     gender user_gender,
///     avatar_url VARCHAR(512),
///     country VARCHAR(100),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use reelhub_shared::models::user::{User, CreateUser};
/// use reelhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// }).await?;
///
/// let user = User::create(&pool, CreateUser {
///     username: "maya".to_string(),
///     email: "maya@example.com".to_string(),
///     phone: "+15550100".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     age: None,
///     gender: None,
///     avatar_url: None,
///     country: Some("CA".to_string()),
/// }).await?;
/// println!("Created user: {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Self-reported gender on a user profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Converts gender to string for display
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }
}

/// User model representing a registered account
///
/// Passwords are stored as Argon2id hashes, never in plaintext, and the
/// hash never leaves the server: it is skipped on serialization.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Public handle
    ///
    /// Must be unique across all users
    pub username: String,

    /// Email address, unique, used for login
    pub email: String,

    /// Phone number, unique
    pub phone: String,

    /// Argon2id password hash
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Optional age
    pub age: Option<i32>,

    /// Optional self-reported gender
    pub gender: Option<Gender>,

    /// Optional avatar/profile picture URL
    pub avatar_url: Option<String>,

    /// Optional country code or name
    pub country: Option<String>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new user
///
/// Username, email, phone and password_hash are required; profile fields
/// are optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub phone: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub avatar_url: Option<String>,
    pub country: Option<String>,
}

impl User {
    /// Creates a new user in the database
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `data` - User creation data
    ///
    /// # Returns
    ///
    /// The newly created user with generated ID and timestamps
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Username, email or phone already exists (unique constraint violation)
    /// - Database connection fails
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, phone, password_hash, age, gender, avatar_url, country)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, username, email, phone, password_hash, age, gender, avatar_url, country,
                      created_at, updated_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.phone)
        .bind(data.password_hash)
        .bind(data.age)
        .bind(data.gender)
        .bind(data.avatar_url)
        .bind(data.country)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, password_hash, age, gender, avatar_url, country,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by email (login lookup)
    ///
    /// # Returns
    ///
    /// The user if found, None otherwise
    ///
    /// # Errors
    ///
    /// Returns an error if the database connection fails
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, phone, password_hash, age, gender, avatar_url, country,
                   created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_as_str() {
        assert_eq!(Gender::Male.as_str(), "male");
        assert_eq!(Gender::Female.as_str(), "female");
        assert_eq!(Gender::Other.as_str(), "other");
    }

    #[test]
    fn test_gender_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Other).unwrap(), "\"other\"");
        let parsed: Gender = serde_json::from_str("\"female\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            phone: "+15550100".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            age: Some(29),
            gender: Some(Gender::Female),
            avatar_url: None,
            country: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "maya");
    }

    // Integration tests for database operations are in the tests/ directory
}
