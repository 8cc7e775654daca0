/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Registration
/// - Login
///
/// Both answer with the user profile and a signed bearer token. Both sit
/// behind the per-IP rate limit configured for `/auth/*`.
///
/// # Endpoints
///
/// - `POST /auth/register` - Register new user
/// - `POST /auth/login` - Login and get a token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{extract::State, http::StatusCode, Json};
use reelhub_shared::{
    auth::{jwt, password},
    models::user::{CreateUser, Gender, User},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Public handle, unique
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Email address, unique, used for login
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Phone number, unique
    #[validate(length(min = 7, max = 32, message = "Phone number must be 7-32 characters"))]
    pub phone: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional age
    #[validate(range(min = 13, max = 120, message = "Age must be between 13 and 120"))]
    pub age: Option<i32>,

    /// Optional self-reported gender
    pub gender: Option<Gender>,

    /// Optional avatar URL
    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    /// Optional country
    #[validate(length(max = 100, message = "Country must be at most 100 characters"))]
    pub country: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Authentication response
///
/// The password hash is skipped when the user serializes.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// The authenticated user
    pub user: User,

    /// Signed bearer token
    pub token: String,
}

/// Register a new user
///
/// Creates a new user account and signs them in.
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "username": "maya",
///   "email": "maya@example.com",
///   "phone": "+15550100",
///   "password": "SecureP@ss123",
///   "country": "CA"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": "uuid", "username": "maya", ... },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Username, email or phone already registered
/// - `429 Too Many Requests`: Rate limit exceeded
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;

    // Validate password strength
    password::validate_password_strength(&req.password).map_err(|e| {
        ApiError::ValidationError(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message: e,
        }])
    })?;

    // Hash password
    let password_hash = password::hash_password(&req.password)?;

    // Create user; duplicate username/email/phone surfaces as 409
    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            phone: req.phone,
            password_hash,
            age: req.age,
            gender: req.gender,
            avatar_url: req.avatar_url,
            country: req.country,
        },
    )
    .await?;

    // Sign the user in right away
    let claims = jwt::Claims::new(user.id, state.config.jwt.expiry_hours);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!("Registered user {} ({})", user.username, user.id);

    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// Login endpoint
///
/// Authenticates a user and returns a bearer token.
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "maya@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "user": { "id": "uuid", "username": "maya", ... },
///   "token": "eyJ..."
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `429 Too Many Requests`: Rate limit exceeded
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    // Find user by email; the error never says which half was wrong
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".to_string()))?;

    // Verify password
    let valid = password::verify_password(&req.password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let claims = jwt::Claims::new(user.id, state.config.jwt.expiry_hours);
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    tracing::info!("User {} logged in", user.id);

    Ok(Json(AuthResponse { user, token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_register_request_validation() {
        // Valid request
        let valid = RegisterRequest {
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            phone: "+15550100".to_string(),
            password: "SecureP@ss123".to_string(),
            age: Some(25),
            gender: None,
            avatar_url: None,
            country: Some("CA".to_string()),
        };
        assert!(valid.validate().is_ok());

        // Username too short
        let short_username = RegisterRequest {
            username: "ab".to_string(),
            email: "maya@example.com".to_string(),
            phone: "+15550100".to_string(),
            password: "SecureP@ss123".to_string(),
            age: None,
            gender: None,
            avatar_url: None,
            country: None,
        };
        assert!(short_username.validate().is_err());

        // Malformed email
        let bad_email = RegisterRequest {
            username: "maya".to_string(),
            email: "not-an-email".to_string(),
            phone: "+15550100".to_string(),
            password: "SecureP@ss123".to_string(),
            age: None,
            gender: None,
            avatar_url: None,
            country: None,
        };
        assert!(bad_email.validate().is_err());

        // Phone too short
        let bad_phone = RegisterRequest {
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            phone: "123".to_string(),
            password: "SecureP@ss123".to_string(),
            age: None,
            gender: None,
            avatar_url: None,
            country: None,
        };
        assert!(bad_phone.validate().is_err());

        // Age below minimum
        let too_young = RegisterRequest {
            username: "maya".to_string(),
            email: "maya@example.com".to_string(),
            phone: "+15550100".to_string(),
            password: "SecureP@ss123".to_string(),
            age: Some(12),
            gender: None,
            avatar_url: None,
            country: None,
        };
        assert!(too_young.validate().is_err());
    }

    #[test]
    fn test_login_request_validation() {
        let valid = LoginRequest {
            email: "maya@example.com".to_string(),
            password: "SecureP@ss123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = LoginRequest {
            email: "nope".to_string(),
            password: "SecureP@ss123".to_string(),
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_auth_response_hides_password_hash() {
        let response = AuthResponse {
            user: User {
                id: Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap(),
                username: "maya".to_string(),
                email: "maya@example.com".to_string(),
                phone: "+15550100".to_string(),
                password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".to_string(),
                age: Some(25),
                gender: None,
                avatar_url: None,
                country: Some("CA".to_string()),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            token: "eyJhbGciOiJIUzI1NiJ9.test.token".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("token"));
        assert!(json.contains("maya"));
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$argon2id"));
    }
}
