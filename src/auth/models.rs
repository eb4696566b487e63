use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for user registration
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterDto {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Email address
    #[validate(email)]
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Password (min 6 characters)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[schema(example = "hunter22")]
    pub password: String,
}

/// Request body for user login
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginDto {
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Password
    #[schema(example = "hunter22")]
    pub password: String,
}

/// Request body for profile updates
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileDto {
    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Email address
    #[validate(email)]
    #[schema(example = "jane@example.com")]
    pub email: String,
}

/// Request body for changing the password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    /// The password currently in use
    pub current_password: String,
    /// The new password (min 6 characters)
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

/// User information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Unique user identifier
    pub id: Uuid,
    /// Display name
    #[schema(example = "Jane Doe")]
    pub name: String,
    /// Email address
    #[schema(example = "jane@example.com")]
    pub email: String,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}

/// JWT claims carried by the access token
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub sub: Uuid,
    /// User email
    pub email: String,
    /// Issued at
    pub iat: usize,
    /// Expiration
    pub exp: usize,
}

/// Response containing the access token and the user
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// JWT bearer token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// User information
    pub user: UserResponse,
}

impl AuthResponse {
    pub fn new(token: String, user: &User) -> Self {
        Self {
            token,
            user: UserResponse::from_user(user),
        }
    }
}
