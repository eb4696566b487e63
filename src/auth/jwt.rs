use actix_web::HttpRequest;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};

use crate::errors::AppError;

use super::models::{TokenClaims, User};

/// Access tokens live for a week; the mobile client re-authenticates
/// when one expires.
pub const TOKEN_EXPIRY_DAYS: i64 = 7;

/// Create a signed JWT access token for a user
pub fn create_token(user: &User, jwt_secret: &Secret<String>) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::days(TOKEN_EXPIRY_DAYS);

    let claims = TokenClaims {
        sub: user.id,
        email: user.email.clone(),
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("Failed to create token: {e}")))
}

/// Decode and validate a JWT access token
pub fn decode_token(token: &str, jwt_secret: &Secret<String>) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {e}")))
}

/// Extract the bearer token from the Authorization header
pub fn extract_token(req: &HttpRequest) -> Result<String, AppError> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string())
        .ok_or_else(|| {
            AppError::Unauthorized("Missing or invalid Authorization header".to_string())
        })
}
