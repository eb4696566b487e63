use secrecy::Secret;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;

use super::jwt::create_token;
use super::models::{ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto, User};
use super::password::{hash_password, verify_password};

/// Authentication and account management logic
pub struct AuthService;

impl AuthService {
    /// Register a new user and return an auth token
    pub async fn register(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        dto: &RegisterDto,
    ) -> Result<(String, User), AppError> {
        let taken = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(&dto.email)
            .fetch_one(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if taken > 0 {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash_password(&dto.password)?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(dto.name.trim())
        .bind(&dto.email)
        .bind(&password_hash)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let token = create_token(&user, jwt_secret)?;

        Ok((token, user))
    }

    /// Authenticate by email and password, return an auth token.
    /// Unknown email and wrong password are deliberately indistinguishable.
    pub async fn login(
        pool: &PgPool,
        jwt_secret: &Secret<String>,
        dto: &LoginDto,
    ) -> Result<(String, User), AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(&dto.email)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(&dto.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = create_token(&user, jwt_secret)?;

        Ok((token, user))
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))
    }

    /// Update the user's name and email
    pub async fn update_profile(
        pool: &PgPool,
        user_id: Uuid,
        dto: &UpdateProfileDto,
    ) -> Result<User, AppError> {
        // An email can move to this account only if no other account holds it
        let taken = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE email = $1 AND id != $2",
        )
        .bind(&dto.email)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        if taken > 0 {
            return Err(AppError::Conflict("Email already in use".to_string()));
        }

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET name = $2, email = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(dto.name.trim())
        .bind(dto.email.trim())
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// Change the user's password after verifying the current one
    pub async fn change_password(
        pool: &PgPool,
        user_id: Uuid,
        dto: &ChangePasswordDto,
    ) -> Result<(), AppError> {
        let user = Self::get_user_by_id(pool, user_id).await?;

        if !verify_password(&dto.current_password, &user.password_hash)? {
            return Err(AppError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(&dto.new_password)?;

        sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .bind(&new_hash)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok(())
    }
}
