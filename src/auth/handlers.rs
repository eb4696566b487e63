use actix_web::{get, post, put, web, HttpResponse};
use secrecy::Secret;
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    AuthResponse, ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto, UserResponse,
};
use super::service::AuthService;

/// POST /auth/register - Register a new user
#[utoipa::path(
    post,
    path = "/auth/register",
    tag = "Auth",
    request_body = RegisterDto,
    responses(
        (status = 201, description = "User created", body = AuthResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already exists", body = ErrorResponse)
    )
)]
#[post("/auth/register")]
pub async fn register(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    body: web::Json<RegisterDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let (token, user) = AuthService::register(pool.get_ref(), jwt_secret.get_ref(), &body).await?;

    Ok(HttpResponse::Created().json(AuthResponse::new(token, &user)))
}

/// POST /auth/login - Authenticate and get a token
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "Auth",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Authenticated", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[post("/auth/login")]
pub async fn login(
    pool: web::Data<PgPool>,
    jwt_secret: web::Data<Secret<String>>,
    body: web::Json<LoginDto>,
) -> Result<HttpResponse, AppError> {
    let (token, user) = AuthService::login(pool.get_ref(), jwt_secret.get_ref(), &body).await?;

    Ok(HttpResponse::Ok().json(AuthResponse::new(token, &user)))
}

/// GET /auth/profile - Get the current user
#[utoipa::path(
    get,
    path = "/auth/profile",
    tag = "Auth",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/auth/profile")]
pub async fn profile(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = AuthService::get_user_by_id(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from_user(&user)))
}

/// PUT /auth/profile - Update name and email
#[utoipa::path(
    put,
    path = "/auth/profile",
    tag = "Auth",
    request_body = UpdateProfileDto,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 409, description = "Email already in use", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/auth/profile")]
pub async fn update_profile(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<UpdateProfileDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let user = AuthService::update_profile(pool.get_ref(), auth.user_id, &body).await?;

    Ok(HttpResponse::Ok().json(UserResponse::from_user(&user)))
}

/// PUT /auth/change-password - Change the current user's password
#[utoipa::path(
    put,
    path = "/auth/change-password",
    tag = "Auth",
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[put("/auth/change-password")]
pub async fn change_password(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<ChangePasswordDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    AuthService::change_password(pool.get_ref(), auth.user_id, &body).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password changed successfully"
    })))
}
