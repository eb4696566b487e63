use actix_web::{delete, get, patch, post, web, HttpResponse};
use sqlx::PgPool;
use validator::Validate;

use crate::errors::{AppError, ErrorResponse};
use crate::extractors::AuthenticatedUser;

use super::models::{
    CategoryPath, CreateTransactionDto, DeleteResponse, PageInfo, PaginatedTransactionResponse,
    StatsQuery, TransactionIdPath, TransactionListQuery, TransactionResponse, TransactionStats,
    UpdateTransactionDto,
};
use super::service::TransactionService;

/// GET /transactions - List transactions with optional filters, newest first
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Transactions",
    params(TransactionListQuery),
    responses(
        (status = 200, description = "Paginated list of transactions", body = PaginatedTransactionResponse),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions")]
pub async fn list_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<TransactionListQuery>,
) -> Result<HttpResponse, AppError> {
    let (transactions, total) =
        TransactionService::list(pool.get_ref(), auth.user_id, &query).await?;

    let (page, limit) = query.clamped();
    let data: Vec<TransactionResponse> = transactions.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(PaginatedTransactionResponse {
        data,
        pagination: PageInfo::new(total, page, limit),
    }))
}

/// GET /transactions/stats - Aggregate summary with per-category breakdown
#[utoipa::path(
    get,
    path = "/transactions/stats",
    tag = "Transactions",
    params(StatsQuery),
    responses(
        (status = 200, description = "Aggregate statistics", body = TransactionStats),
        (status = 400, description = "Malformed filter", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/stats")]
pub async fn get_stats(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    query: web::Query<StatsQuery>,
) -> Result<HttpResponse, AppError> {
    let stats = TransactionService::stats(pool.get_ref(), auth.user_id, &query).await?;

    Ok(HttpResponse::Ok().json(stats))
}

/// GET /transactions/categories - Distinct category labels for autocomplete
#[utoipa::path(
    get,
    path = "/transactions/categories",
    tag = "Transactions",
    responses(
        (status = 200, description = "Sorted list of category labels", body = Vec<String>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/categories")]
pub async fn list_categories(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let categories = TransactionService::categories(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(categories))
}

/// GET /transactions/{id} - Get a specific transaction by ID
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 200, description = "Transaction details", body = TransactionResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[get("/transactions/{id}")]
pub async fn get_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    let transaction = TransactionService::get(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// POST /transactions - Create a new transaction
#[utoipa::path(
    post,
    path = "/transactions",
    tag = "Transactions",
    request_body = CreateTransactionDto,
    responses(
        (status = 201, description = "Transaction created", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[post("/transactions")]
pub async fn create_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    body: web::Json<CreateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let transaction =
        TransactionService::create(pool.get_ref(), auth.user_id, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(TransactionResponse::from(transaction)))
}

/// PATCH /transactions/{id} - Update fields of a transaction
#[utoipa::path(
    patch,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    request_body = UpdateTransactionDto,
    responses(
        (status = 200, description = "Transaction updated", body = TransactionResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[patch("/transactions/{id}")]
pub async fn update_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
    body: web::Json<UpdateTransactionDto>,
) -> Result<HttpResponse, AppError> {
    body.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;
    body.validate_patch()?;

    let transaction =
        TransactionService::update(pool.get_ref(), auth.user_id, path.id, body.into_inner())
            .await?;

    Ok(HttpResponse::Ok().json(TransactionResponse::from(transaction)))
}

/// DELETE /transactions/{id} - Delete a transaction permanently
#[utoipa::path(
    delete,
    path = "/transactions/{id}",
    tag = "Transactions",
    params(TransactionIdPath),
    responses(
        (status = 204, description = "Transaction deleted"),
        (status = 404, description = "Transaction not found", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions/{id}")]
pub async fn delete_transaction(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<TransactionIdPath>,
) -> Result<HttpResponse, AppError> {
    TransactionService::delete(pool.get_ref(), auth.user_id, path.id).await?;

    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /transactions/category/{category} - Delete all transactions in a category
#[utoipa::path(
    delete,
    path = "/transactions/category/{category}",
    tag = "Transactions",
    params(CategoryPath),
    responses(
        (status = 200, description = "Transactions deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions/category/{category}")]
pub async fn delete_by_category(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
    path: web::Path<CategoryPath>,
) -> Result<HttpResponse, AppError> {
    let deleted =
        TransactionService::delete_by_category(pool.get_ref(), auth.user_id, &path.category)
            .await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: format!("Deleted all transactions in category '{}'", path.category),
        deleted,
    }))
}

/// DELETE /transactions - Delete every transaction of the current user
#[utoipa::path(
    delete,
    path = "/transactions",
    tag = "Transactions",
    responses(
        (status = 200, description = "All transactions deleted", body = DeleteResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[delete("/transactions")]
pub async fn delete_all_transactions(
    pool: web::Data<PgPool>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let deleted = TransactionService::delete_all(pool.get_ref(), auth.user_id).await?;

    Ok(HttpResponse::Ok().json(DeleteResponse {
        message: "All transactions deleted".to_string(),
        deleted,
    }))
}
