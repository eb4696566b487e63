use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::models::{
    AuthResponse, ChangePasswordDto, LoginDto, RegisterDto, UpdateProfileDto, UserResponse,
};
use crate::errors::ErrorResponse;
use crate::transaction::models::{
    CategoryBreakdown, CreateTransactionDto, DeleteResponse, PageInfo,
    PaginatedTransactionResponse, StatsSummary, TransactionResponse, TransactionStats,
    TransactionType, UpdateTransactionDto,
};

/// Security scheme modifier for Bearer token authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT access token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation configuration
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Expense Tracker API",
        version = "1.0.0",
        description = "RESTful API for recording transactions and computing spending statistics",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Auth", description = "Authentication and account management"),
        (name = "Transactions", description = "Transaction management, filtering, and statistics")
    ),
    paths(
        // Auth endpoints
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::profile,
        crate::auth::handlers::update_profile,
        crate::auth::handlers::change_password,
        // Transaction endpoints
        crate::transaction::handlers::list_transactions,
        crate::transaction::handlers::get_stats,
        crate::transaction::handlers::list_categories,
        crate::transaction::handlers::get_transaction,
        crate::transaction::handlers::create_transaction,
        crate::transaction::handlers::update_transaction,
        crate::transaction::handlers::delete_transaction,
        crate::transaction::handlers::delete_by_category,
        crate::transaction::handlers::delete_all_transactions,
    ),
    components(
        schemas(
            // Error response
            ErrorResponse,
            // Auth schemas
            RegisterDto,
            LoginDto,
            UpdateProfileDto,
            ChangePasswordDto,
            UserResponse,
            AuthResponse,
            // Transaction schemas
            TransactionType,
            TransactionResponse,
            CreateTransactionDto,
            UpdateTransactionDto,
            PageInfo,
            PaginatedTransactionResponse,
            StatsSummary,
            CategoryBreakdown,
            TransactionStats,
            DeleteResponse,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;
