use chrono::{Local, Utc};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::filter::TypeFilter;
use super::models::{
    CreateTransactionDto, StatsQuery, Transaction, TransactionListQuery, TransactionStats,
    UpdateTransactionDto,
};
use super::summary::summarize;
use crate::errors::AppError;

/// Service layer for transaction business logic.
///
/// Every query is scoped by owner id. A transaction that exists but
/// belongs to another user is indistinguishable from one that does not
/// exist; both surface as NotFound.
pub struct TransactionService;

impl TransactionService {
    /// Create a transaction for the given owner.
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        dto: CreateTransactionDto,
    ) -> Result<Transaction, AppError> {
        let category = dto.category.trim().to_string();
        if category.is_empty() {
            return Err(AppError::ValidationError(
                "Category cannot be empty".to_string(),
            ));
        }

        let date = dto.date.unwrap_or_else(Utc::now);

        sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (owner_id, transaction_type, amount, category, note, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, owner_id, transaction_type, amount, category, note, date,
                      created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(dto.transaction_type.as_str())
        .bind(dto.amount)
        .bind(&category)
        .bind(&dto.note)
        .bind(date)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Get a single transaction by ID.
    pub async fn get(
        pool: &PgPool,
        owner_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<Transaction, AppError> {
        sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, owner_id, transaction_type, amount, category, note, date,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(transaction_id)
        .bind(owner_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// List transactions with filters and pagination, newest first.
    pub async fn list(
        pool: &PgPool,
        owner_id: Uuid,
        query: &TransactionListQuery,
    ) -> Result<(Vec<Transaction>, i64), AppError> {
        // Reject malformed type values before touching the store
        let type_filter = query.type_filter()?;
        let type_param = match type_filter {
            TypeFilter::All => None,
            TypeFilter::Income => Some("income"),
            TypeFilter::Expense => Some("expense"),
        };

        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        let (page, limit) = query.clamped();
        let offset = (page - 1) * limit;

        let transactions = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, owner_id, transaction_type, amount, category, note, date,
                   created_at, updated_at
            FROM transactions
            WHERE owner_id = $1
              AND ($2::text IS NULL OR transaction_type = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::timestamptz IS NULL OR date >= $4)
              AND ($5::timestamptz IS NULL OR date <= $5)
              AND ($6::text IS NULL
                   OR category ILIKE '%' || $6 || '%'
                   OR note ILIKE '%' || $6 || '%')
            ORDER BY date DESC, created_at DESC
            LIMIT $7 OFFSET $8
            "#,
        )
        .bind(owner_id)
        .bind(type_param)
        .bind(&query.category)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(search)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM transactions
            WHERE owner_id = $1
              AND ($2::text IS NULL OR transaction_type = $2)
              AND ($3::text IS NULL OR category = $3)
              AND ($4::timestamptz IS NULL OR date >= $4)
              AND ($5::timestamptz IS NULL OR date <= $5)
              AND ($6::text IS NULL
                   OR category ILIKE '%' || $6 || '%'
                   OR note ILIKE '%' || $6 || '%')
            "#,
        )
        .bind(owner_id)
        .bind(type_param)
        .bind(&query.category)
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(search)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        Ok((transactions, total))
    }

    /// Update a transaction; unset fields keep their current value.
    pub async fn update(
        pool: &PgPool,
        owner_id: Uuid,
        transaction_id: Uuid,
        dto: UpdateTransactionDto,
    ) -> Result<Transaction, AppError> {
        let existing = Self::get(pool, owner_id, transaction_id).await?;

        let new_type = dto
            .transaction_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.transaction_type);
        let new_amount = dto.amount.unwrap_or(existing.amount);
        let new_category = match &dto.category {
            Some(c) => {
                let trimmed = c.trim().to_string();
                if trimmed.is_empty() {
                    return Err(AppError::ValidationError(
                        "Category cannot be empty".to_string(),
                    ));
                }
                trimmed
            }
            None => existing.category,
        };
        let new_note = match dto.note {
            Some(note) => note, // Some(None) clears the note
            None => existing.note,
        };
        let new_date = dto.date.unwrap_or(existing.date);

        sqlx::query_as::<_, Transaction>(
            r#"
            UPDATE transactions SET
                transaction_type = $3,
                amount = $4,
                category = $5,
                note = $6,
                date = $7,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING id, owner_id, transaction_type, amount, category, note, date,
                      created_at, updated_at
            "#,
        )
        .bind(transaction_id)
        .bind(owner_id)
        .bind(&new_type)
        .bind(new_amount)
        .bind(&new_category)
        .bind(&new_note)
        .bind(new_date)
        .fetch_optional(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .ok_or_else(|| AppError::NotFound("Transaction not found".to_string()))
    }

    /// Delete a single transaction.
    pub async fn delete(
        pool: &PgPool,
        owner_id: Uuid,
        transaction_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1 AND owner_id = $2")
            .bind(transaction_id)
            .bind(owner_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Transaction not found".to_string()));
        }

        Ok(())
    }

    /// Delete every transaction of the owner in a category.
    pub async fn delete_by_category(
        pool: &PgPool,
        owner_id: Uuid,
        category: &str,
    ) -> Result<i64, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE owner_id = $1 AND category = $2")
            .bind(owner_id)
            .bind(category)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        debug!(
            owner = %owner_id,
            category,
            deleted = result.rows_affected(),
            "deleted transactions by category"
        );

        Ok(result.rows_affected() as i64)
    }

    /// Delete every transaction of the owner.
    pub async fn delete_all(pool: &PgPool, owner_id: Uuid) -> Result<i64, AppError> {
        let result = sqlx::query("DELETE FROM transactions WHERE owner_id = $1")
            .bind(owner_id)
            .execute(pool)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        debug!(owner = %owner_id, deleted = result.rows_affected(), "cleared all transactions");

        Ok(result.rows_affected() as i64)
    }

    /// Distinct category labels used by the owner, for client-side
    /// autocomplete. Categories are free text; there is no category table.
    pub async fn categories(pool: &PgPool, owner_id: Uuid) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM transactions
            WHERE owner_id = $1
            ORDER BY category ASC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))
    }

    /// Aggregate statistics over the owner's transactions.
    ///
    /// The store narrows by owner and resolved date bounds; the remaining
    /// dimensions and the aggregation itself run in memory on the snapshot.
    pub async fn stats(
        pool: &PgPool,
        owner_id: Uuid,
        query: &StatsQuery,
    ) -> Result<TransactionStats, AppError> {
        let filter = query.to_filter()?;
        let now = Local::now();
        let (start, end) = filter.date_range.resolve(now);

        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT id, owner_id, transaction_type, amount, category, note, date,
                   created_at, updated_at
            FROM transactions
            WHERE owner_id = $1
              AND ($2::timestamptz IS NULL OR date >= $2)
              AND ($3::timestamptz IS NULL OR date <= $3)
            ORDER BY date DESC, created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

        let filtered = filter.apply(rows, now);

        Ok(summarize(&filtered))
    }
}
