use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::filter::{DateRange, TransactionFilter, TypeFilter};
use crate::errors::AppError;

/// Transaction type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money received
    Income,
    /// Money spent
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "income" => Some(TransactionType::Income),
            "expense" => Some(TransactionType::Expense),
            _ => None,
        }
    }
}

/// Validate that amount is positive
fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount <= Decimal::ZERO {
        return Err(ValidationError::new("amount_must_be_positive"));
    }
    Ok(())
}

/// Database model for transactions
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub transaction_type: String,
    pub amount: Decimal,
    pub category: String,
    pub note: Option<String>,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// The type column is CHECK-constrained to income/expense, so a failed
    /// parse here means the row predates the constraint; treat it as expense.
    pub fn kind(&self) -> TransactionType {
        TransactionType::parse(&self.transaction_type).unwrap_or(TransactionType::Expense)
    }
}

/// Transaction information returned in responses
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResponse {
    /// Unique transaction identifier
    pub id: Uuid,
    /// Transaction type (income or expense)
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: String,
    /// Transaction amount (always positive)
    #[schema(example = 50.00)]
    pub amount: Decimal,
    /// Free-text category label
    #[schema(example = "Food")]
    pub category: String,
    /// Optional note
    #[schema(example = "Weekly groceries")]
    pub note: Option<String>,
    /// Date of the financial event
    pub date: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(t: Transaction) -> Self {
        Self {
            id: t.id,
            transaction_type: t.transaction_type,
            amount: t.amount,
            category: t.category,
            note: t.note,
            date: t.date,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Request body for creating a transaction
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionDto {
    /// Transaction type (income or expense)
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Transaction amount (must be positive)
    #[validate(custom(
        function = "validate_positive_amount",
        message = "Amount must be positive"
    ))]
    #[schema(example = 50.00)]
    pub amount: Decimal,

    /// Free-text category label (max 100 chars)
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    #[schema(example = "Food")]
    pub category: String,

    /// Optional note (max 500 chars)
    #[validate(length(max = 500, message = "Note cannot exceed 500 characters"))]
    #[schema(example = "Weekly groceries")]
    pub note: Option<String>,

    /// Date of the financial event; defaults to now when omitted
    pub date: Option<DateTime<Utc>>,
}

/// Request body for updating a transaction (PATCH - all fields optional)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTransactionDto {
    /// Transaction type
    #[serde(rename = "type")]
    pub transaction_type: Option<TransactionType>,

    /// Transaction amount
    #[schema(example = 75.00)]
    pub amount: Option<Decimal>,

    /// Category label
    #[validate(length(min = 1, max = 100, message = "Category must be 1-100 characters"))]
    pub category: Option<String>,

    /// Note (use null to clear it)
    pub note: Option<Option<String>>,

    /// Date of the financial event
    pub date: Option<DateTime<Utc>>,
}

impl UpdateTransactionDto {
    /// Checks the fields the derive cannot reach
    pub fn validate_patch(&self) -> Result<(), AppError> {
        if let Some(amount) = &self.amount {
            if *amount <= Decimal::ZERO {
                return Err(AppError::ValidationError(
                    "Amount must be positive".to_string(),
                ));
            }
        }
        if let Some(Some(note)) = &self.note {
            if note.len() > 500 {
                return Err(AppError::ValidationError(
                    "Note cannot exceed 500 characters".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Query parameters for listing transactions
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionListQuery {
    /// Filter by type (all, income, expense)
    #[serde(rename = "type")]
    #[param(example = "expense")]
    pub transaction_type: Option<String>,

    /// Filter by exact category label
    #[param(example = "Food")]
    pub category: Option<String>,

    /// Case-insensitive substring match against category or note
    pub search: Option<String>,

    /// Inclusive lower bound on the transaction date
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the transaction date
    pub end_date: Option<DateTime<Utc>>,

    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(example = 1)]
    pub page: i64,

    /// Page size (1-100)
    #[serde(default = "default_limit")]
    #[param(example = 10)]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

impl TransactionListQuery {
    /// Parse the type filter, rejecting unrecognized values
    pub fn type_filter(&self) -> Result<TypeFilter, AppError> {
        parse_type_param(self.transaction_type.as_deref())
    }

    /// Clamp pagination to the supported window: page >= 1, limit in [1, 100]
    pub fn clamped(&self) -> (i64, i64) {
        (self.page.max(1), self.limit.clamp(1, 100))
    }
}

/// Query parameters for the stats endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct StatsQuery {
    /// Named date window: today, week, month, or custom
    #[param(example = "week")]
    pub period: Option<String>,

    /// Inclusive lower bound on the transaction date
    pub start_date: Option<DateTime<Utc>>,

    /// Inclusive upper bound on the transaction date
    pub end_date: Option<DateTime<Utc>>,

    /// Filter by type (all, income, expense)
    #[serde(rename = "type")]
    #[param(example = "expense")]
    pub transaction_type: Option<String>,

    /// Comma-separated list of category labels
    #[param(example = "Food,Transport")]
    pub categories: Option<String>,

    /// Case-insensitive substring match against category or note
    pub search: Option<String>,
}

impl StatsQuery {
    /// Build the filter specification, rejecting malformed dimensions
    /// before any filtering happens.
    pub fn to_filter(&self) -> Result<TransactionFilter, AppError> {
        let type_filter = parse_type_param(self.transaction_type.as_deref())?;

        let date_range = match self.period.as_deref() {
            None => {
                if self.start_date.is_some() || self.end_date.is_some() {
                    DateRange::Absolute {
                        start: self.start_date,
                        end: self.end_date,
                    }
                } else {
                    DateRange::All
                }
            }
            Some("today") => DateRange::Today,
            Some("week") => DateRange::LastSevenDays,
            Some("month") => DateRange::LastThirtyDays,
            Some("custom") => DateRange::Custom {
                start: self.start_date,
                end: self.end_date,
            },
            Some(other) => {
                return Err(AppError::ValidationError(format!(
                    "Unknown period '{other}': expected today, week, month, or custom"
                )))
            }
        };

        let categories = self
            .categories
            .as_deref()
            .map(|s| {
                s.split(',')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Ok(TransactionFilter {
            type_filter,
            categories,
            date_range,
            search: self.search.clone(),
        })
    }
}

fn parse_type_param(value: Option<&str>) -> Result<TypeFilter, AppError> {
    match value {
        None => Ok(TypeFilter::All),
        Some(s) => TypeFilter::parse(s).ok_or_else(|| {
            AppError::ValidationError(format!(
                "Unknown type '{s}': expected all, income, or expense"
            ))
        }),
    }
}

/// Pagination metadata returned alongside list results
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Total count matching the filters
    #[schema(example = 42)]
    pub total: i64,
    /// Page number used (1-indexed)
    #[schema(example = 1)]
    pub page: i64,
    /// Page size used
    #[schema(example = 10)]
    pub limit: i64,
    /// Total number of pages
    #[schema(example = 5)]
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(total: i64, page: i64, limit: i64) -> Self {
        Self {
            total,
            page,
            limit,
            total_pages: (total + limit - 1) / limit,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedTransactionResponse {
    /// List of transactions
    pub data: Vec<TransactionResponse>,
    /// Pagination metadata
    pub pagination: PageInfo,
}

/// Totals computed over a filtered transaction set
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    /// Sum of income amounts
    #[schema(example = 1200.00)]
    pub total_income: Decimal,
    /// Sum of expense amounts
    #[schema(example = 450.50)]
    pub total_expense: Decimal,
    /// totalIncome - totalExpense
    #[schema(example = 749.50)]
    pub balance: Decimal,
    /// Number of income transactions
    #[schema(example = 3)]
    pub income_count: i64,
    /// Number of expense transactions
    #[schema(example = 12)]
    pub expense_count: i64,
}

/// Per-(category, type) aggregate row
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    /// Category label
    #[schema(example = "Food")]
    pub category: String,
    /// Transaction type of this group
    #[serde(rename = "type")]
    #[schema(example = "expense")]
    pub transaction_type: TransactionType,
    /// Summed amount for this group
    #[schema(example = 250.00)]
    pub sum: Decimal,
    /// Number of transactions in this group
    #[schema(example = 7)]
    pub count: i64,
}

/// Aggregate summary over a filtered transaction set
#[derive(Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStats {
    /// Totals and counts
    pub summary: StatsSummary,
    /// Per-(category, type) rows, sorted descending by summed amount
    pub category_breakdown: Vec<CategoryBreakdown>,
}

/// Response body for bulk delete operations
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    /// Success message
    #[schema(example = "Transactions deleted")]
    pub message: String,
    /// Number of records removed
    #[schema(example = 3)]
    pub deleted: i64,
}

/// Path parameters for transaction ID
#[derive(Debug, Deserialize, IntoParams)]
pub struct TransactionIdPath {
    /// Transaction UUID
    pub id: Uuid,
}

/// Path parameters for a category label
#[derive(Debug, Deserialize, IntoParams)]
pub struct CategoryPath {
    /// Category label
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parse() {
        assert_eq!(
            TransactionType::parse("income"),
            Some(TransactionType::Income)
        );
        assert_eq!(
            TransactionType::parse("expense"),
            Some(TransactionType::Expense)
        );
        assert_eq!(TransactionType::parse("transfer"), None);
        assert_eq!(TransactionType::parse("Income"), None);
    }

    #[test]
    fn test_create_dto_rejects_zero_and_negative_amounts() {
        for raw in ["0", "-5.25"] {
            let dto = CreateTransactionDto {
                transaction_type: TransactionType::Expense,
                amount: raw.parse().unwrap(),
                category: "Food".to_string(),
                note: None,
                date: None,
            };
            assert!(dto.validate().is_err(), "amount {raw} should be rejected");
        }
    }

    #[test]
    fn test_create_dto_rejects_empty_category() {
        let dto = CreateTransactionDto {
            transaction_type: TransactionType::Income,
            amount: "10".parse().unwrap(),
            category: String::new(),
            note: None,
            date: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_rejects_nonpositive_amount() {
        let dto = UpdateTransactionDto {
            transaction_type: None,
            amount: Some(Decimal::ZERO),
            category: None,
            note: None,
            date: None,
        };
        assert!(dto.validate_patch().is_err());
    }

    #[test]
    fn test_pagination_clamping() {
        let query = TransactionListQuery {
            transaction_type: None,
            category: None,
            search: None,
            start_date: None,
            end_date: None,
            page: 0,
            limit: 500,
        };
        assert_eq!(query.clamped(), (1, 100));

        let query = TransactionListQuery {
            page: -3,
            limit: 0,
            ..query
        };
        assert_eq!(query.clamped(), (1, 1));
    }

    #[test]
    fn test_page_info_total_pages() {
        assert_eq!(PageInfo::new(0, 1, 10).total_pages, 0);
        assert_eq!(PageInfo::new(10, 1, 10).total_pages, 1);
        assert_eq!(PageInfo::new(11, 1, 10).total_pages, 2);
    }

    #[test]
    fn test_stats_query_rejects_unknown_type() {
        let query = StatsQuery {
            period: None,
            start_date: None,
            end_date: None,
            transaction_type: Some("transfer".to_string()),
            categories: None,
            search: None,
        };
        assert!(query.to_filter().is_err());
    }

    #[test]
    fn test_stats_query_rejects_unknown_period() {
        let query = StatsQuery {
            period: Some("fortnight".to_string()),
            start_date: None,
            end_date: None,
            transaction_type: None,
            categories: None,
            search: None,
        };
        assert!(query.to_filter().is_err());
    }

    #[test]
    fn test_stats_query_splits_categories() {
        let query = StatsQuery {
            period: None,
            start_date: None,
            end_date: None,
            transaction_type: None,
            categories: Some("Food, Transport ,,".to_string()),
            search: None,
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.categories, vec!["Food", "Transport"]);
    }
}
