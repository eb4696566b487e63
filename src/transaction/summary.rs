//! Pure aggregation over a filtered transaction collection.

use std::collections::HashMap;

use rust_decimal::Decimal;

use super::models::{CategoryBreakdown, StatsSummary, Transaction, TransactionStats, TransactionType};

/// Compute totals, balance, counts, and the per-(category, type)
/// breakdown for a transaction collection.
///
/// Amounts are summed with exact decimal arithmetic. An empty input is
/// valid and yields zero sums, zero counts, and an empty breakdown.
pub fn summarize(transactions: &[Transaction]) -> TransactionStats {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut income_count = 0i64;
    let mut expense_count = 0i64;

    // Groups keep first-seen order so that equal sums sort stably below.
    let mut group_index: HashMap<(String, TransactionType), usize> = HashMap::new();
    let mut breakdown: Vec<CategoryBreakdown> = Vec::new();

    for tx in transactions {
        let kind = tx.kind();
        match kind {
            TransactionType::Income => {
                total_income += tx.amount;
                income_count += 1;
            }
            TransactionType::Expense => {
                total_expense += tx.amount;
                expense_count += 1;
            }
        }

        let key = (tx.category.clone(), kind);
        match group_index.get(&key) {
            Some(&i) => {
                breakdown[i].sum += tx.amount;
                breakdown[i].count += 1;
            }
            None => {
                group_index.insert(key, breakdown.len());
                breakdown.push(CategoryBreakdown {
                    category: tx.category.clone(),
                    transaction_type: kind,
                    sum: tx.amount,
                    count: 1,
                });
            }
        }
    }

    breakdown.sort_by(|a, b| b.sum.cmp(&a.sum));

    TransactionStats {
        summary: StatsSummary {
            total_income,
            total_expense,
            balance: total_income - total_expense,
            income_count,
            expense_count,
        },
        category_breakdown: breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn tx(kind: &str, amount: &str, category: &str) -> Transaction {
        let now = Utc::now();
        Transaction {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            transaction_type: kind.to_string(),
            amount: amount.parse().unwrap(),
            category: category.to_string(),
            note: None,
            date: now,
            created_at: now,
            updated_at: now,
        }
    }

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_empty_input_yields_zeroed_summary() {
        let stats = summarize(&[]);
        assert_eq!(stats.summary.total_income, Decimal::ZERO);
        assert_eq!(stats.summary.total_expense, Decimal::ZERO);
        assert_eq!(stats.summary.balance, Decimal::ZERO);
        assert_eq!(stats.summary.income_count, 0);
        assert_eq!(stats.summary.expense_count, 0);
        assert!(stats.category_breakdown.is_empty());
    }

    #[test]
    fn test_salary_and_food_scenario() {
        let set = vec![
            tx("income", "100", "Salary"),
            tx("expense", "40", "Food"),
            tx("expense", "10", "Food"),
        ];
        let stats = summarize(&set);

        assert_eq!(stats.summary.total_income, dec("100"));
        assert_eq!(stats.summary.total_expense, dec("50"));
        assert_eq!(stats.summary.balance, dec("50"));
        assert_eq!(stats.summary.income_count, 1);
        assert_eq!(stats.summary.expense_count, 2);

        // Sorted descending by summed amount
        assert_eq!(
            stats.category_breakdown,
            vec![
                CategoryBreakdown {
                    category: "Salary".to_string(),
                    transaction_type: TransactionType::Income,
                    sum: dec("100"),
                    count: 1,
                },
                CategoryBreakdown {
                    category: "Food".to_string(),
                    transaction_type: TransactionType::Expense,
                    sum: dec("50"),
                    count: 2,
                },
            ]
        );
    }

    #[test]
    fn test_balance_identity() {
        let set = vec![
            tx("income", "12.34", "Salary"),
            tx("income", "0.01", "Gift"),
            tx("expense", "99.99", "Rent"),
        ];
        let stats = summarize(&set);
        assert_eq!(
            stats.summary.balance,
            stats.summary.total_income - stats.summary.total_expense
        );
        assert_eq!(stats.summary.balance, dec("-87.64"));
    }

    #[test]
    fn test_breakdown_resummed_by_type_equals_totals() {
        let set = vec![
            tx("income", "100", "Salary"),
            tx("income", "25.50", "Gift"),
            tx("expense", "40", "Food"),
            tx("expense", "10", "Food"),
            tx("expense", "3.20", "Transport"),
        ];
        let stats = summarize(&set);

        let income_sum: Decimal = stats
            .category_breakdown
            .iter()
            .filter(|row| row.transaction_type == TransactionType::Income)
            .map(|row| row.sum)
            .sum();
        let expense_sum: Decimal = stats
            .category_breakdown
            .iter()
            .filter(|row| row.transaction_type == TransactionType::Expense)
            .map(|row| row.sum)
            .sum();

        assert_eq!(income_sum, stats.summary.total_income);
        assert_eq!(expense_sum, stats.summary.total_expense);
    }

    #[test]
    fn test_same_category_different_types_group_separately() {
        let set = vec![
            tx("income", "30", "Side gig"),
            tx("expense", "20", "Side gig"),
        ];
        let stats = summarize(&set);
        assert_eq!(stats.category_breakdown.len(), 2);
        assert_eq!(stats.summary.balance, dec("10"));
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let set = vec![
            tx("expense", "25", "Books"),
            tx("expense", "25", "Games"),
        ];
        let stats = summarize(&set);
        assert_eq!(stats.category_breakdown[0].category, "Books");
        assert_eq!(stats.category_breakdown[1].category, "Games");
    }

    #[test]
    fn test_exact_decimal_accumulation() {
        // 0.1 summed ten times must be exactly 1, never 0.9999…
        let set: Vec<Transaction> = (0..10).map(|_| tx("expense", "0.1", "Coffee")).collect();
        let stats = summarize(&set);
        assert_eq!(stats.summary.total_expense, dec("1.0"));
        assert_eq!(stats.category_breakdown[0].count, 10);
    }
}
