//! Pure filtering logic over in-memory transaction snapshots.
//!
//! Every dimension combines conjunctively; a dimension left at its
//! default imposes no constraint. Date presets resolve against a caller
//! supplied `now` so the computation stays deterministic under test.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveTime, TimeZone, Utc};

use super::models::{Transaction, TransactionType};

/// Type dimension of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeFilter {
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(TypeFilter::All),
            "income" => Some(TypeFilter::Income),
            "expense" => Some(TypeFilter::Expense),
            _ => None,
        }
    }

    fn matches(&self, kind: TransactionType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Income => kind == TransactionType::Income,
            TypeFilter::Expense => kind == TransactionType::Expense,
        }
    }
}

/// Date dimension of a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRange {
    /// No date constraint
    All,
    /// Start of the local day up to now
    Today,
    /// The last seven days, starting from local midnight seven days ago
    LastSevenDays,
    /// The last thirty days, starting from local midnight thirty days ago
    LastThirtyDays,
    /// Explicit inclusive bounds; each applies independently when present
    Absolute {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
    /// The "custom" preset: filters only once both bounds are present,
    /// otherwise the predicate is satisfied
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    /// Resolve to concrete inclusive bounds against the given moment.
    pub fn resolve(&self, now: DateTime<Local>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        match self {
            DateRange::All => (None, None),
            DateRange::Today => (
                Some(start_of_local_day(now)),
                Some(now.with_timezone(&Utc)),
            ),
            DateRange::LastSevenDays => {
                (Some(start_of_local_day(now) - Duration::days(7)), None)
            }
            DateRange::LastThirtyDays => {
                (Some(start_of_local_day(now) - Duration::days(30)), None)
            }
            DateRange::Absolute { start, end } => (*start, *end),
            DateRange::Custom {
                start: Some(start),
                end: Some(end),
            } => (Some(*start), Some(*end)),
            DateRange::Custom { .. } => (None, None),
        }
    }
}

/// Local midnight of the given day, in UTC. Falls back to `now` on the
/// rare DST gap where midnight does not exist.
fn start_of_local_day(now: DateTime<Local>) -> DateTime<Utc> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&midnight) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        LocalResult::None => now.with_timezone(&Utc),
    }
}

/// Filter specification over a transaction collection.
///
/// All predicates combine with logical AND. An empty category set and
/// `TypeFilter::All` impose no constraint.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub type_filter: TypeFilter,
    pub categories: Vec<String>,
    pub date_range: DateRange,
    pub search: Option<String>,
}

impl Default for TransactionFilter {
    fn default() -> Self {
        Self {
            type_filter: TypeFilter::All,
            categories: Vec::new(),
            date_range: DateRange::All,
            search: None,
        }
    }
}

impl TransactionFilter {
    /// Whether a single transaction satisfies every active predicate.
    pub fn matches(&self, tx: &Transaction, now: DateTime<Local>) -> bool {
        if !self.type_filter.matches(tx.kind()) {
            return false;
        }

        if !self.categories.is_empty() && !self.categories.iter().any(|c| *c == tx.category) {
            return false;
        }

        let (start, end) = self.date_range.resolve(now);
        if let Some(start) = start {
            if tx.date < start {
                return false;
            }
        }
        if let Some(end) = end {
            if tx.date > end {
                return false;
            }
        }

        if let Some(query) = &self.search {
            let query = query.trim().to_lowercase();
            if !query.is_empty() {
                let in_category = tx.category.to_lowercase().contains(&query);
                let in_note = tx
                    .note
                    .as_deref()
                    .map(|n| n.to_lowercase().contains(&query))
                    .unwrap_or(false);
                if !in_category && !in_note {
                    return false;
                }
            }
        }

        true
    }

    /// Narrow a collection to the transactions satisfying the filter.
    pub fn apply(&self, mut transactions: Vec<Transaction>, now: DateTime<Local>) -> Vec<Transaction> {
        transactions.retain(|tx| self.matches(tx, now));
        transactions
    }
}
