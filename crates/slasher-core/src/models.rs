//! Domain models for Expense Slasher

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Prefix marking the tag that carries a transaction's category
pub const CATEGORY_PREFIX: &str = "category:";

/// Label used in reports for expenses without a category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A stored transaction with its aggregated tag names
///
/// `amount` is signed: positive is an expense (debit), negative is income (credit).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    /// Tag names in the order they were attached
    pub tags: Vec<String>,
}

impl TransactionRow {
    /// Comma-joined tag names, `None` when the transaction is untagged
    pub fn tags_blob(&self) -> Option<String> {
        if self.tags.is_empty() {
            None
        } else {
            Some(self.tags.join(","))
        }
    }

    /// Direction implied by the sign of the stored amount
    pub fn transaction_type(&self) -> TransactionType {
        TransactionType::from_signed_amount(self.amount)
    }

    /// Category values carried by `category:` tags
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.tags
            .iter()
            .filter_map(|tag| tag.strip_prefix(CATEGORY_PREFIX))
    }
}

/// A tag row with the number of transactions referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub transaction_count: i64,
}

/// Direction of a transaction as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Zero counts as an expense
    pub fn from_signed_amount(amount: f64) -> Self {
        if amount >= 0.0 {
            Self::Expense
        } else {
            Self::Income
        }
    }

    /// Apply this direction to a non-negative magnitude
    ///
    /// A zero income has no sign to carry, so it reads back as an expense.
    pub fn signed(&self, magnitude: f64) -> f64 {
        match self {
            Self::Income => -magnitude.abs(),
            Self::Expense => magnitude.abs(),
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!(
                "Unknown transaction type: '{}' (expected 'income' or 'expense')",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-facing view of a transaction: non-negative amount plus a type
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub description: String,
    /// Empty when the transaction has no category tag
    pub category: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
}

/// Input for adding a transaction through the service
#[derive(Debug, Clone)]
pub struct NewEntry {
    /// Defaults to today when absent
    pub date: Option<NaiveDate>,
    pub description: String,
    pub category: Option<String>,
    /// Non-negative magnitude
    pub amount: f64,
    pub transaction_type: TransactionType,
}

/// Partial update for an existing transaction
///
/// `None` leaves a field untouched. For `category`, `Some("")` clears it.
#[derive(Debug, Clone, Default)]
pub struct EntryEdit {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<f64>,
    pub transaction_type: Option<TransactionType>,
}

impl EntryEdit {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.amount.is_none()
            && self.transaction_type.is_none()
    }
}

/// Result of an index-addressed operation
///
/// Out-of-range indexes are not errors: callers get the current count so they
/// can show the valid range and ask again.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexOutcome<T> {
    Found(T),
    OutOfRange { count: usize },
}

impl<T> IndexOutcome<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Self::Found(value) => Some(value),
            Self::OutOfRange { .. } => None,
        }
    }
}

/// Aggregate income and expense totals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

impl Totals {
    pub fn new(income: f64, expenses: f64) -> Self {
        Self {
            income,
            expenses,
            net: income - expenses,
        }
    }

    /// Expenses as a percentage of income, `None` when there is no income
    pub fn expense_ratio(&self) -> Option<f64> {
        if self.income > 0.0 {
            Some(self.expenses / self.income * 100.0)
        } else {
            None
        }
    }
}

/// Total expenses for one category
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Income and expenses for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub income: f64,
    pub expenses: f64,
    pub net: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_carries_direction() {
        for kind in [TransactionType::Income, TransactionType::Expense] {
            let stored = kind.signed(12.5);
            assert_eq!(TransactionType::from_signed_amount(stored), kind);
            assert_eq!(stored.abs(), 12.5);
        }
        assert_eq!(TransactionType::Income.signed(-3.0), -3.0);
    }

    #[test]
    fn test_zero_income_reads_back_as_expense() {
        let stored = TransactionType::Income.signed(0.0);
        assert_eq!(stored, 0.0);
        assert_eq!(
            TransactionType::from_signed_amount(stored),
            TransactionType::Expense
        );
    }
}
