//! Transaction service
//!
//! Translates the caller-facing shape (non-negative amount + type + category)
//! into the storage shape (signed amount + tags) and back. A transaction's
//! category lives in a single tag named `category:<value>`.
//!
//! Index-based operations address the list returned by [`TransactionService::list`]
//! and report out-of-range indexes through [`IndexOutcome::OutOfRange`].

use std::collections::HashMap;
use std::io::Write;

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::db::{Database, TransactionFilter};
use crate::error::{Error, Result};
use crate::export;
use crate::models::{
    CategoryTotal, EntryEdit, IndexOutcome, MonthlySummary, NewEntry, Totals, TransactionRecord,
    TransactionRow, TransactionType, CATEGORY_PREFIX, UNCATEGORIZED,
};

/// Parse a caller-supplied date, normalizing it to `YYYY-MM-DD`
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        Error::Validation(format!(
            "Invalid date '{}'. Use YYYY-MM-DD with a real calendar date.",
            input.trim()
        ))
    })
}

/// Parse a caller-supplied amount
pub fn parse_amount(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::Validation(format!("Amount must be numeric, got '{}'", input.trim())))
}

/// Parse `income` / `expense` (case-insensitive)
pub fn parse_transaction_type(input: &str) -> Result<TransactionType> {
    input.parse().map_err(Error::Validation)
}

fn validate_magnitude(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::Validation(format!(
            "Amount must be a non-negative number, got {}",
            amount
        )));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<()> {
    if description.trim().is_empty() {
        return Err(Error::Validation("Description cannot be blank".to_string()));
    }
    Ok(())
}

fn validate_free_tags(tags: &[String]) -> Result<()> {
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(Error::Validation("Tag names cannot be blank".to_string()));
        }
        if tag.starts_with(CATEGORY_PREFIX) {
            return Err(Error::Validation(format!(
                "'{}' is reserved for categories; edit the category instead",
                tag
            )));
        }
    }
    Ok(())
}

/// Tag name for a category, `None` for a blank category
fn category_tag(category: &str) -> Option<String> {
    let category = category.trim();
    if category.is_empty() {
        None
    } else {
        Some(format!("{}{}", CATEGORY_PREFIX, category))
    }
}

/// The single category carried by a row
///
/// More than one `category:` tag is a data error rather than a silent pick.
fn category_of(row: &TransactionRow) -> Result<Option<String>> {
    let categories: Vec<&str> = row.categories().collect();
    match categories.as_slice() {
        [] => Ok(None),
        [single] => Ok(Some(single.to_string())),
        many => Err(Error::InvalidData(format!(
            "Transaction {} carries {} category tags ({})",
            row.id,
            many.len(),
            many.join(", ")
        ))),
    }
}

fn to_record(row: &TransactionRow) -> Result<TransactionRecord> {
    Ok(TransactionRecord {
        id: row.id,
        date: row.date,
        description: row.description.clone(),
        category: category_of(row)?.unwrap_or_default(),
        amount: row.amount.abs(),
        transaction_type: row.transaction_type(),
    })
}

/// Resolve a list position, `None` when out of range (including negatives)
fn resolve_index<T>(items: &[T], index: i64) -> Option<&T> {
    usize::try_from(index).ok().and_then(|i| items.get(i))
}

/// Caller-facing operations over the storage engine
#[derive(Clone)]
pub struct TransactionService {
    db: Database,
}

impl TransactionService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// The underlying storage engine
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Add a transaction; returns its id
    pub fn add(&self, entry: &NewEntry) -> Result<i64> {
        validate_description(&entry.description)?;
        validate_magnitude(entry.amount)?;

        let date = entry
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        let amount = entry.transaction_type.signed(entry.amount);
        let tag = entry.category.as_deref().and_then(category_tag);
        let tags: Vec<&str> = tag.as_deref().into_iter().collect();

        let id = self
            .db
            .add_transaction(date, &entry.description, amount, &tags)?;
        info!(id, %date, "Transaction added");
        Ok(id)
    }

    /// All transactions, in insertion order
    pub fn list(&self) -> Result<Vec<TransactionRecord>> {
        self.db.fetch_all()?.iter().map(to_record).collect()
    }

    /// Transactions matching a filter
    ///
    /// Amount criteria compare against the signed stored amount (income is negative).
    pub fn search(&self, filter: &TransactionFilter<'_>) -> Result<Vec<TransactionRecord>> {
        self.db.fetch_filtered(filter)?.iter().map(to_record).collect()
    }

    /// A single transaction by id
    pub fn get(&self, id: i64) -> Result<TransactionRecord> {
        let row = self
            .db
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        to_record(&row)
    }

    /// Delete the transaction at a list position
    pub fn remove_by_index(&self, index: i64) -> Result<IndexOutcome<TransactionRecord>> {
        let rows = self.db.fetch_all()?;
        let Some(row) = resolve_index(&rows, index) else {
            return Ok(IndexOutcome::OutOfRange { count: rows.len() });
        };

        let record = to_record(row)?;
        if !self.db.delete_transaction(row.id)? {
            return Ok(IndexOutcome::OutOfRange {
                count: self.db.count_transactions()? as usize,
            });
        }

        info!(id = record.id, index, "Transaction removed");
        Ok(IndexOutcome::Found(record))
    }

    /// Apply a partial edit to the transaction at a list position
    pub fn edit_by_index(
        &self,
        index: i64,
        edit: &EntryEdit,
    ) -> Result<IndexOutcome<TransactionRecord>> {
        let rows = self.db.fetch_all()?;
        match resolve_index(&rows, index) {
            Some(row) => Ok(IndexOutcome::Found(self.edit_by_id(row.id, edit)?)),
            None => Ok(IndexOutcome::OutOfRange { count: rows.len() }),
        }
    }

    /// Apply a partial edit to a transaction
    ///
    /// An amount without a type keeps the current direction; a type without an
    /// amount reinterprets the current magnitude. `category: Some("")` clears
    /// the category, `None` keeps it. The whole edit is one unit of work: if
    /// any part fails, nothing changes.
    pub fn edit_by_id(&self, id: i64, edit: &EntryEdit) -> Result<TransactionRecord> {
        if let Some(amount) = edit.amount {
            validate_magnitude(amount)?;
        }
        if let Some(description) = &edit.description {
            validate_description(description)?;
        }

        let current = self
            .db
            .get_transaction(id)?
            .ok_or_else(|| Error::NotFound(format!("Transaction {}", id)))?;
        let current_tag = category_of(&current)?.map(|c| format!("{}{}", CATEGORY_PREFIX, c));

        let amount = match (edit.amount, edit.transaction_type) {
            (None, None) => None,
            (Some(magnitude), None) => Some(current.transaction_type().signed(magnitude)),
            (magnitude, Some(kind)) => Some(kind.signed(magnitude.unwrap_or(current.amount))),
        };

        // Tag names are identities: a changed category swaps the link rather than renaming
        let new_tag = edit.category.as_deref().map(category_tag);
        let mut remove = Vec::new();
        let mut add = Vec::new();
        if let Some(new_tag) = &new_tag {
            if *new_tag != current_tag {
                remove.extend(current_tag.as_deref());
                add.extend(new_tag.as_deref());
            }
        }

        // Fields and category change together or not at all
        self.db.edit_transaction_with_tags(
            id,
            edit.date,
            edit.description.as_deref(),
            amount,
            &remove,
            &add,
        )?;

        debug!(id, "Transaction edited");
        self.get(id)
    }

    /// Attach free-form tags to the transaction at a list position
    pub fn add_tags_by_index(
        &self,
        index: i64,
        tags: &[String],
    ) -> Result<IndexOutcome<TransactionRecord>> {
        validate_free_tags(tags)?;
        let rows = self.db.fetch_all()?;
        let Some(row) = resolve_index(&rows, index) else {
            return Ok(IndexOutcome::OutOfRange { count: rows.len() });
        };

        let names: Vec<&str> = tags.iter().map(|t| t.trim()).collect();
        self.db.add_tags_to_transaction(row.id, &names)?;
        Ok(IndexOutcome::Found(self.get(row.id)?))
    }

    /// Detach tags from the transaction at a list position
    pub fn remove_tags_by_index(
        &self,
        index: i64,
        tags: &[String],
    ) -> Result<IndexOutcome<TransactionRecord>> {
        let rows = self.db.fetch_all()?;
        let Some(row) = resolve_index(&rows, index) else {
            return Ok(IndexOutcome::OutOfRange { count: rows.len() });
        };

        let names: Vec<&str> = tags.iter().map(|t| t.trim()).collect();
        self.db.remove_tags_from_transaction(row.id, &names)?;
        Ok(IndexOutcome::Found(self.get(row.id)?))
    }

    /// Stored tag names of the transaction at a list position
    pub fn tags_by_index(&self, index: i64) -> Result<IndexOutcome<Vec<String>>> {
        let rows = self.db.fetch_all()?;
        Ok(match resolve_index(&rows, index) {
            Some(row) => IndexOutcome::Found(row.tags.clone()),
            None => IndexOutcome::OutOfRange { count: rows.len() },
        })
    }

    /// Income, expenses and net, aggregated in storage
    pub fn totals(&self) -> Result<Totals> {
        self.db.transaction_totals()
    }

    /// Expense totals per category, largest first
    ///
    /// Transactions without a category are grouped under "Uncategorized".
    pub fn expenses_by_category(&self) -> Result<Vec<CategoryTotal>> {
        let mut by_category: HashMap<String, f64> = HashMap::new();
        for record in self.list()? {
            if record.transaction_type != TransactionType::Expense {
                continue;
            }
            let category = if record.category.is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                record.category
            };
            *by_category.entry(category).or_default() += record.amount;
        }

        let mut totals: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, total)| CategoryTotal { category, total })
            .collect();
        totals.sort_by(|a, b| {
            b.total
                .total_cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });
        Ok(totals)
    }

    /// Income, expenses and net per month, oldest first
    pub fn monthly_breakdown(&self) -> Result<Vec<MonthlySummary>> {
        self.db.monthly_breakdown()
    }

    /// Write the transaction list as CSV; returns the number of rows written
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let records = self.list()?;
        export::write_csv(&records, writer)
    }
}
