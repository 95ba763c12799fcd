//! Transaction operations

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::tags::{link_tags, prune_orphan_tags, transaction_exists, unlink_tags};
use super::transaction_filter::TransactionFilter;
use super::{Database, TAG_SEPARATOR};
use crate::error::Result;
use crate::models::TransactionRow;

/// One row per transaction; tag names aggregated in attachment order
const SELECT_TRANSACTION_ROWS: &str = r#"
    SELECT t.id, t.date, t.description, t.amount,
           GROUP_CONCAT(g.name, char(31) ORDER BY tt.rowid) AS tags
    FROM transactions t
    LEFT JOIN transactions_tags tt ON tt.transaction_id = t.id
    LEFT JOIN tags g ON g.id = tt.tag_id
"#;

/// Apply a partial `UPDATE`; returns the number of rows changed (0 when no field is supplied)
fn update_fields(
    conn: &Connection,
    id: i64,
    date: Option<NaiveDate>,
    description: Option<&str>,
    amount: Option<f64>,
) -> Result<usize> {
    let mut assignments = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

    if let Some(date) = date {
        assignments.push("date = ?");
        values.push(Box::new(date.to_string()));
    }
    if let Some(description) = description {
        assignments.push("description = ?");
        values.push(Box::new(description.to_string()));
    }
    if let Some(amount) = amount {
        assignments.push("amount = ?");
        values.push(Box::new(amount));
    }

    if assignments.is_empty() {
        return Ok(0);
    }

    values.push(Box::new(id));
    let sql = format!(
        "UPDATE transactions SET {} WHERE id = ?",
        assignments.join(", ")
    );
    let refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
    Ok(conn.execute(&sql, refs.as_slice())?)
}

impl Database {
    /// Insert a transaction and attach its tags, creating missing tags
    ///
    /// The row, the tags and the links are written atomically; any failure
    /// leaves the database unchanged.
    pub fn add_transaction(
        &self,
        date: NaiveDate,
        description: &str,
        amount: f64,
        tags: &[&str],
    ) -> Result<i64> {
        self.in_transaction("add_transaction", |tx| {
            tx.execute(
                "INSERT INTO transactions (date, description, amount) VALUES (?, ?, ?)",
                params![date.to_string(), description, amount],
            )?;
            let id = tx.last_insert_rowid();

            link_tags(tx, id, tags)?;

            debug!(id, tags = tags.len(), "Added transaction");
            Ok(id)
        })
    }

    /// All transactions in insertion order
    pub fn fetch_all(&self) -> Result<Vec<TransactionRow>> {
        self.fetch_filtered(&TransactionFilter::new())
    }

    /// Transactions matching every supplied criterion, in insertion order
    pub fn fetch_filtered(&self, filter: &TransactionFilter<'_>) -> Result<Vec<TransactionRow>> {
        let conn = self.conn()?;
        let built = filter.build();

        let sql = format!(
            "{} {} GROUP BY t.id ORDER BY t.id ASC",
            SELECT_TRANSACTION_ROWS, built.where_clause
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(built.params_refs().as_slice(), |row| {
                Self::row_to_transaction(row)
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: i64) -> Result<Option<TransactionRow>> {
        let conn = self.conn()?;
        let sql = format!("{} WHERE t.id = ? GROUP BY t.id", SELECT_TRANSACTION_ROWS);

        let row = conn
            .query_row(&sql, params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(row)
    }

    /// Count total transactions
    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Update the supplied fields of a transaction
    ///
    /// Returns `false` when no field was supplied or no transaction has this id.
    /// Tags are not touched.
    pub fn edit_transaction(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        description: Option<&str>,
        amount: Option<f64>,
    ) -> Result<bool> {
        if date.is_none() && description.is_none() && amount.is_none() {
            debug!(id, "Edit requested with no fields");
            return Ok(false);
        }

        self.in_transaction("edit_transaction", |tx| {
            let updated = update_fields(tx, id, date, description, amount)?;
            debug!(id, updated, "Edited transaction");
            Ok(updated > 0)
        })
    }

    /// Update fields and swap tags of a transaction as one unit of work
    ///
    /// Supplied fields are updated, `remove` is detached (pruning tags left
    /// without links), then `add` is attached. Any failure leaves the
    /// transaction exactly as it was. Returns `false` when no transaction has
    /// this id.
    pub fn edit_transaction_with_tags(
        &self,
        id: i64,
        date: Option<NaiveDate>,
        description: Option<&str>,
        amount: Option<f64>,
        remove: &[&str],
        add: &[&str],
    ) -> Result<bool> {
        self.in_transaction("edit_transaction_with_tags", |tx| {
            if !transaction_exists(tx, id)? {
                return Ok(false);
            }

            let updated = update_fields(tx, id, date, description, amount)?;
            unlink_tags(tx, id, remove)?;
            link_tags(tx, id, add)?;

            debug!(
                id,
                updated,
                removed = remove.len(),
                added = add.len(),
                "Edited transaction"
            );
            Ok(true)
        })
    }

    /// Delete a transaction, its links, and any tag left without links
    ///
    /// Returns `false` when no transaction has this id.
    pub fn delete_transaction(&self, id: i64) -> Result<bool> {
        self.in_transaction("delete_transaction", |tx| {
            // Explicit even though the schema cascades
            tx.execute(
                "DELETE FROM transactions_tags WHERE transaction_id = ?",
                params![id],
            )?;
            let deleted = tx.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
            if deleted == 0 {
                return Ok(false);
            }

            let pruned = prune_orphan_tags(tx)?;
            debug!(id, pruned, "Deleted transaction");
            Ok(true)
        })
    }

    /// Helper to convert a row to TransactionRow
    /// Column order: id, date, description, amount, tags
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<TransactionRow> {
        let date_str: String = row.get(1)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let tags: Option<String> = row.get(4)?;

        Ok(TransactionRow {
            id: row.get(0)?,
            date,
            description: row.get(2)?,
            amount: row.get(3)?,
            tags: tags
                .map(|blob| blob.split(TAG_SEPARATOR).map(str::to_string).collect())
                .unwrap_or_default(),
        })
    }
}
