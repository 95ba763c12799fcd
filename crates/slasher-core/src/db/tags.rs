//! Tag and transaction-tag operations
//!
//! Tag names are unique and shared by every transaction carrying them. A tag
//! whose last link is removed is deleted in the same unit of work.

use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;

use super::Database;
use crate::error::Result;
use crate::models::Tag;

/// Look a tag up by name, inserting it when missing
pub(crate) fn tag_id_or_insert(conn: &Connection, name: &str) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row("SELECT id FROM tags WHERE name = ?", params![name], |row| {
            row.get(0)
        })
        .optional()?;

    if let Some(id) = existing {
        return Ok(id);
    }

    conn.execute("INSERT INTO tags (name) VALUES (?)", params![name])?;
    Ok(conn.last_insert_rowid())
}

/// Attach tags to a transaction; links that already exist are left alone
pub(crate) fn link_tags(conn: &Connection, transaction_id: i64, tags: &[&str]) -> Result<()> {
    for name in tags {
        let tag_id = tag_id_or_insert(conn, name)?;
        conn.execute(
            "INSERT OR IGNORE INTO transactions_tags (transaction_id, tag_id) VALUES (?, ?)",
            params![transaction_id, tag_id],
        )?;
    }
    Ok(())
}

/// Detach tags from a transaction, deleting each tag left without links
///
/// Names that are unknown or not on the transaction are skipped.
pub(crate) fn unlink_tags(conn: &Connection, transaction_id: i64, tags: &[&str]) -> Result<()> {
    for name in tags {
        let tag_id: Option<i64> = conn
            .query_row("SELECT id FROM tags WHERE name = ?", params![name], |row| {
                row.get(0)
            })
            .optional()?;
        let Some(tag_id) = tag_id else {
            continue;
        };

        conn.execute(
            "DELETE FROM transactions_tags WHERE transaction_id = ? AND tag_id = ?",
            params![transaction_id, tag_id],
        )?;

        let remaining: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions_tags WHERE tag_id = ?",
            params![tag_id],
            |row| row.get(0),
        )?;
        if remaining == 0 {
            conn.execute("DELETE FROM tags WHERE id = ?", params![tag_id])?;
            debug!(tag = %name, "Pruned orphaned tag");
        }
    }
    Ok(())
}

/// Delete every tag that no transaction references
pub(crate) fn prune_orphan_tags(conn: &Connection) -> Result<usize> {
    let pruned = conn.execute(
        "DELETE FROM tags WHERE id NOT IN (SELECT tag_id FROM transactions_tags)",
        [],
    )?;
    Ok(pruned)
}

pub(crate) fn transaction_exists(conn: &Connection, id: i64) -> Result<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM transactions WHERE id = ?",
            params![id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

impl Database {
    /// Attach tags to an existing transaction, reusing or creating tag rows
    ///
    /// Re-adding a tag the transaction already carries is not an error.
    /// Returns `false` when no transaction has this id.
    pub fn add_tags_to_transaction(&self, transaction_id: i64, tags: &[&str]) -> Result<bool> {
        self.in_transaction("add_tags_to_transaction", |tx| {
            if !transaction_exists(tx, transaction_id)? {
                return Ok(false);
            }
            link_tags(tx, transaction_id, tags)?;
            debug!(transaction_id, tags = tags.len(), "Attached tags");
            Ok(true)
        })
    }

    /// Detach tags from a transaction, deleting tags left without links
    ///
    /// Names the transaction does not carry are skipped. Returns `false` when
    /// no transaction has this id.
    pub fn remove_tags_from_transaction(
        &self,
        transaction_id: i64,
        tags: &[&str],
    ) -> Result<bool> {
        self.in_transaction("remove_tags_from_transaction", |tx| {
            if !transaction_exists(tx, transaction_id)? {
                return Ok(false);
            }

            unlink_tags(tx, transaction_id, tags)?;
            Ok(true)
        })
    }

    /// Delete tags by name from every transaction carrying them
    ///
    /// Returns the number of tag rows removed; unknown names are skipped.
    pub fn delete_tags(&self, names: &[&str]) -> Result<usize> {
        self.in_transaction("delete_tags", |tx| {
            let mut deleted = 0;
            for name in names {
                // Links go with the tag through ON DELETE CASCADE
                deleted += tx.execute("DELETE FROM tags WHERE name = ?", params![name])?;
            }
            debug!(deleted, "Deleted tags");
            Ok(deleted)
        })
    }

    /// List all tags with how many transactions carry each
    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT g.id, g.name, COUNT(tt.transaction_id)
            FROM tags g
            LEFT JOIN transactions_tags tt ON tt.tag_id = g.id
            GROUP BY g.id
            ORDER BY g.name
            "#,
        )?;

        let tags = stmt
            .query_map([], |row| {
                Ok(Tag {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    transaction_count: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(tags)
    }

    /// Find a tag by its exact name
    pub fn find_tag(&self, name: &str) -> Result<Option<Tag>> {
        let conn = self.conn()?;
        let tag = conn
            .query_row(
                r#"
                SELECT g.id, g.name, COUNT(tt.transaction_id)
                FROM tags g
                LEFT JOIN transactions_tags tt ON tt.tag_id = g.id
                WHERE g.name = ?
                GROUP BY g.id
                "#,
                params![name],
                |row| {
                    Ok(Tag {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        transaction_count: row.get(2)?,
                    })
                },
            )
            .optional()?;

        Ok(tag)
    }
}
