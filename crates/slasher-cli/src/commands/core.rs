//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `open_service` - Database wrapped in the transaction service
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use slasher_core::{Database, TransactionService};
use tracing::debug;

/// Open the database, creating the schema if it is missing
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    debug!(path = path_str, "Opening database");
    Database::open(path_str)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

pub fn open_service(db_path: &Path) -> Result<TransactionService> {
    Ok(TransactionService::new(open_db(db_path)?))
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_transactions()?;
    if count > 0 {
        println!("   Existing database kept ({} transactions)", count);
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a transaction: slasher add Coffee --amount 4.50 --category food");
    println!("  2. See where it goes: slasher report category");

    Ok(())
}
