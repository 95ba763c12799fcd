//! Expense Slasher Core Library
//!
//! Personal income/expense tracking on top of SQLite:
//! - Storage engine owning the transactions/tags/link schema (`db`)
//! - Transaction service translating amount + type + category to storage form (`service`)
//! - Totals, per-category and per-month reports
//! - CSV export and layered configuration

pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod service;

pub use config::Config;
pub use db::{AmountFilter, Database, TransactionFilter};
pub use error::{Error, Result};
pub use models::{
    CategoryTotal, EntryEdit, IndexOutcome, MonthlySummary, NewEntry, Tag, Totals,
    TransactionRecord, TransactionRow, TransactionType,
};
pub use service::{parse_amount, parse_date, parse_transaction_type, TransactionService};
