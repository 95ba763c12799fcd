//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, open_service)
//! - `export` - CSV export
//! - `reports` - Totals, per-category and monthly reports
//! - `tags` - Tag listing and index-based tag editing
//! - `transactions` - Add, list, search, remove and edit

pub mod core;
pub mod export;
pub mod reports;
pub mod tags;
pub mod transactions;

// Re-export command functions for main.rs
pub use self::core::*;
pub use export::*;
pub use reports::*;
pub use tags::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount with the configured currency symbol
pub fn money(currency: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{}{:.2}", currency, amount.abs())
    } else {
        format!("{}{:.2}", currency, amount)
    }
}

/// Message for an index that does not address a listed transaction
pub fn invalid_index_message(count: usize) -> String {
    if count == 0 {
        "No transactions yet. Add one with: slasher add <description> --amount <n>".to_string()
    } else {
        format!("Invalid index. Must be between 0 and {}.", count - 1)
    }
}
