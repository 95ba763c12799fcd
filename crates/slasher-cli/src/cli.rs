//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Expense Slasher - Track income and expenses from the terminal
#[derive(Parser)]
#[command(name = "slasher")]
#[command(about = "Personal income and expense tracker", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path (overrides SLASHER_DB and the config file)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Add a transaction
    Add {
        /// What the money was for
        description: String,

        /// Amount as a non-negative number
        #[arg(short, long)]
        amount: String,

        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: String,

        /// Category (e.g. food, rent, utilities)
        #[arg(short, long)]
        category: Option<String>,

        /// Date as YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },

    /// Show all transactions with their list index
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Find transactions matching every given criterion
    Search {
        /// Exact date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Case-sensitive substring of the description
        #[arg(long)]
        description: Option<String>,

        /// Stored amount, optionally prefixed: +N or >N (at least), -N or <N (at most)
        ///
        /// Income is stored negative, so `-0` selects income.
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,

        /// Tag name (repeatable; matches any)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Category (shorthand for --tag category:<name>)
        #[arg(long)]
        category: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Remove the transaction at a list index
    Remove {
        /// Index shown by `slasher list`
        #[arg(allow_negative_numbers = true)]
        index: i64,
    },

    /// Edit the transaction at a list index (omitted fields are kept)
    Edit {
        /// Index shown by `slasher list`
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// New date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,

        /// New category; an empty string removes it
        #[arg(long)]
        category: Option<String>,

        /// New non-negative amount (keeps the current type unless --type is given)
        #[arg(long)]
        amount: Option<String>,

        /// New type: income or expense
        #[arg(long = "type")]
        kind: Option<String>,
    },

    /// Show total income, expenses and net
    Totals,

    /// Generate reports
    Report {
        #[command(subcommand)]
        report_type: ReportType,
    },

    /// Manage tags
    Tags {
        #[command(subcommand)]
        action: Option<TagsAction>,
    },

    /// Export all transactions to CSV
    Export {
        /// Output file
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub enum ReportType {
    /// Expense totals per category, largest first
    Category,

    /// Income, expenses and net per month
    Monthly,
}

#[derive(Subcommand)]
pub enum TagsAction {
    /// List all tags with usage counts
    List,

    /// Attach tags to the transaction at a list index
    Add {
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Detach tags from the transaction at a list index
    Remove {
        #[arg(allow_negative_numbers = true)]
        index: i64,

        /// Tag names
        #[arg(required = true)]
        tags: Vec<String>,
    },

    /// Delete tags from every transaction
    Delete {
        /// Tag names
        #[arg(required = true)]
        names: Vec<String>,
    },
}
