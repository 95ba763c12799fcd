//! Expense Slasher CLI - Personal income and expense tracker
//!
//! Usage:
//!   slasher init                                    Initialize database
//!   slasher add Coffee --amount 4.50 --category food
//!   slasher list                                    Show transactions with their index
//!   slasher remove 0                                Remove by list index
//!   slasher report category                         Expenses per category

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::{Context, Result};
use clap::Parser;
use slasher_core::Config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load().context("Failed to load configuration")?;

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > config log_level
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    // --db wins over SLASHER_DB, which wins over the config file
    let db_path = cli.db.clone().unwrap_or(config.database_path.clone());
    let currency = config.currency_symbol.as_str();

    match cli.command {
        Commands::Init => commands::cmd_init(&db_path),
        Commands::Add {
            description,
            amount,
            kind,
            category,
            date,
        } => {
            let service = commands::open_service(&db_path)?;
            commands::cmd_add(
                &service,
                &description,
                &amount,
                &kind,
                category.as_deref(),
                date.as_deref(),
            )
        }
        Commands::List { json } => {
            let service = commands::open_service(&db_path)?;
            commands::cmd_list(&service, json, currency)
        }
        Commands::Search {
            date,
            description,
            amount,
            tags,
            category,
            json,
        } => {
            let service = commands::open_service(&db_path)?;
            let query = commands::SearchArgs {
                date: date.as_deref(),
                description: description.as_deref(),
                amount: amount.as_deref(),
                tags: &tags,
                category: category.as_deref(),
            };
            commands::cmd_search(&service, &query, json, currency)
        }
        Commands::Remove { index } => {
            let service = commands::open_service(&db_path)?;
            commands::cmd_remove(&service, index, currency)
        }
        Commands::Edit {
            index,
            date,
            description,
            category,
            amount,
            kind,
        } => {
            let service = commands::open_service(&db_path)?;
            let edit = commands::parse_edit(
                date.as_deref(),
                description,
                category,
                amount.as_deref(),
                kind.as_deref(),
            )?;
            commands::cmd_edit(&service, index, &edit, currency)
        }
        Commands::Totals => {
            let service = commands::open_service(&db_path)?;
            commands::cmd_totals(&service, currency)
        }
        Commands::Report { report_type } => {
            let service = commands::open_service(&db_path)?;
            match report_type {
                ReportType::Category => commands::cmd_report_category(&service, currency),
                ReportType::Monthly => commands::cmd_report_monthly(&service, currency),
            }
        }
        Commands::Tags { action } => {
            let service = commands::open_service(&db_path)?;
            match action {
                None | Some(TagsAction::List) => commands::cmd_tags_list(&service),
                Some(TagsAction::Add { index, tags }) => {
                    commands::cmd_tags_add(&service, index, &tags)
                }
                Some(TagsAction::Remove { index, tags }) => {
                    commands::cmd_tags_remove(&service, index, &tags)
                }
                Some(TagsAction::Delete { names }) => commands::cmd_tags_delete(&service, &names),
            }
        }
        Commands::Export { file } => {
            let service = commands::open_service(&db_path)?;
            commands::cmd_export(&service, &file)
        }
    }
}
