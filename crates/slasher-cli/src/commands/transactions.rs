//! Transaction command implementations

use anyhow::{Context, Result};
use slasher_core::models::CATEGORY_PREFIX;
use slasher_core::{
    parse_amount, parse_date, parse_transaction_type, AmountFilter, EntryEdit, IndexOutcome,
    NewEntry, TransactionFilter, TransactionRecord, TransactionService, TransactionType,
};

use super::{invalid_index_message, money, truncate};

/// Search criteria as given on the command line
pub struct SearchArgs<'a> {
    pub date: Option<&'a str>,
    pub description: Option<&'a str>,
    pub amount: Option<&'a str>,
    pub tags: &'a [String],
    pub category: Option<&'a str>,
}

/// Parse `[+|>|-|<]N` into an amount criterion
pub fn parse_amount_filter(input: &str) -> Result<AmountFilter> {
    let input = input.trim();
    let (token, value) = match input.chars().next() {
        Some('+' | '>' | '-' | '<') => input.split_at(1),
        _ => ("", input),
    };
    let value = parse_amount(value)?;
    Ok(AmountFilter::from_token(token, value))
}

/// Build a partial edit from optional command-line values
pub fn parse_edit(
    date: Option<&str>,
    description: Option<String>,
    category: Option<String>,
    amount: Option<&str>,
    kind: Option<&str>,
) -> Result<EntryEdit> {
    Ok(EntryEdit {
        date: date.map(parse_date).transpose()?,
        description,
        category,
        amount: amount.map(parse_amount).transpose()?,
        transaction_type: kind.map(parse_transaction_type).transpose()?,
    })
}

fn print_table(records: &[TransactionRecord], currency: &str) {
    println!(
        "   {:>3} │ {:<10} │ {:>12} │ {:<12} │ Description",
        "#", "Date", "Amount", "Category"
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for (index, record) in records.iter().enumerate() {
        let amount_str = match record.transaction_type {
            TransactionType::Expense => {
                format!("\x1b[31m{:>12}\x1b[0m", money(currency, record.amount)) // Red for expenses
            }
            TransactionType::Income => {
                format!("\x1b[32m{:>12}\x1b[0m", format!("+{}", money(currency, record.amount))) // Green for income
            }
        };

        println!(
            "   {:>3} │ {} │ {} │ {:<12} │ {}",
            index,
            record.date,
            amount_str,
            truncate(&record.category, 12),
            truncate(&record.description, 40)
        );
    }
}

fn describe(record: &TransactionRecord, currency: &str) -> String {
    let category = if record.category.is_empty() {
        String::new()
    } else {
        format!(" [{}]", record.category)
    };
    format!(
        "{} │ {} {} │ {}{}",
        record.date,
        record.transaction_type,
        money(currency, record.amount),
        record.description,
        category
    )
}

pub fn cmd_add(
    service: &TransactionService,
    description: &str,
    amount: &str,
    kind: &str,
    category: Option<&str>,
    date: Option<&str>,
) -> Result<()> {
    let entry = NewEntry {
        date: date.map(parse_date).transpose()?,
        description: description.to_string(),
        category: category.map(str::to_string),
        amount: parse_amount(amount)?,
        transaction_type: parse_transaction_type(kind)?,
    };

    let id = service.add(&entry).context("Failed to add transaction")?;
    println!("✅ Transaction added (id: {})", id);

    Ok(())
}

pub fn cmd_list(service: &TransactionService, json: bool, currency: &str) -> Result<()> {
    let records = service.list()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No transactions found. Add one with:");
        println!("  slasher add Coffee --amount 4.50 --category food");
        return Ok(());
    }

    println!();
    println!("📝 Transactions ({} total)", records.len());
    print_table(&records, currency);

    Ok(())
}

pub fn cmd_search(
    service: &TransactionService,
    args: &SearchArgs<'_>,
    json: bool,
    currency: &str,
) -> Result<()> {
    let date = args.date.map(parse_date).transpose()?;
    let amount = args.amount.map(parse_amount_filter).transpose()?;

    let mut tags: Vec<String> = args.tags.to_vec();
    if let Some(category) = args.category {
        tags.push(format!("{}{}", CATEGORY_PREFIX, category.trim()));
    }

    let filter = TransactionFilter::new()
        .date(date)
        .description(args.description)
        .amount(amount)
        .tags(Some(tags.as_slice()));
    let records = service.search(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No matching transactions.");
        return Ok(());
    }

    println!();
    println!("🔍 {} matching transaction(s)", records.len());
    println!("   ─────────────────────────────────────────────────────────────");
    for record in &records {
        println!("   [{}] {}", record.id, describe(record, currency));
    }

    Ok(())
}

pub fn cmd_remove(service: &TransactionService, index: i64, currency: &str) -> Result<()> {
    match service.remove_by_index(index)? {
        IndexOutcome::Found(record) => {
            println!("🗑️  Removed: {}", describe(&record, currency));
        }
        IndexOutcome::OutOfRange { count } => {
            println!("{}", invalid_index_message(count));
        }
    }

    Ok(())
}

pub fn cmd_edit(
    service: &TransactionService,
    index: i64,
    edit: &EntryEdit,
    currency: &str,
) -> Result<()> {
    if edit.is_empty() {
        println!("Nothing to change. Pass at least one of --date, --description, --category, --amount, --type.");
        return Ok(());
    }

    match service.edit_by_index(index, edit)? {
        IndexOutcome::Found(record) => {
            println!("✅ Updated: {}", describe(&record, currency));
        }
        IndexOutcome::OutOfRange { count } => {
            println!("{}", invalid_index_message(count));
        }
    }

    Ok(())
}
