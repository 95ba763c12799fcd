//! Tag command implementations

use anyhow::Result;
use slasher_core::{IndexOutcome, TransactionService};

use super::invalid_index_message;

pub fn cmd_tags_list(service: &TransactionService) -> Result<()> {
    let tags = service.database().list_tags()?;

    if tags.is_empty() {
        println!("No tags found. Tags are created when transactions use them.");
        return Ok(());
    }

    println!();
    println!("🏷️  Tags");
    println!("   ─────────────────────────────────────────────────────────────");

    for tag in &tags {
        println!("   • {} ({})", tag.name, tag.transaction_count);
    }

    Ok(())
}

pub fn cmd_tags_add(service: &TransactionService, index: i64, tags: &[String]) -> Result<()> {
    match service.add_tags_by_index(index, tags)? {
        IndexOutcome::Found(record) => {
            println!("✅ Tagged '{}' with {}", record.description, tags.join(", "));
        }
        IndexOutcome::OutOfRange { count } => println!("{}", invalid_index_message(count)),
    }

    Ok(())
}

pub fn cmd_tags_remove(service: &TransactionService, index: i64, tags: &[String]) -> Result<()> {
    match service.remove_tags_by_index(index, tags)? {
        IndexOutcome::Found(record) => {
            println!("✅ Removed {} from '{}'", tags.join(", "), record.description);
        }
        IndexOutcome::OutOfRange { count } => println!("{}", invalid_index_message(count)),
    }

    Ok(())
}

pub fn cmd_tags_delete(service: &TransactionService, names: &[String]) -> Result<()> {
    let names: Vec<&str> = names.iter().map(|n| n.trim()).collect();
    let deleted = service.database().delete_tags(&names)?;

    if deleted == 0 {
        println!("No matching tags.");
    } else {
        println!("🗑️  Deleted {} tag(s) from all transactions", deleted);
    }

    Ok(())
}
