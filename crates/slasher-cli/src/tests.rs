//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use slasher_core::{AmountFilter, Database, EntryEdit, TransactionService, TransactionType};

use crate::commands::{self, invalid_index_message, money, truncate};

fn setup_test_service() -> TransactionService {
    TransactionService::new(Database::in_memory().unwrap())
}

/// Add a transaction through the command layer, returning its id
fn add(service: &TransactionService, description: &str, amount: &str, kind: &str, category: &str) -> i64 {
    commands::cmd_add(
        service,
        description,
        amount,
        kind,
        Some(category),
        Some("2024-01-05"),
    )
    .unwrap();
    service.list().unwrap().last().unwrap().id
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("a long description", 10), "a long ...");
    assert_eq!(truncate("café au lait", 7), "café...");
}

#[test]
fn test_money() {
    assert_eq!(money("$", 4.5), "$4.50");
    assert_eq!(money("€", -20.0), "-€20.00");
}

#[test]
fn test_invalid_index_message() {
    assert_eq!(
        invalid_index_message(3),
        "Invalid index. Must be between 0 and 2."
    );
    assert!(invalid_index_message(0).contains("No transactions"));
}

#[test]
fn test_parse_amount_filter() {
    assert_eq!(
        commands::parse_amount_filter("+50").unwrap(),
        AmountFilter::AtLeast(50.0)
    );
    assert_eq!(
        commands::parse_amount_filter(">12.5").unwrap(),
        AmountFilter::AtLeast(12.5)
    );
    assert_eq!(
        commands::parse_amount_filter("-0").unwrap(),
        AmountFilter::AtMost(0.0)
    );
    assert_eq!(
        commands::parse_amount_filter("<7").unwrap(),
        AmountFilter::AtMost(7.0)
    );
    assert_eq!(
        commands::parse_amount_filter("4.5").unwrap(),
        AmountFilter::Exact(4.5)
    );
    assert!(commands::parse_amount_filter("+abc").is_err());
}

#[test]
fn test_parse_edit() {
    let edit = commands::parse_edit(
        Some("2024-02-01"),
        None,
        Some(String::new()),
        Some("12"),
        Some("Income"),
    )
    .unwrap();
    assert_eq!(edit.date.unwrap().to_string(), "2024-02-01");
    assert_eq!(edit.category.as_deref(), Some(""));
    assert_eq!(edit.amount, Some(12.0));
    assert_eq!(edit.transaction_type, Some(TransactionType::Income));

    assert!(commands::parse_edit(Some("2024-13-01"), None, None, None, None).is_err());
    assert!(commands::parse_edit(None, None, None, None, Some("refund")).is_err());
    assert!(commands::parse_edit(None, None, None, None, None)
        .unwrap()
        .is_empty());
}

// ========== Core Command Tests ==========

#[test]
fn test_cmd_init_creates_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh.db");

    let result = commands::cmd_init(&path);
    assert!(result.is_ok());
    assert!(path.exists());

    // Running init again keeps the schema and data
    let service = commands::open_service(&path).unwrap();
    add(&service, "Coffee", "4.50", "expense", "Food");
    drop(service);
    assert!(commands::cmd_init(&path).is_ok());

    let service = commands::open_service(&path).unwrap();
    assert_eq!(service.list().unwrap().len(), 1);
}

#[test]
fn test_schema_tables_created_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.db");
    commands::open_db(&path).unwrap();

    let conn = rusqlite::Connection::open(&path).unwrap();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('transactions', 'tags', 'transactions_tags')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 3);
}

// ========== Transaction Command Tests ==========

#[test]
fn test_cmd_add() {
    let service = setup_test_service();
    let id = add(&service, "Paycheck", "2000", "income", "Salary");

    let record = service.get(id).unwrap();
    assert_eq!(record.amount, 2000.0);
    assert_eq!(record.transaction_type, TransactionType::Income);
    assert_eq!(record.category, "Salary");
}

#[test]
fn test_cmd_add_rejects_bad_input() {
    let service = setup_test_service();

    let result = commands::cmd_add(&service, "Coffee", "abc", "expense", None, None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("numeric"));

    let result = commands::cmd_add(&service, "Coffee", "4.5", "refund", None, None);
    assert!(result.is_err());

    let result = commands::cmd_add(&service, "Coffee", "4.5", "expense", None, Some("01/05/2024"));
    assert!(result.is_err());

    assert!(service.list().unwrap().is_empty());
}

#[test]
fn test_cmd_list() {
    let service = setup_test_service();
    assert!(commands::cmd_list(&service, false, "$").is_ok());

    add(&service, "Coffee", "4.50", "expense", "Food");
    assert!(commands::cmd_list(&service, false, "$").is_ok());
    assert!(commands::cmd_list(&service, true, "$").is_ok());
}

#[test]
fn test_cmd_search() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");
    add(&service, "Paycheck", "2000", "income", "Salary");

    let tags = vec!["lunch".to_string()];
    let query = commands::SearchArgs {
        date: Some("2024-01-05"),
        description: Some("Cof"),
        amount: Some("+1"),
        tags: &tags,
        category: Some("Food"),
    };
    assert!(commands::cmd_search(&service, &query, false, "$").is_ok());

    let bad = commands::SearchArgs {
        date: Some("yesterday"),
        description: None,
        amount: None,
        tags: &[],
        category: None,
    };
    assert!(commands::cmd_search(&service, &bad, true, "$").is_err());
}

#[test]
fn test_cmd_remove() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");
    add(&service, "Bagel", "3", "expense", "Food");

    // Out-of-range indexes report rather than fail
    assert!(commands::cmd_remove(&service, 2, "$").is_ok());
    assert!(commands::cmd_remove(&service, -1, "$").is_ok());
    assert_eq!(service.list().unwrap().len(), 2);

    assert!(commands::cmd_remove(&service, 0, "$").is_ok());
    let remaining = service.list().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].description, "Bagel");
}

#[test]
fn test_cmd_edit() {
    let service = setup_test_service();
    let id = add(&service, "Coffee", "4.50", "expense", "Food");

    let edit = EntryEdit {
        amount: Some(5.0),
        category: Some("Drinks".to_string()),
        ..Default::default()
    };
    assert!(commands::cmd_edit(&service, 0, &edit, "$").is_ok());

    let record = service.get(id).unwrap();
    assert_eq!(record.amount, 5.0);
    assert_eq!(record.transaction_type, TransactionType::Expense);
    assert_eq!(record.category, "Drinks");

    // Nothing to change and out-of-range are both reported without error
    assert!(commands::cmd_edit(&service, 0, &EntryEdit::default(), "$").is_ok());
    assert!(commands::cmd_edit(&service, 5, &edit, "$").is_ok());
}

#[test]
fn test_cmd_edit_rejects_blank_description() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");

    let edit = EntryEdit {
        description: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(commands::cmd_edit(&service, 0, &edit, "$").is_err());
    assert_eq!(service.list().unwrap()[0].description, "Coffee");
}

// ========== Report Command Tests ==========

#[test]
fn test_cmd_totals() {
    let service = setup_test_service();
    assert!(commands::cmd_totals(&service, "$").is_ok());

    add(&service, "Coffee", "4.50", "expense", "Food");
    add(&service, "Paycheck", "2000", "income", "Salary");
    assert!(commands::cmd_totals(&service, "$").is_ok());
}

#[test]
fn test_cmd_reports() {
    let service = setup_test_service();
    assert!(commands::cmd_report_category(&service, "$").is_ok());
    assert!(commands::cmd_report_monthly(&service, "$").is_ok());

    add(&service, "Coffee", "4.50", "expense", "Food");
    add(&service, "Bus", "2.50", "expense", "");
    assert!(commands::cmd_report_category(&service, "$").is_ok());
    assert!(commands::cmd_report_monthly(&service, "$").is_ok());
}

// ========== Tags Command Tests ==========

#[test]
fn test_cmd_tags_add_and_remove() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");

    let tags = vec!["morning".to_string()];
    assert!(commands::cmd_tags_add(&service, 0, &tags).is_ok());
    assert!(service.database().find_tag("morning").unwrap().is_some());
    assert!(commands::cmd_tags_list(&service).is_ok());

    assert!(commands::cmd_tags_remove(&service, 0, &tags).is_ok());
    assert!(service.database().find_tag("morning").unwrap().is_none());

    // Out of range is reported, reserved names are rejected
    assert!(commands::cmd_tags_add(&service, 9, &tags).is_ok());
    let reserved = vec!["category:Rent".to_string()];
    assert!(commands::cmd_tags_add(&service, 0, &reserved).is_err());
}

#[test]
fn test_cmd_tags_delete() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");
    add(&service, "Bagel", "3", "expense", "Food");

    let names = vec!["category:Food".to_string()];
    assert!(commands::cmd_tags_delete(&service, &names).is_ok());

    assert!(service.database().list_tags().unwrap().is_empty());
    assert!(service.list().unwrap().iter().all(|r| r.category.is_empty()));
    assert!(commands::cmd_tags_delete(&service, &names).is_ok());
}

// ========== Export Command Tests ==========

#[test]
fn test_cmd_export() {
    let service = setup_test_service();
    add(&service, "Coffee", "4.50", "expense", "Food");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    assert!(commands::cmd_export(&service, &path).is_ok());

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("id,date,description,category,amount,type"));
    assert_eq!(lines.next(), Some("1,2024-01-05,Coffee,Food,4.5,expense"));
}

#[test]
fn test_cmd_export_bad_path() {
    let service = setup_test_service();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");

    let result = commands::cmd_export(&service, &path);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("Failed to create"));
}
