//! Report command implementations

use anyhow::Result;
use slasher_core::TransactionService;

use super::{money, truncate};

pub fn cmd_totals(service: &TransactionService, currency: &str) -> Result<()> {
    let totals = service.totals()?;

    println!();
    println!("💰 Summary");
    println!("   ─────────────────────────────────────────");
    println!("   Total Income : {:>14}", money(currency, totals.income));
    println!("   Total Expense: {:>14}", money(currency, totals.expenses));
    println!("   Net Savings  : {:>14}", money(currency, totals.net));

    if let Some(ratio) = totals.expense_ratio() {
        println!("   Spent        : {:>13.1}% of income", ratio);
    }

    Ok(())
}

pub fn cmd_report_category(service: &TransactionService, currency: &str) -> Result<()> {
    let categories = service.expenses_by_category()?;

    if categories.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }

    let total: f64 = categories.iter().map(|c| c.total).sum();

    println!();
    println!("📊 Expenses by Category");
    println!("   ─────────────────────────────────────────────────────────────");

    for category in &categories {
        let pct = if total > 0.0 {
            category.total / total * 100.0
        } else {
            0.0
        };
        let bar_len = (pct / 5.0).round() as usize;
        println!(
            "   {:<20} {:>12} {:>5.1}% {}",
            truncate(&category.category, 20),
            money(currency, category.total),
            pct,
            "█".repeat(bar_len)
        );
    }

    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {:<20} {:>12}", "Total", money(currency, total));

    Ok(())
}

pub fn cmd_report_monthly(service: &TransactionService, currency: &str) -> Result<()> {
    let months = service.monthly_breakdown()?;

    if months.is_empty() {
        println!("No transactions recorded.");
        return Ok(());
    }

    println!();
    println!("📅 Monthly Breakdown");
    println!(
        "   {:<8} │ {:>12} │ {:>12} │ {:>12}",
        "Month", "Income", "Expenses", "Net"
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for month in &months {
        println!(
            "   {:<8} │ {:>12} │ {:>12} │ {:>12}",
            month.month,
            money(currency, month.income),
            money(currency, month.expenses),
            money(currency, month.net)
        );
    }

    Ok(())
}
