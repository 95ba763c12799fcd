//! Aggregates computed in SQL

use super::Database;
use crate::error::Result;
use crate::models::{MonthlySummary, Totals};

impl Database {
    /// Total income (magnitude of negative amounts) and expenses (non-negative amounts)
    pub fn transaction_totals(&self) -> Result<Totals> {
        let conn = self.conn()?;
        let (income, expenses): (f64, f64) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0.0 END), 0.0),
                COALESCE(SUM(CASE WHEN amount >= 0 THEN amount ELSE 0.0 END), 0.0)
            FROM transactions
            "#,
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(Totals::new(income, expenses))
    }

    /// Income, expenses and net per `YYYY-MM`, oldest month first
    pub fn monthly_breakdown(&self) -> Result<Vec<MonthlySummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT substr(date, 1, 7) AS month,
                   COALESCE(SUM(CASE WHEN amount < 0 THEN -amount ELSE 0.0 END), 0.0),
                   COALESCE(SUM(CASE WHEN amount >= 0 THEN amount ELSE 0.0 END), 0.0)
            FROM transactions
            GROUP BY month
            ORDER BY month ASC
            "#,
        )?;

        let months = stmt
            .query_map([], |row| {
                let income: f64 = row.get(1)?;
                let expenses: f64 = row.get(2)?;
                Ok(MonthlySummary {
                    month: row.get(0)?,
                    income,
                    expenses,
                    net: income - expenses,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(months)
    }
}
