//! CSV export of user-facing transaction records
//!
//! Columns: id, date, description, category, amount, type

use std::io::Write;

use crate::error::Result;
use crate::models::TransactionRecord;

/// Write records as CSV with a header row; returns the number of records written
pub fn write_csv<W: Write>(records: &[TransactionRecord], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    if records.is_empty() {
        // serialize() only emits the header alongside the first record
        csv.write_record(["id", "date", "description", "category", "amount", "type"])?;
    }
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;

    Ok(records.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionType;
    use chrono::NaiveDate;

    #[test]
    fn test_write_csv_quotes_fields() {
        let records = vec![TransactionRecord {
            id: 1,
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            description: "Coffee, large".to_string(),
            category: "Food".to_string(),
            amount: 4.5,
            transaction_type: TransactionType::Expense,
        }];

        let mut out = Vec::new();
        let written = write_csv(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(written, 1);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("id,date,description,category,amount,type"));
        assert_eq!(lines.next(), Some("1,2024-01-05,\"Coffee, large\",Food,4.5,expense"));
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let mut out = Vec::new();
        assert_eq!(write_csv(&[], &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,date,description,category,amount,type\n"
        );
    }
}
