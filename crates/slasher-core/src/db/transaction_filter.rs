//! Transaction filter builder for constructing dynamic SQL queries
//!
//! Every supplied criterion becomes one condition; conditions are combined
//! with AND. Absent criteria do not restrict the result.

use chrono::NaiveDate;

/// Amount criterion, compared against the signed stored amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmountFilter {
    /// `amount = value`
    Exact(f64),
    /// `amount >= value`
    AtLeast(f64),
    /// `amount <= value`
    AtMost(f64),
}

impl AmountFilter {
    /// Interpret a comparator token: `+`/`>` is inclusive lower bound,
    /// `-`/`<` inclusive upper bound, anything else an exact match.
    pub fn from_token(token: &str, value: f64) -> Self {
        match token.trim() {
            "+" | ">" => Self::AtLeast(value),
            "-" | "<" => Self::AtMost(value),
            _ => Self::Exact(value),
        }
    }

    fn condition(&self) -> &'static str {
        match self {
            Self::Exact(_) => "t.amount = ?",
            Self::AtLeast(_) => "t.amount >= ?",
            Self::AtMost(_) => "t.amount <= ?",
        }
    }

    fn value(&self) -> f64 {
        match *self {
            Self::Exact(v) | Self::AtLeast(v) | Self::AtMost(v) => v,
        }
    }
}

/// Builder for constructing transaction query filters
///
/// The lifetime `'query` represents how long the borrowed search text and tag
/// names must remain valid.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter<'query> {
    pub date: Option<NaiveDate>,
    pub description: Option<&'query str>,
    pub amount: Option<AmountFilter>,
    pub tags: Option<&'query [String]>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Exact date match
    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    /// Case-sensitive substring of the description
    pub fn description(mut self, text: Option<&'query str>) -> Self {
        self.description = text;
        self
    }

    pub fn amount(mut self, amount: Option<AmountFilter>) -> Self {
        self.amount = amount;
        self
    }

    /// Transactions carrying at least one of these tag names
    pub fn tags(mut self, names: Option<&'query [String]>) -> Self {
        self.tags = names;
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(date) = self.date {
            conditions.push("t.date = ?".to_string());
            params.push(Box::new(date.to_string()));
        }

        // instr() rather than LIKE: LIKE ignores ASCII case in SQLite
        if let Some(text) = self.description.filter(|t| !t.is_empty()) {
            conditions.push("instr(t.description, ?) > 0".to_string());
            params.push(Box::new(text.to_string()));
        }

        if let Some(amount) = self.amount {
            conditions.push(amount.condition().to_string());
            params.push(Box::new(amount.value()));
        }

        // Subquery keeps every tag of a matching transaction in the aggregate
        if let Some(names) = self.tags.filter(|n| !n.is_empty()) {
            let placeholders: Vec<&str> = names.iter().map(|_| "?").collect();
            conditions.push(format!(
                "t.id IN (SELECT tt.transaction_id FROM transactions_tags tt \
                 JOIN tags g ON g.id = tt.tag_id WHERE g.name IN ({}))",
                placeholders.join(", ")
            ));
            for name in names {
                params.push(Box::new(name.clone()));
            }
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        FilterResult {
            where_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_tokens() {
        assert_eq!(AmountFilter::from_token("+", 5.0), AmountFilter::AtLeast(5.0));
        assert_eq!(AmountFilter::from_token(">", 5.0), AmountFilter::AtLeast(5.0));
        assert_eq!(AmountFilter::from_token("-", 5.0), AmountFilter::AtMost(5.0));
        assert_eq!(AmountFilter::from_token("<", 5.0), AmountFilter::AtMost(5.0));
        assert_eq!(AmountFilter::from_token("=", 5.0), AmountFilter::Exact(5.0));
        assert_eq!(AmountFilter::from_token("?", 5.0), AmountFilter::Exact(5.0));
    }

    #[test]
    fn test_empty_filter_has_no_where() {
        let result = TransactionFilter::new().build();
        assert!(result.where_clause.is_empty());
        assert!(result.params.is_empty());
    }

    #[test]
    fn test_conditions_are_anded() {
        let tags = vec!["a".to_string(), "b".to_string()];
        let result = TransactionFilter::new()
            .date(NaiveDate::from_ymd_opt(2024, 1, 5))
            .description(Some("Cof"))
            .amount(Some(AmountFilter::AtMost(10.0)))
            .tags(Some(tags.as_slice()))
            .build();

        assert!(result.where_clause.starts_with("WHERE t.date = ?"));
        assert_eq!(result.where_clause.matches(" AND ").count(), 3);
        assert!(result.where_clause.contains("t.amount <= ?"));
        assert!(result.where_clause.contains("IN (?, ?)"));
        assert_eq!(result.params.len(), 5);
    }

    #[test]
    fn test_empty_tag_list_is_ignored() {
        let tags: Vec<String> = Vec::new();
        let result = TransactionFilter::new().tags(Some(tags.as_slice())).build();
        assert!(result.where_clause.is_empty());
    }
}
