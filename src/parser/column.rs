//! Typed column access for loosely specified CSV exports.
//!
//! Provider exports rename columns between versions, leave cells blank and
//! sometimes have no usable header at all. Each field is therefore described
//! by an ordered list of [`ColumnRef`]s; the first one that resolves to a
//! non-empty cell wins, otherwise the caller's default applies.

use csv::StringRecord;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Named(&'static str),
    Position(usize),
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRef::Named(name) => write!(f, "{name}"),
            ColumnRef::Position(index) => write!(f, "#{index}"),
        }
    }
}

/// A present cell whose content cannot be used for its field.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid value {value:?} in column {column}")]
pub struct FieldError {
    pub column: String,
    pub value: String,
}

/// Maps header names to positions. The first occurrence of a duplicated
/// header wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnResolver {
    index: HashMap<String, usize>,
}

impl ColumnResolver {
    pub fn new(headers: &StringRecord) -> Self {
        let mut index = HashMap::new();
        for (position, name) in headers.iter().enumerate() {
            index.entry(name.to_string()).or_insert(position);
        }
        Self { index }
    }

    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn has_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.index.contains_key(*name))
    }

    fn position(&self, column: ColumnRef) -> Option<usize> {
        match column {
            ColumnRef::Named(name) => self.position_of(name),
            ColumnRef::Position(index) => Some(index),
        }
    }

    pub fn row<'a>(&'a self, record: &'a StringRecord) -> RowView<'a> {
        RowView {
            columns: self,
            record,
        }
    }
}

/// One record seen through a [`ColumnResolver`].
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    columns: &'a ColumnResolver,
    record: &'a StringRecord,
}

impl<'a> RowView<'a> {
    /// First candidate resolving to a non-empty cell, with the column it came from.
    pub fn first_present(&self, candidates: &[ColumnRef]) -> Option<(ColumnRef, &'a str)> {
        candidates.iter().find_map(|column| {
            let value = self
                .columns
                .position(*column)
                .and_then(|index| self.record.get(index))
                .map(str::trim)?;
            (!value.is_empty()).then_some((*column, value))
        })
    }

    pub fn text_or(&self, candidates: &[ColumnRef], default: &str) -> String {
        self.first_present(candidates)
            .map(|(_, value)| value)
            .unwrap_or(default)
            .to_string()
    }

    /// Non-negative decimal; `default` when no candidate is present.
    pub fn decimal_or(&self, candidates: &[ColumnRef], default: f64) -> Result<f64, FieldError> {
        match self.first_present(candidates) {
            None => Ok(default),
            Some((column, value)) => parse_decimal(value).ok_or_else(|| FieldError {
                column: column.to_string(),
                value: value.to_string(),
            }),
        }
    }

    /// Non-negative count. Decimal text is accepted and truncated toward zero.
    pub fn count_or(&self, candidates: &[ColumnRef], default: u64) -> Result<u64, FieldError> {
        match self.first_present(candidates) {
            None => Ok(default),
            Some((column, value)) => value
                .parse::<u64>()
                .ok()
                .or_else(|| parse_decimal(value).map(|number| number.trunc() as u64))
                .ok_or_else(|| FieldError {
                    column: column.to_string(),
                    value: value.to_string(),
                }),
        }
    }
}

/// Parse a non-negative finite number, tolerating a currency sign and
/// thousands separators.
fn parse_decimal(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|number| number.is_finite() && *number >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMESTAMP: &[ColumnRef] = &[ColumnRef::Named("timestamp"), ColumnRef::Named("created_at")];

    fn record(fields: &[&str]) -> StringRecord {
        StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_first_candidate_wins() {
        let columns = ColumnResolver::new(&record(&["created_at", "timestamp"]));
        let row = record(&["2024-01-01", "2024-02-02"]);
        let view = columns.row(&row);
        assert_eq!(view.text_or(TIMESTAMP, ""), "2024-02-02");
    }

    #[test]
    fn test_falls_back_to_alternate_name() {
        let columns = ColumnResolver::new(&record(&["created_at", "model"]));
        let row = record(&["2024-01-01", "gpt-4"]);
        assert_eq!(columns.row(&row).text_or(TIMESTAMP, ""), "2024-01-01");
    }

    #[test]
    fn test_blank_cell_falls_through() {
        let columns = ColumnResolver::new(&record(&["timestamp", "created_at"]));
        let row = record(&["  ", "2024-01-01"]);
        assert_eq!(columns.row(&row).text_or(TIMESTAMP, ""), "2024-01-01");
    }

    #[test]
    fn test_default_when_nothing_present() {
        let columns = ColumnResolver::new(&record(&["model"]));
        let row = record(&["gpt-4"]);
        let view = columns.row(&row);
        assert_eq!(view.text_or(TIMESTAMP, "n/a"), "n/a");
        assert_eq!(view.count_or(&[ColumnRef::Named("input_tokens")], 0), Ok(0));
        assert_eq!(view.decimal_or(&[ColumnRef::Named("cost")], 0.0), Ok(0.0));
    }

    #[test]
    fn test_positional_access() {
        let columns = ColumnResolver::new(&record(&["Time", "Whatever"]));
        let row = record(&["2024-01-01", "42.9"]);
        let view = columns.row(&row);
        assert_eq!(view.count_or(&[ColumnRef::Position(1)], 0), Ok(42));
        assert_eq!(view.decimal_or(&[ColumnRef::Position(1)], 0.0), Ok(42.9));
        // beyond the end of a short row counts as absent
        assert_eq!(view.count_or(&[ColumnRef::Position(7)], 3), Ok(3));
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        let columns = ColumnResolver::new(&record(&["input_tokens", "cost"]));
        let row = record(&["lots", "-1.5"]);
        let view = columns.row(&row);

        let err = view.count_or(&[ColumnRef::Named("input_tokens")], 0).unwrap_err();
        assert_eq!(err.column, "input_tokens");
        assert_eq!(err.value, "lots");
        assert!(view.decimal_or(&[ColumnRef::Named("cost")], 0.0).is_err());
    }

    #[test]
    fn test_currency_and_separators() {
        let columns = ColumnResolver::new(&record(&["cost", "input_tokens"]));
        let row = record(&["$1,234.50", "1,000"]);
        let view = columns.row(&row);
        assert_eq!(view.decimal_or(&[ColumnRef::Named("cost")], 0.0), Ok(1234.5));
        assert_eq!(view.count_or(&[ColumnRef::Named("input_tokens")], 0), Ok(1000));
    }

    #[test]
    fn test_duplicate_headers_keep_first() {
        let columns = ColumnResolver::new(&record(&["model", "model"]));
        assert_eq!(columns.position_of("model"), Some(0));
        assert!(columns.has_any(&["cost", "model"]));
        assert!(!columns.has_any(&["cost"]));
    }
}
