// Shared row mapping for per-call usage exports (one row = one call).
use super::column::{ColumnRef, FieldError, RowView};
use super::{Layout, LayoutError, RawInput};
use crate::models::CallRecord;
use tracing::debug;

/// Where each record field lives in a per-call export.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UsageSchema {
    pub layout: Layout,
    /// Header columns identifying the layout; at least one must be present.
    pub fingerprint: &'static [&'static str],
    pub timestamp: &'static [ColumnRef],
    pub model: &'static [ColumnRef],
    pub input_tokens: &'static [ColumnRef],
    pub output_tokens: &'static [ColumnRef],
    /// `None` when the layout never reports thinking tokens.
    pub thinking_tokens: Option<&'static [ColumnRef]>,
    pub cost: &'static [ColumnRef],
}

pub(crate) const UNKNOWN_MODEL: &str = "unknown";

impl UsageSchema {
    pub fn matches(&self, input: &RawInput) -> bool {
        input
            .headers(0)
            .map(|headers| {
                headers
                    .iter()
                    .any(|name| self.fingerprint.contains(&name))
            })
            .unwrap_or(false)
    }

    pub fn parse(&self, input: &RawInput) -> Result<Vec<CallRecord>, LayoutError> {
        let table = input.table(0)?;
        if !table.columns().has_any(self.fingerprint) {
            return Err(LayoutError::MissingColumns {
                expected: self.fingerprint.to_vec(),
            });
        }

        let mut calls = Vec::with_capacity(table.len());
        for (index, record) in table.rows().iter().enumerate() {
            match self.parse_row(&table.columns().row(record)) {
                Ok(call) => calls.push(call),
                Err(e) => {
                    debug!(layout = %self.layout, row = index + 1, error = %e, "Skipping usage row");
                }
            }
        }

        Ok(calls)
    }

    fn parse_row(&self, row: &RowView<'_>) -> Result<CallRecord, FieldError> {
        let thinking_tokens = match self.thinking_tokens {
            Some(columns) => row.count_or(columns, 0)?,
            None => 0,
        };

        Ok(CallRecord {
            timestamp: row.text_or(self.timestamp, ""),
            model: row.text_or(self.model, UNKNOWN_MODEL),
            input_tokens: row.count_or(self.input_tokens, 0)?,
            output_tokens: row.count_or(self.output_tokens, 0)?,
            thinking_tokens,
            cost: row.decimal_or(self.cost, 0.0)?,
            latency_ms: None,
            model_assumed: false,
        })
    }
}
