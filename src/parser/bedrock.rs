//! AWS Bedrock CloudWatch metrics export.
//!
//! The export starts with a short metadata preamble naming the `AWS/Bedrock`
//! namespace, followed by a header and one row per time period. Each row holds
//! per-invocation *averages* and the number of invocations in the period:
//!
//! ```text
//! Time, InputTokenCount, InvocationLatency, Invocations, OutputTokenCount
//! ```
//!
//! Rows are expanded into one identical record per invocation. The export has
//! no model column, so every record is priced as the configured assumed model
//! and flagged with `model_assumed`.

use super::column::{ColumnRef, FieldError, RowView};
use super::{Layout, LayoutError, LayoutParser, ParseContext, RawInput};
use crate::models::CallRecord;
use tracing::debug;

pub const BEDROCK_MARKER: &str = "AWS/Bedrock";

/// Raw lines searched for [`BEDROCK_MARKER`].
pub const MARKER_LOOKAHEAD_LINES: usize = 5;

/// Raw lines before the header row.
pub const PREAMBLE_LINES: usize = 5;

/// Periods claiming more invocations than this are treated as malformed.
pub const MAX_INVOCATIONS_PER_PERIOD: u64 = 1_000_000;

/// Upper bound on records expanded from one export.
pub const MAX_EXPANDED_CALLS: usize = 10_000_000;

pub const DEFAULT_BEDROCK_MODEL: &str = "claude-sonnet-4-5-20250929";

const TIMESTAMP: &[ColumnRef] = &[ColumnRef::Position(0)];
const INPUT_TOKENS: &[ColumnRef] = &[ColumnRef::Position(1)];
const LATENCY: &[ColumnRef] = &[ColumnRef::Position(2)];
const INVOCATIONS: &[ColumnRef] = &[ColumnRef::Position(3)];
const OUTPUT_TOKENS: &[ColumnRef] = &[ColumnRef::Position(4)];

/// One metrics period before expansion.
#[derive(Debug, Clone, PartialEq)]
struct PeriodMetrics {
    timestamp: String,
    avg_input_tokens: f64,
    avg_latency_ms: f64,
    invocations: u64,
    avg_output_tokens: f64,
}

impl PeriodMetrics {
    /// `Ok(None)` for periods that carry no calls.
    fn from_row(row: &RowView<'_>) -> Result<Option<Self>, FieldError> {
        let Some((_, timestamp)) = row.first_present(TIMESTAMP) else {
            return Ok(None);
        };

        let invocations = row.decimal_or(INVOCATIONS, 0.0)?.trunc();
        if invocations > MAX_INVOCATIONS_PER_PERIOD as f64 {
            return Err(FieldError {
                column: INVOCATIONS[0].to_string(),
                value: invocations.to_string(),
            });
        }
        let invocations = invocations as u64;
        if invocations == 0 {
            return Ok(None);
        }

        Ok(Some(Self {
            timestamp: timestamp.to_string(),
            avg_input_tokens: row.decimal_or(INPUT_TOKENS, 0.0)?,
            avg_latency_ms: row.decimal_or(LATENCY, 0.0)?,
            invocations,
            avg_output_tokens: row.decimal_or(OUTPUT_TOKENS, 0.0)?,
        }))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BedrockMetricsParser;

impl LayoutParser for BedrockMetricsParser {
    fn layout(&self) -> Layout {
        Layout::BedrockMetrics
    }

    fn detect(&self, input: &RawInput) -> bool {
        input
            .leading_lines(MARKER_LOOKAHEAD_LINES)
            .any(|line| line.contains(BEDROCK_MARKER))
    }

    fn parse(&self, input: &RawInput, ctx: &ParseContext<'_>) -> Result<Vec<CallRecord>, LayoutError> {
        let table = input.table(PREAMBLE_LINES)?;
        let model = ctx.assumed_model;
        let pricing = ctx.pricing.lookup_or_fallback(model);

        let mut calls = Vec::new();
        for (index, record) in table.rows().iter().enumerate() {
            let period = match PeriodMetrics::from_row(&table.columns().row(record)) {
                Ok(Some(period)) => period,
                Ok(None) => continue,
                Err(e) => {
                    debug!(row = index + 1, error = %e, "Skipping Bedrock metrics row");
                    continue;
                }
            };

            let expanded = calls.len().saturating_add(period.invocations as usize);
            if expanded > MAX_EXPANDED_CALLS {
                debug!(row = index + 1, limit = MAX_EXPANDED_CALLS, "Skipping Bedrock metrics row: too many calls");
                continue;
            }

            // Priced from the untruncated averages
            let cost_per_call = pricing.call_cost(period.avg_input_tokens, period.avg_output_tokens);

            let call = CallRecord {
                timestamp: period.timestamp,
                model: model.to_string(),
                input_tokens: period.avg_input_tokens.trunc() as u64,
                output_tokens: period.avg_output_tokens.trunc() as u64,
                thinking_tokens: 0,
                cost: cost_per_call,
                latency_ms: Some(period.avg_latency_ms),
                model_assumed: true,
            };
            calls.extend(std::iter::repeat_n(call, period.invocations as usize));
        }

        Ok(calls)
    }
}
