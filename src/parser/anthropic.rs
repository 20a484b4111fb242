//! Anthropic console usage export.

use super::column::ColumnRef;
use super::usage::UsageSchema;
use super::{Layout, LayoutError, LayoutParser, ParseContext, RawInput};
use crate::models::CallRecord;

pub(crate) const SCHEMA: UsageSchema = UsageSchema {
    layout: Layout::AnthropicUsage,
    fingerprint: &["input_tokens", "output_tokens", "cache_creation_input_tokens"],
    timestamp: &[ColumnRef::Named("timestamp"), ColumnRef::Named("created_at")],
    model: &[ColumnRef::Named("model")],
    input_tokens: &[ColumnRef::Named("input_tokens")],
    output_tokens: &[ColumnRef::Named("output_tokens")],
    // Cache creation is the closest thing the export has to thinking tokens
    thinking_tokens: Some(&[ColumnRef::Named("cache_creation_input_tokens")]),
    cost: &[ColumnRef::Named("cost")],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnthropicUsageParser;

impl LayoutParser for AnthropicUsageParser {
    fn layout(&self) -> Layout {
        Layout::AnthropicUsage
    }

    fn detect(&self, input: &RawInput) -> bool {
        SCHEMA.matches(input)
    }

    fn parse(&self, input: &RawInput, _ctx: &ParseContext<'_>) -> Result<Vec<CallRecord>, LayoutError> {
        SCHEMA.parse(input)
    }
}
