//! OpenAI usage export. Older exports name token columns
//! `n_context_tokens_total` / `n_generated_tokens_total`.

use super::column::ColumnRef;
use super::usage::UsageSchema;
use super::{Layout, LayoutError, LayoutParser, ParseContext, RawInput};
use crate::models::CallRecord;

pub(crate) const SCHEMA: UsageSchema = UsageSchema {
    layout: Layout::OpenAiUsage,
    fingerprint: &[
        "prompt_tokens",
        "completion_tokens",
        "n_context_tokens_total",
        "n_generated_tokens_total",
    ],
    timestamp: &[ColumnRef::Named("timestamp"), ColumnRef::Named("created")],
    model: &[ColumnRef::Named("model")],
    input_tokens: &[
        ColumnRef::Named("prompt_tokens"),
        ColumnRef::Named("n_context_tokens_total"),
    ],
    output_tokens: &[
        ColumnRef::Named("completion_tokens"),
        ColumnRef::Named("n_generated_tokens_total"),
    ],
    thinking_tokens: None,
    cost: &[ColumnRef::Named("cost")],
};

#[derive(Debug, Clone, Copy, Default)]
pub struct OpenAiUsageParser;

impl LayoutParser for OpenAiUsageParser {
    fn layout(&self) -> Layout {
        Layout::OpenAiUsage
    }

    fn detect(&self, input: &RawInput) -> bool {
        SCHEMA.matches(input)
    }

    fn parse(&self, input: &RawInput, _ctx: &ParseContext<'_>) -> Result<Vec<CallRecord>, LayoutError> {
        SCHEMA.parse(input)
    }
}
