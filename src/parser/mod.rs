//! Format detection and normalization of provider usage exports.

pub mod anthropic;
pub mod bedrock;
pub mod column;
pub mod detector;
pub mod openai;
pub mod table;
mod usage;

pub use anthropic::AnthropicUsageParser;
pub use bedrock::{BedrockMetricsParser, DEFAULT_BEDROCK_MODEL};
pub use column::{ColumnRef, ColumnResolver, FieldError, RowView};
pub use detector::{FormatDetector, ParsedUpload, detect_and_parse};
pub use openai::OpenAiUsageParser;
pub use table::{RawInput, RawTable};

use crate::models::{CallRecord, PricingTable};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Source layouts the detector knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// AWS Bedrock CloudWatch metrics: per-period averages with an invocation count.
    BedrockMetrics,
    /// Anthropic console usage export, one row per call.
    AnthropicUsage,
    /// OpenAI usage export, one row per call.
    OpenAiUsage,
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layout::BedrockMetrics => write!(f, "AWS Bedrock CloudWatch"),
            Layout::AnthropicUsage => write!(f, "Anthropic"),
            Layout::OpenAiUsage => write!(f, "OpenAI"),
        }
    }
}

/// Structural failure of one layout candidate. Makes the detector move on.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("input is not valid UTF-8")]
    InvalidEncoding,

    #[error("no header row found")]
    MissingHeader,

    #[error("none of the expected columns present: {}", expected.join(", "))]
    MissingColumns { expected: Vec<&'static str> },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Read-only collaborators a layout parser may consult.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    pub pricing: &'a PricingTable,
    /// Model assumed for layouts that carry no per-row model column.
    pub assumed_model: &'a str,
}

impl Default for ParseContext<'static> {
    fn default() -> Self {
        Self {
            pricing: PricingTable::builtin(),
            assumed_model: DEFAULT_BEDROCK_MODEL,
        }
    }
}

/// One candidate in the detector's ordered list.
pub trait LayoutParser {
    fn layout(&self) -> Layout;

    /// Cheap structural fingerprint check.
    fn detect(&self, input: &RawInput) -> bool;

    /// Convert rows to call records. Bad rows are skipped, never returned as errors.
    fn parse(&self, input: &RawInput, ctx: &ParseContext<'_>) -> Result<Vec<CallRecord>, LayoutError>;
}
