//! Heuristic layout detection.
//!
//! Exports carry no format tag. Candidates are tried in a fixed order and the
//! first one whose fingerprint matches *and* which yields at least one record
//! wins. An error or an empty result from a candidate just moves on to the
//! next one.

use super::{
    AnthropicUsageParser, BedrockMetricsParser, Layout, LayoutParser, OpenAiUsageParser,
    ParseContext, RawInput,
};
use crate::error::{ObservatoryError, ObservatoryResult};
use crate::models::CallRecord;
use serde::Serialize;
use tracing::{debug, info};

/// Records normalized from one upload, with the layout they were read as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedUpload {
    pub layout: Layout,
    pub records: Vec<CallRecord>,
}

pub struct FormatDetector {
    candidates: Vec<Box<dyn LayoutParser + Send + Sync>>,
}

impl FormatDetector {
    /// Bedrock metrics first (it has an explicit marker), then Anthropic, then OpenAI.
    pub fn new() -> Self {
        let candidates: Vec<Box<dyn LayoutParser + Send + Sync>> = vec![
            Box::new(BedrockMetricsParser),
            Box::new(AnthropicUsageParser),
            Box::new(OpenAiUsageParser),
        ];
        Self::with_candidates(candidates)
    }

    pub fn with_candidates(candidates: Vec<Box<dyn LayoutParser + Send + Sync>>) -> Self {
        Self { candidates }
    }

    pub fn layouts(&self) -> Vec<Layout> {
        self.candidates.iter().map(|c| c.layout()).collect()
    }

    pub fn detect_and_parse(&self, bytes: &[u8], ctx: &ParseContext<'_>) -> ObservatoryResult<ParsedUpload> {
        let input = RawInput::from_bytes(bytes).map_err(|e| {
            debug!(error = %e, "Upload could not be decoded");
            ObservatoryError::UnrecognizedFormat
        })?;

        let upload = self.select(&input, ctx).ok_or(ObservatoryError::UnrecognizedFormat)?;
        info!(
            layout = %upload.layout,
            calls = upload.records.len(),
            "Detected {} format - parsed {} calls",
            upload.layout,
            upload.records.len()
        );
        Ok(upload)
    }

    /// First candidate producing a non-empty record set.
    pub fn select(&self, input: &RawInput, ctx: &ParseContext<'_>) -> Option<ParsedUpload> {
        self.candidates.iter().find_map(|candidate| {
            let layout = candidate.layout();
            if !candidate.detect(input) {
                debug!(%layout, "Not {layout} format: fingerprint not found");
                return None;
            }
            match candidate.parse(input, ctx) {
                Ok(records) if records.is_empty() => {
                    debug!(%layout, "Not {layout} format: no usable rows");
                    None
                }
                Ok(records) => Some(ParsedUpload { layout, records }),
                Err(e) => {
                    debug!(%layout, error = %e, "Not {layout} format");
                    None
                }
            }
        })
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the layout of `bytes` with built-in pricing and the default
/// Bedrock model assumption.
pub fn detect_and_parse(bytes: &[u8]) -> ObservatoryResult<ParsedUpload> {
    FormatDetector::new().detect_and_parse(bytes, &ParseContext::default())
}
