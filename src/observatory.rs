//! One entry point bundling pricing, format detection and analytics.

use crate::analysis::{AnalysisResult, Analyzer, Optimizer, Recommendation};
use crate::config::Config;
use crate::error::ObservatoryResult;
use crate::models::{CallRecord, PricingTable};
use crate::parser::{DEFAULT_BEDROCK_MODEL, FormatDetector, ParseContext, ParsedUpload};

pub struct Observatory {
    pricing: PricingTable,
    assumed_model: String,
    detector: FormatDetector,
}

impl Observatory {
    /// Built-in pricing and the default Bedrock model assumption.
    pub fn new() -> Self {
        Self::with_pricing(PricingTable::builtin().clone(), DEFAULT_BEDROCK_MODEL)
    }

    pub fn with_pricing(pricing: PricingTable, assumed_model: impl Into<String>) -> Self {
        Self {
            pricing,
            assumed_model: assumed_model.into(),
            detector: FormatDetector::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_pricing(config.pricing_table(), config.parser.bedrock_default_model.clone())
    }

    pub fn pricing(&self) -> &PricingTable {
        &self.pricing
    }

    pub fn assumed_model(&self) -> &str {
        &self.assumed_model
    }

    pub fn detect_and_parse(&self, bytes: &[u8]) -> ObservatoryResult<ParsedUpload> {
        let ctx = ParseContext {
            pricing: &self.pricing,
            assumed_model: &self.assumed_model,
        };
        self.detector.detect_and_parse(bytes, &ctx)
    }

    pub fn analyze(&self, records: &[CallRecord]) -> ObservatoryResult<AnalysisResult> {
        Analyzer::new(&self.pricing).analyze(records)
    }

    pub fn recommend(&self, current_model: &str, bucket: &str) -> ObservatoryResult<Recommendation> {
        Optimizer::new(&self.pricing).recommend_bucket(current_model, bucket)
    }
}

impl Default for Observatory {
    fn default() -> Self {
        Self::new()
    }
}
