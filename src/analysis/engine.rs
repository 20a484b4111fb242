//! Batch analytics over normalized call records.

use super::complexity::{Complexity, classify};
use super::optimization::{OptimizationOpportunity, Optimizer};
use crate::error::{ObservatoryError, ObservatoryResult};
use crate::models::{CallRecord, PricingTable};
use crate::utils::{hour_of, round_to};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Outliers always consider at least this many of the most expensive calls.
pub const MIN_OUTLIER_POOL: usize = 5;
/// Outlier pool grows to 1/20 (5%) of the batch, rounded up.
const OUTLIER_POOL_DIVISOR: usize = 20;
pub const MAX_REPORTED_OUTLIERS: usize = 10;
pub const MAX_REPORTED_OPPORTUNITIES: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_calls: usize,
    pub total_cost: f64,
    pub average_cost_per_call: f64,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_thinking_tokens: u64,
    pub potential_savings: f64,
    pub savings_percentage: f64,
    /// Calls whose model came from a layout assumption rather than the export.
    pub assumed_model_calls: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: Summary,
    pub model_distribution: BTreeMap<String, usize>,
    pub model_costs: BTreeMap<String, f64>,
    pub complexity_breakdown: BTreeMap<Complexity, usize>,
    pub outliers: Vec<CallRecord>,
    pub optimization_opportunities: Vec<OptimizationOpportunity>,
    pub hourly_costs: BTreeMap<u32, f64>,
}

/// Number of most expensive calls considered outliers for a batch of `total_calls`.
pub fn outlier_pool_size(total_calls: usize) -> usize {
    MIN_OUTLIER_POOL.max(total_calls.div_ceil(OUTLIER_POOL_DIVISOR))
}

#[derive(Debug, Clone, Copy)]
pub struct Analyzer<'a> {
    optimizer: Optimizer<'a>,
}

impl<'a> Analyzer<'a> {
    pub fn new(pricing: &'a PricingTable) -> Self {
        Self {
            optimizer: Optimizer::new(pricing),
        }
    }

    /// Analyze all calls and generate insights
    pub fn analyze(&self, records: &[CallRecord]) -> ObservatoryResult<AnalysisResult> {
        if records.is_empty() {
            return Err(ObservatoryError::EmptyInput);
        }

        let total_calls = records.len();
        let total_cost: f64 = records.iter().map(|r| r.cost).sum();
        // Token totals saturate; a single cell may already hold u64::MAX
        let total_input_tokens = saturating_total(records, |r| r.input_tokens);
        let total_output_tokens = saturating_total(records, |r| r.output_tokens);
        let total_thinking_tokens = saturating_total(records, |r| r.thinking_tokens);
        let assumed_model_calls = records.iter().filter(|r| r.model_assumed).count();

        // Model distribution, keyed by the model string as exported
        let mut model_distribution: BTreeMap<String, usize> = BTreeMap::new();
        let mut model_costs: BTreeMap<String, f64> = BTreeMap::new();
        for record in records {
            *model_distribution.entry(record.model.clone()).or_insert(0) += 1;
            *model_costs.entry(record.model.clone()).or_insert(0.0) += record.cost;
        }

        let outliers = Self::outliers(records);

        let mut optimization_opportunities = Vec::new();
        let mut potential_savings = 0.0;
        for opportunity in records.iter().filter_map(|r| self.optimizer.opportunity(r)) {
            potential_savings += opportunity.savings;
            if optimization_opportunities.len() < MAX_REPORTED_OPPORTUNITIES {
                optimization_opportunities.push(opportunity);
            }
        }

        let mut complexity_breakdown: BTreeMap<Complexity, usize> = BTreeMap::new();
        for record in records {
            *complexity_breakdown.entry(classify(record.input_tokens)).or_insert(0) += 1;
        }

        let mut hourly_costs: BTreeMap<u32, f64> = BTreeMap::new();
        let mut unparsed_timestamps = 0usize;
        for record in records {
            match hour_of(&record.timestamp) {
                Some(hour) => *hourly_costs.entry(hour).or_insert(0.0) += record.cost,
                None => unparsed_timestamps += 1,
            }
        }
        if unparsed_timestamps > 0 {
            debug!(count = unparsed_timestamps, "Calls left out of hourly costs: unparsable timestamp");
        }

        let average_cost_per_call = if total_calls > 0 {
            total_cost / total_calls as f64
        } else {
            0.0
        };
        let savings_percentage = if total_cost > 0.0 {
            potential_savings / total_cost * 100.0
        } else {
            0.0
        };

        Ok(AnalysisResult {
            summary: Summary {
                total_calls,
                total_cost: round_to(total_cost, 2),
                average_cost_per_call: round_to(average_cost_per_call, 4),
                total_input_tokens,
                total_output_tokens,
                total_thinking_tokens,
                potential_savings: round_to(potential_savings, 2),
                savings_percentage: round_to(savings_percentage, 1),
                assumed_model_calls,
            },
            model_distribution,
            model_costs: round_values(model_costs),
            complexity_breakdown,
            outliers,
            optimization_opportunities,
            hourly_costs: round_values(hourly_costs),
        })
    }

    /// Most expensive calls, highest cost first. Equal costs keep record order.
    fn outliers(records: &[CallRecord]) -> Vec<CallRecord> {
        let mut by_cost: Vec<&CallRecord> = records.iter().collect();
        by_cost.sort_by(|a, b| b.cost.total_cmp(&a.cost));

        let pool = outlier_pool_size(records.len());
        by_cost
            .into_iter()
            .take(pool.min(MAX_REPORTED_OUTLIERS))
            .cloned()
            .collect()
    }
}

fn saturating_total(records: &[CallRecord], tokens: impl Fn(&CallRecord) -> u64) -> u64 {
    records
        .iter()
        .fold(0u64, |total, record| total.saturating_add(tokens(record)))
}

fn round_values<K: Ord>(map: BTreeMap<K, f64>) -> BTreeMap<K, f64> {
    map.into_iter()
        .map(|(key, value)| (key, round_to(value, 2)))
        .collect()
}

/// Analyze `records` against the built-in pricing table.
pub fn analyze(records: &[CallRecord]) -> ObservatoryResult<AnalysisResult> {
    Analyzer::new(PricingTable::builtin()).analyze(records)
}
