//! Model downgrade recommendations
//!
//! For each call the optimizer picks the cheapest model whose quality score
//! meets the floor of the call's complexity bucket. Models are ranked by the
//! sum of their input and output unit prices, which is a price proxy and not
//! a volume-weighted cost. Equal sums keep the pricing table's order, so the
//! first listed model wins a tie.

use super::complexity::{Complexity, classify};
use crate::error::ObservatoryResult;
use crate::models::{CallRecord, PricingEntry, PricingTable};
use serde::{Deserialize, Serialize};

/// Optimizer answer for one (model, complexity) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub model: String,
    pub pricing: PricingEntry,
    pub savings_potential: bool,
}

/// A call that could have run on a cheaper model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationOpportunity {
    pub timestamp: String,
    pub current_model: String,
    pub recommended_model: String,
    pub complexity: Complexity,
    pub current_cost: f64,
    pub optimal_cost: f64,
    pub savings: f64,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct Optimizer<'a> {
    pricing: &'a PricingTable,
}

impl<'a> Optimizer<'a> {
    pub fn new(pricing: &'a PricingTable) -> Self {
        Self { pricing }
    }

    /// Find the cheapest model that meets the quality floor of `complexity`
    pub fn recommend(&self, current_model: &str, complexity: Complexity) -> Recommendation {
        let min_quality = complexity.min_quality();
        let current_pricing = self.pricing.lookup_or_fallback(current_model);

        // min_by keeps the first of several equal minima
        let cheapest = self
            .pricing
            .entries()
            .filter(|(_, pricing)| pricing.quality_score >= min_quality)
            .min_by(|(_, a), (_, b)| a.unit_price_sum().total_cmp(&b.unit_price_sum()));

        match cheapest {
            Some((model, pricing)) if pricing.unit_price_sum() < current_pricing.unit_price_sum() => {
                Recommendation {
                    model: model.to_string(),
                    pricing: *pricing,
                    savings_potential: true,
                }
            }
            _ => Recommendation {
                model: current_model.to_string(),
                pricing: current_pricing,
                savings_potential: false,
            },
        }
    }

    /// Like [`Optimizer::recommend`] for a bucket given by name. Unknown
    /// names are a contract violation and fail loudly.
    pub fn recommend_bucket(&self, current_model: &str, bucket: &str) -> ObservatoryResult<Recommendation> {
        let complexity: Complexity = bucket.parse()?;
        Ok(self.recommend(current_model, complexity))
    }

    /// Classify `record`, and if a cheaper model qualifies, price the same
    /// tokens on both models.
    pub fn opportunity(&self, record: &CallRecord) -> Option<OptimizationOpportunity> {
        let complexity = classify(record.input_tokens);
        let recommendation = self.recommend(&record.model, complexity);
        if !recommendation.savings_potential {
            return None;
        }

        let input = record.input_tokens as f64;
        let output = record.output_tokens as f64;
        let current_cost = self
            .pricing
            .lookup_or_fallback(&record.model)
            .call_cost(input, output);
        let optimal_cost = recommendation.pricing.call_cost(input, output);

        Some(OptimizationOpportunity {
            timestamp: record.timestamp.clone(),
            current_model: record.model.clone(),
            recommended_model: recommendation.model,
            complexity,
            current_cost,
            optimal_cost,
            savings: current_cost - optimal_cost,
            input_tokens: record.input_tokens,
            output_tokens: record.output_tokens,
        })
    }
}
