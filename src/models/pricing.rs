use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Pricing applied to models the table does not know: the most expensive
/// known tier, so unknown models only get downgrade advice when it is clear.
pub const FALLBACK_PRICING: PricingEntry = PricingEntry {
    input_price_per_million: 30.0,
    output_price_per_million: 60.0,
    quality_score: 10.0,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingEntry {
    pub input_price_per_million: f64,  // USD per million input tokens
    pub output_price_per_million: f64, // USD per million output tokens
    pub quality_score: f64,            // Unitless rank, higher = more capable
}

impl PricingEntry {
    pub const fn new(input_price: f64, output_price: f64, quality_score: f64) -> Self {
        Self {
            input_price_per_million: input_price,
            output_price_per_million: output_price,
            quality_score,
        }
    }

    /// Cost in USD of a call with the given token counts.
    ///
    /// Takes floats so per-period averages can be priced without truncation.
    pub fn call_cost(&self, input_tokens: f64, output_tokens: f64) -> f64 {
        let input_cost = (input_tokens / 1_000_000.0) * self.input_price_per_million;
        let output_cost = (output_tokens / 1_000_000.0) * self.output_price_per_million;
        input_cost + output_cost
    }

    /// Price proxy used to rank models: input + output unit price.
    pub fn unit_price_sum(&self) -> f64 {
        self.input_price_per_million + self.output_price_per_million
    }
}

static BUILTIN: LazyLock<PricingTable> = LazyLock::new(PricingTable::new);

/// Static model pricing, ordered. Iteration order is the tie-break order
/// used by the optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingTable {
    entries: Vec<(String, PricingEntry)>,
}

impl PricingTable {
    /// Create a pricing table with the embedded default prices (per 1M tokens)
    pub fn new() -> Self {
        let entries = vec![
            // Anthropic
            ("claude-opus-4-20250514", PricingEntry::new(15.00, 75.00, 10.0)),
            ("claude-3-opus-20240229", PricingEntry::new(15.00, 75.00, 10.0)),
            ("claude-3-5-sonnet-20241022", PricingEntry::new(3.00, 15.00, 9.0)),
            ("claude-sonnet-4-5-20250929", PricingEntry::new(3.00, 15.00, 9.0)),
            ("claude-3-sonnet-20240229", PricingEntry::new(3.00, 15.00, 8.5)),
            ("claude-3-5-haiku-20241022", PricingEntry::new(0.80, 4.00, 7.5)),
            ("claude-3-haiku-20240307", PricingEntry::new(0.25, 1.25, 7.5)),
            // OpenAI
            ("gpt-4", PricingEntry::new(30.00, 60.00, 10.0)),
            ("gpt-4-turbo", PricingEntry::new(10.00, 30.00, 9.5)),
            ("gpt-4o", PricingEntry::new(2.50, 10.00, 9.5)),
            ("gpt-3.5-turbo", PricingEntry::new(0.50, 1.50, 7.0)),
        ];

        Self {
            entries: entries
                .into_iter()
                .map(|(model, pricing)| (model.to_string(), pricing))
                .collect(),
        }
    }

    /// Table with exactly these entries, in this order.
    pub fn from_entries(entries: Vec<(String, PricingEntry)>) -> Self {
        Self { entries }
    }

    /// Shared, immutable table with the embedded prices.
    pub fn builtin() -> &'static PricingTable {
        &BUILTIN
    }

    /// Copy of this table with overrides applied: known models are replaced in
    /// place, new models are appended in key order.
    pub fn with_overrides(&self, overrides: &BTreeMap<String, PricingEntry>) -> Self {
        let mut entries = self.entries.clone();
        for (model, pricing) in overrides {
            match entries.iter_mut().find(|(name, _)| name == model) {
                Some((_, existing)) => *existing = *pricing,
                None => entries.push((model.clone(), *pricing)),
            }
        }
        Self { entries }
    }

    /// Get pricing for a specific model
    pub fn lookup(&self, model: &str) -> Option<PricingEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == model)
            .map(|(_, pricing)| *pricing)
    }

    /// Get pricing, substituting the conservative fallback for unknown models
    pub fn lookup_or_fallback(&self, model: &str) -> PricingEntry {
        self.lookup(model).unwrap_or(FALLBACK_PRICING)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &PricingEntry)> {
        self.entries
            .iter()
            .map(|(name, pricing)| (name.as_str(), pricing))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PricingTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_cost_calculation() {
        let pricing = PricingEntry::new(3.0, 15.0, 9.0);

        // 1M tokens each
        let cost = pricing.call_cost(1_000_000.0, 1_000_000.0);
        assert!((cost - 18.0).abs() < 0.001, "Expected 18.0, got {}", cost);
    }

    #[test]
    fn test_call_cost_small_amounts() {
        let pricing = PricingEntry::new(15.0, 75.0, 10.0);

        let cost = pricing.call_cost(150.0, 50.0);
        let expected = 0.00225 + 0.00375;
        assert!((cost - expected).abs() < 1e-9, "Expected {}, got {}", expected, cost);
    }

    #[test]
    fn test_builtin_models_present() {
        let table = PricingTable::builtin();

        assert_eq!(table.len(), 11);
        assert!(table.lookup("claude-3-opus-20240229").is_some());
        assert!(table.lookup("claude-3-haiku-20240307").is_some());
        assert!(table.lookup("gpt-3.5-turbo").is_some());
    }

    #[test]
    fn test_lookup_unknown_model_is_none() {
        assert!(PricingTable::new().lookup("mystery-model").is_none());
    }

    #[test]
    fn test_fallback_for_unknown_model() {
        let pricing = PricingTable::new().lookup_or_fallback("mystery-model");
        assert_eq!(pricing, FALLBACK_PRICING);
        assert!((pricing.input_price_per_million - 30.0).abs() < f64::EPSILON);
        assert!((pricing.output_price_per_million - 60.0).abs() < f64::EPSILON);
        assert!((pricing.quality_score - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_iteration_order_is_stable() {
        let table = PricingTable::new();
        let names: Vec<&str> = table.entries().map(|(name, _)| name).collect();
        assert_eq!(names.first(), Some(&"claude-opus-4-20250514"));
        assert_eq!(names.last(), Some(&"gpt-3.5-turbo"));
    }

    #[test]
    fn test_overrides_replace_and_append() {
        let mut overrides = BTreeMap::new();
        overrides.insert("gpt-4o".to_string(), PricingEntry::new(2.0, 8.0, 9.5));
        overrides.insert("local-llama".to_string(), PricingEntry::new(0.0, 0.0, 6.0));

        let base = PricingTable::new();
        let table = base.with_overrides(&overrides);

        assert_eq!(table.len(), base.len() + 1);
        assert_eq!(table.lookup("gpt-4o"), Some(PricingEntry::new(2.0, 8.0, 9.5)));
        let names: Vec<&str> = table.entries().map(|(name, _)| name).collect();
        assert_eq!(names.last(), Some(&"local-llama"));
        // the source table is untouched
        assert_eq!(base.lookup("gpt-4o"), Some(PricingEntry::new(2.5, 10.0, 9.5)));
    }
}
