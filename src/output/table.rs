use crate::analysis::{AnalysisResult, Recommendation};
use crate::models::{CallRecord, PricingEntry, PricingTable};
use crate::utils::{format_currency, format_number};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Per-call amounts are fractions of a cent; they always get this many places.
const PER_CALL_DECIMAL_PLACES: u8 = 4;
const DEFAULT_DECIMAL_PLACES: u8 = 2;

/// Trait for items that can be displayed as tables or JSON
pub trait OutputFormat {
    fn to_table_with_decimals(&self, decimal_places: u8) -> String;
    fn to_json(&self) -> Result<String, serde_json::Error>;

    fn to_table(&self) -> String {
        self.to_table_with_decimals(DEFAULT_DECIMAL_PLACES)
    }
}

#[derive(Tabled, Debug)]
pub struct SummaryRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Row for model usage breakdown table
#[derive(Tabled, Debug)]
pub struct ModelRow {
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Calls")]
    pub calls: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
}

#[derive(Tabled, Debug)]
pub struct ComplexityRow {
    #[tabled(rename = "Complexity")]
    pub complexity: String,
    #[tabled(rename = "Calls")]
    pub calls: String,
}

#[derive(Tabled, Debug)]
pub struct HourlyRow {
    #[tabled(rename = "Hour")]
    pub hour: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
}

/// Row for the most expensive calls
#[derive(Tabled, Debug)]
pub struct CallRow {
    #[tabled(rename = "Timestamp")]
    pub timestamp: String,
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Input Tokens")]
    pub input_tokens: String,
    #[tabled(rename = "Output Tokens")]
    pub output_tokens: String,
    #[tabled(rename = "Cost")]
    pub cost: String,
}

#[derive(Tabled, Debug)]
pub struct OpportunityRow {
    #[tabled(rename = "Timestamp")]
    pub timestamp: String,
    #[tabled(rename = "Current Model")]
    pub current_model: String,
    #[tabled(rename = "Recommended")]
    pub recommended_model: String,
    #[tabled(rename = "Complexity")]
    pub complexity: String,
    #[tabled(rename = "Current Cost")]
    pub current_cost: String,
    #[tabled(rename = "Optimal Cost")]
    pub optimal_cost: String,
    #[tabled(rename = "Savings")]
    pub savings: String,
}

#[derive(Tabled, Debug)]
pub struct PricingRow {
    #[tabled(rename = "Model")]
    pub model: String,
    #[tabled(rename = "Input $/1M")]
    pub input: String,
    #[tabled(rename = "Output $/1M")]
    pub output: String,
    #[tabled(rename = "Quality")]
    pub quality: String,
}

impl CallRow {
    pub fn from_record(record: &CallRecord) -> Self {
        let model = if record.model_assumed {
            format!("{} (assumed)", record.model)
        } else {
            record.model.clone()
        };
        Self {
            timestamp: record.timestamp.clone(),
            model,
            input_tokens: format_number(record.input_tokens),
            output_tokens: format_number(record.output_tokens),
            cost: format_currency(record.cost, PER_CALL_DECIMAL_PLACES),
        }
    }
}

impl PricingRow {
    pub fn from_entry(model: &str, pricing: &PricingEntry) -> Self {
        Self {
            model: model.to_string(),
            input: format!("{:.2}", pricing.input_price_per_million),
            output: format!("{:.2}", pricing.output_price_per_million),
            quality: format!("{:.1}", pricing.quality_score),
        }
    }
}

fn styled<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.to_string()
}

fn section(title: &str, body: String) -> String {
    format!("{title}\n{body}")
}

impl OutputFormat for AnalysisResult {
    fn to_table_with_decimals(&self, decimal_places: u8) -> String {
        let summary = &self.summary;
        let mut summary_rows = vec![
            SummaryRow {
                metric: "Total Calls".to_string(),
                value: format_number(summary.total_calls as u64),
            },
            SummaryRow {
                metric: "Total Cost".to_string(),
                value: format_currency(summary.total_cost, decimal_places),
            },
            SummaryRow {
                metric: "Average Cost / Call".to_string(),
                value: format_currency(summary.average_cost_per_call, PER_CALL_DECIMAL_PLACES),
            },
            SummaryRow {
                metric: "Input Tokens".to_string(),
                value: format_number(summary.total_input_tokens),
            },
            SummaryRow {
                metric: "Output Tokens".to_string(),
                value: format_number(summary.total_output_tokens),
            },
            SummaryRow {
                metric: "Thinking Tokens".to_string(),
                value: format_number(summary.total_thinking_tokens),
            },
            SummaryRow {
                metric: "Potential Savings".to_string(),
                value: format!(
                    "{} ({:.1}%)",
                    format_currency(summary.potential_savings, decimal_places),
                    summary.savings_percentage
                ),
            },
        ];
        if summary.assumed_model_calls > 0 {
            summary_rows.push(SummaryRow {
                metric: "Calls With Assumed Model".to_string(),
                value: format_number(summary.assumed_model_calls as u64),
            });
        }

        let model_rows: Vec<ModelRow> = self
            .model_distribution
            .iter()
            .map(|(model, calls)| ModelRow {
                model: model.clone(),
                calls: format_number(*calls as u64),
                cost: format_currency(
                    self.model_costs.get(model).copied().unwrap_or(0.0),
                    decimal_places,
                ),
            })
            .collect();

        let complexity_rows: Vec<ComplexityRow> = self
            .complexity_breakdown
            .iter()
            .map(|(complexity, calls)| ComplexityRow {
                complexity: complexity.to_string(),
                calls: format_number(*calls as u64),
            })
            .collect();

        let mut sections = vec![
            section("Summary", styled(summary_rows)),
            section("Models", styled(model_rows)),
            section("Complexity", styled(complexity_rows)),
        ];

        if self.hourly_costs.is_empty() {
            sections.push("No hourly costs (no parsable timestamps).".to_string());
        } else {
            let hourly_rows: Vec<HourlyRow> = self
                .hourly_costs
                .iter()
                .map(|(hour, cost)| HourlyRow {
                    hour: format!("{hour:02}:00"),
                    cost: format_currency(*cost, decimal_places),
                })
                .collect();
            sections.push(section("Hourly Costs", styled(hourly_rows)));
        }

        let outlier_rows: Vec<CallRow> = self.outliers.iter().map(CallRow::from_record).collect();
        sections.push(section("Most Expensive Calls", styled(outlier_rows)));

        if self.optimization_opportunities.is_empty() {
            sections.push("No optimization opportunities found.".to_string());
        } else {
            let opportunity_rows: Vec<OpportunityRow> = self
                .optimization_opportunities
                .iter()
                .map(|o| OpportunityRow {
                    timestamp: o.timestamp.clone(),
                    current_model: o.current_model.clone(),
                    recommended_model: o.recommended_model.clone(),
                    complexity: o.complexity.to_string(),
                    current_cost: format_currency(o.current_cost, PER_CALL_DECIMAL_PLACES),
                    optimal_cost: format_currency(o.optimal_cost, PER_CALL_DECIMAL_PLACES),
                    savings: format_currency(o.savings, PER_CALL_DECIMAL_PLACES),
                })
                .collect();
            sections.push(section("Optimization Opportunities", styled(opportunity_rows)));
        }

        sections.join("\n\n")
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Pricing entry flattened next to its model id for JSON listings.
#[derive(Serialize, Debug)]
struct PricedModel<'a> {
    model: &'a str,
    #[serde(flatten)]
    pricing: &'a PricingEntry,
}

impl OutputFormat for PricingTable {
    fn to_table_with_decimals(&self, _decimal_places: u8) -> String {
        if self.is_empty() {
            return "No pricing entries.".to_string();
        }

        let rows: Vec<PricingRow> = self
            .entries()
            .map(|(model, pricing)| PricingRow::from_entry(model, pricing))
            .collect();

        styled(rows)
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        let listing: Vec<PricedModel<'_>> = self
            .entries()
            .map(|(model, pricing)| PricedModel { model, pricing })
            .collect();
        serde_json::to_string_pretty(&listing)
    }
}

impl OutputFormat for Recommendation {
    fn to_table_with_decimals(&self, _decimal_places: u8) -> String {
        let verdict = if self.savings_potential {
            format!("Switch to {} to save.", self.model)
        } else {
            format!("Keep {}: no cheaper model meets the quality floor.", self.model)
        };
        format!(
            "{}\n{verdict}",
            styled(vec![PricingRow::from_entry(&self.model, &self.pricing)])
        )
    }

    fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
