use serde::{Deserialize, Serialize};

/// One normalized LLM invocation, whatever layout it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    pub timestamp: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub thinking_tokens: u64,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<f64>,
    /// Set when the layout carries no model column and `model` is an assumption.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub model_assumed: bool,
}

impl CallRecord {
    pub fn new(timestamp: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            model: model.into(),
            input_tokens: 0,
            output_tokens: 0,
            thinking_tokens: 0,
            cost: 0.0,
            latency_ms: None,
            model_assumed: false,
        }
    }

    pub fn with_tokens(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.input_tokens = input_tokens;
        self.output_tokens = output_tokens;
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }
}
