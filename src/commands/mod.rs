// Command handlers module
pub mod analyze;
pub mod config;
pub mod pricing;
pub mod recommend;

// Re-export command handlers for easy access
pub use analyze::handle_analyze_command;
pub use config::handle_config_action;
pub use pricing::handle_pricing_command;
pub use recommend::handle_recommend_command;

use crate::error::ObservatoryError;
use crate::output::OutputFormat;
use serde_json::json;

/// Rendering choices shared by every command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub decimal_places: u8,
}

impl OutputOptions {
    pub fn render<T: OutputFormat>(&self, item: &T) -> anyhow::Result<String> {
        if self.json {
            Ok(item.to_json()?)
        } else {
            Ok(item.to_table_with_decimals(self.decimal_places))
        }
    }
}

/// Machine-readable error object printed on stdout when `--json` is set.
/// Core failures carry their stable code, everything else is `ERROR`.
pub fn error_json(err: &anyhow::Error) -> String {
    let code = err
        .downcast_ref::<ObservatoryError>()
        .map(ObservatoryError::code)
        .unwrap_or("ERROR");
    json!({
        "status": "error",
        "code": code,
        "message": format!("{err:#}"),
    })
    .to_string()
}
