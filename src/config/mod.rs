// Configuration module
pub mod settings;

pub use settings::{Config, OutputConfig, ParserConfig, PricingConfig, PricingOverride};
