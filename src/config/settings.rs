use crate::models::{PricingEntry, PricingTable};
use crate::parser::DEFAULT_BEDROCK_MODEL;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const MAX_DECIMAL_PLACES: u8 = 10;
const OVERRIDE_KEY_PREFIX: &str = "pricing.overrides.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub parser: ParserConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Model assigned to layouts that carry no model column
    pub bedrock_default_model: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: String, // "table" or "json"
    pub decimal_places: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    #[serde(default)]
    pub overrides: BTreeMap<String, PricingOverride>,
}

/// Replacement (or additional) pricing for one model, per million tokens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingOverride {
    pub input: f64,
    pub output: f64,
    pub quality: f64,
}

impl PricingOverride {
    fn is_valid(&self) -> bool {
        [self.input, self.output, self.quality]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

impl From<PricingEntry> for PricingOverride {
    fn from(entry: PricingEntry) -> Self {
        Self {
            input: entry.input_price_per_million,
            output: entry.output_price_per_million,
            quality: entry.quality_score,
        }
    }
}

impl From<PricingOverride> for PricingEntry {
    fn from(o: PricingOverride) -> Self {
        PricingEntry::new(o.input, o.output, o.quality)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parser: ParserConfig {
                bedrock_default_model: DEFAULT_BEDROCK_MODEL.to_string(),
            },
            output: OutputConfig {
                format: "table".to_string(),
                decimal_places: 2,
            },
            pricing: PricingConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or the default location when `None`. A missing file
    /// is created with the defaults.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = Self::resolve_path(path)?;

        if !config_path.exists() {
            debug!(path = %config_path.display(), "Config file not found, writing defaults");
            let config = Self::default();
            config.save_to(&config_path)?;
            return Ok(config);
        }

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        let contents = self.to_commented_toml()?;

        fs::write(config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

        Ok(())
    }

    /// Generate TOML configuration with comments explaining every option
    pub fn to_commented_toml(&self) -> Result<String> {
        let mut output = String::new();

        output.push_str("# llm-observatory Configuration File\n");
        output.push_str("#\n");
        output.push_str("# All settings have defaults; --json and --config override them per run.\n");
        output.push('\n');

        output.push_str("[parser]\n");
        output.push_str("# Model assumed for AWS Bedrock CloudWatch exports, which carry no model column.\n");
        output.push_str("# Calls priced this way are reported as \"assumed\".\n");
        output.push_str(&format!(
            "bedrock_default_model = {}\n",
            toml::Value::String(self.parser.bedrock_default_model.clone())
        ));
        output.push('\n');

        output.push_str("[output]\n");
        output.push_str("# Default output format:\n");
        output.push_str("#   \"table\" - Human-readable tables\n");
        output.push_str("#   \"json\"  - Machine-readable JSON\n");
        output.push_str(&format!("format = \"{}\"\n", self.output.format));
        output.push('\n');
        output.push_str("# Decimal places for totals in tables (0-10). JSON output is not affected.\n");
        output.push_str(&format!("decimal_places = {}\n", self.output.decimal_places));
        output.push('\n');

        output.push_str("[pricing]\n");
        output.push_str("# Per-model price overrides in USD per million tokens. Known models are\n");
        output.push_str("# replaced, unknown models are added. Example:\n");
        output.push_str("#\n");
        output.push_str("# [pricing.overrides.\"gpt-4o\"]\n");
        output.push_str("# input = 2.5\n");
        output.push_str("# output = 10.0\n");
        output.push_str("# quality = 9.5\n");
        for (model, pricing) in &self.pricing.overrides {
            output.push('\n');
            output.push_str(&format!(
                "[pricing.overrides.{}]\n",
                toml::Value::String(model.clone())
            ));
            output.push_str(&format!("input = {:?}\n", pricing.input));
            output.push_str(&format!("output = {:?}\n", pricing.output));
            output.push_str(&format!("quality = {:?}\n", pricing.quality));
        }

        Ok(output)
    }

    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to determine home directory")?;
        Ok(home.join(".config").join("llm-observatory").join("config.toml"))
    }

    pub fn resolve_path(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::default_path(),
        }
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        if let Some(rest) = key.strip_prefix(OVERRIDE_KEY_PREFIX) {
            return self.set_override(rest, value);
        }

        match key {
            "parser.bedrock_default_model" => {
                let model = value.trim();
                if model.is_empty() {
                    anyhow::bail!("bedrock_default_model must not be empty");
                }
                self.parser.bedrock_default_model = model.to_string();
            }
            "output.format" => {
                if !["table", "json"].contains(&value) {
                    anyhow::bail!("Invalid output format: {}. Must be 'table' or 'json'", value);
                }
                self.output.format = value.to_string();
            }
            "output.decimal_places" => {
                let places: u8 = value
                    .parse()
                    .with_context(|| format!("Invalid decimal places value: {}", value))?;
                if places > MAX_DECIMAL_PLACES {
                    anyhow::bail!("Decimal places must be between 0 and {}", MAX_DECIMAL_PLACES);
                }
                self.output.decimal_places = places;
            }
            _ => anyhow::bail!("Unknown configuration key: {}", key),
        }
        Ok(())
    }

    /// `rest` is `<model>.<field>`; model ids may themselves contain dots.
    fn set_override(&mut self, rest: &str, value: &str) -> Result<()> {
        let (model, field) = rest
            .rsplit_once('.')
            .filter(|(model, _)| !model.is_empty())
            .with_context(|| {
                format!("Invalid pricing key: {OVERRIDE_KEY_PREFIX}{rest}. Expected {OVERRIDE_KEY_PREFIX}<model>.<input|output|quality>")
            })?;

        let amount: f64 = value
            .parse()
            .with_context(|| format!("Invalid number for {}: {}", field, value))?;
        if !amount.is_finite() || amount < 0.0 {
            anyhow::bail!("{} must be a non-negative number, got {}", field, value);
        }

        // New overrides start from whatever the model is priced at today
        let mut pricing = self
            .pricing
            .overrides
            .get(model)
            .copied()
            .unwrap_or_else(|| PricingTable::builtin().lookup_or_fallback(model).into());

        match field {
            "input" => pricing.input = amount,
            "output" => pricing.output = amount,
            "quality" => pricing.quality = amount,
            _ => anyhow::bail!("Unknown pricing field: {}. Must be 'input', 'output', or 'quality'", field),
        }

        self.pricing.overrides.insert(model.to_string(), pricing);
        Ok(())
    }

    /// Built-in pricing with the configured overrides applied. Overrides with
    /// negative or non-finite values are ignored.
    pub fn pricing_table(&self) -> PricingTable {
        if self.pricing.overrides.is_empty() {
            return PricingTable::builtin().clone();
        }

        let overrides: BTreeMap<String, PricingEntry> = self
            .pricing
            .overrides
            .iter()
            .filter(|(model, pricing)| {
                let valid = pricing.is_valid();
                if !valid {
                    warn!(model = %model, "Ignoring invalid pricing override");
                }
                valid
            })
            .map(|(model, pricing)| (model.clone(), PricingEntry::from(*pricing)))
            .collect();

        PricingTable::builtin().with_overrides(&overrides)
    }
}
