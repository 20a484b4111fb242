use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "llm-observatory")]
#[command(about = "Cost and usage analytics for LLM provider billing exports")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., output.decimal_places, pricing.overrides.gpt-4o.input)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect the export format of a CSV file, normalize it and print analytics
    Analyze {
        /// Usage export (AWS Bedrock CloudWatch, Anthropic or OpenAI CSV)
        file: PathBuf,

        /// Also write the normalized call records to this CSV file
        #[arg(long, value_name = "PATH")]
        export_calls: Option<PathBuf>,
    },

    /// Recommend the cheapest model meeting a complexity bucket's quality floor
    Recommend {
        /// Model currently in use
        #[arg(long)]
        model: String,

        /// Complexity bucket: simple, medium or complex
        #[arg(long)]
        complexity: String,
    },

    /// Show the effective pricing table
    Pricing,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_with_global_flags() {
        let cli = Cli::try_parse_from([
            "llm-observatory",
            "analyze",
            "usage.csv",
            "--json",
            "--export-calls",
            "calls.csv",
            "-v",
        ])
        .unwrap();

        assert!(cli.json);
        assert!(cli.verbose);
        match cli.command {
            Commands::Analyze { file, export_calls } => {
                assert_eq!(file, PathBuf::from("usage.csv"));
                assert_eq!(export_calls, Some(PathBuf::from("calls.csv")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_recommend_requires_both_flags() {
        assert!(Cli::try_parse_from(["llm-observatory", "recommend", "--model", "gpt-4"]).is_err());

        let cli = Cli::try_parse_from([
            "llm-observatory",
            "--config",
            "/tmp/c.toml",
            "recommend",
            "--model",
            "gpt-4",
            "--complexity",
            "medium",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(cli.command, Commands::Recommend { .. }));
    }

    #[test]
    fn test_config_set() {
        let cli = Cli::try_parse_from(["llm-observatory", "config", "set", "output.format", "json"]).unwrap();
        match cli.command {
            Commands::Config {
                action: ConfigAction::Set { key, value },
            } => {
                assert_eq!(key, "output.format");
                assert_eq!(value, "json");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_command_is_required() {
        assert!(Cli::try_parse_from(["llm-observatory"]).is_err());
    }
}
