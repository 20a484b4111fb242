// llm-observatory: cost and usage analytics for LLM billing exports
use clap::Parser;
use llm_observatory::Observatory;
use llm_observatory::cli::{Cli, Commands};
use llm_observatory::commands::{
    OutputOptions, error_json, handle_analyze_command, handle_config_action, handle_pricing_command,
    handle_recommend_command,
};
use llm_observatory::config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_directive = if verbose {
        "llm_observatory=debug"
    } else {
        "llm_observatory=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    // Logs go to stderr so JSON on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Configured pipeline plus rendering options for the non-config commands.
fn load_observatory(config_path: Option<&Path>, json_flag: bool) -> anyhow::Result<(Observatory, OutputOptions)> {
    let config = Config::load_from(config_path)?;
    let options = OutputOptions {
        json: json_flag || config.output.format == "json",
        decimal_places: config.output.decimal_places,
    };
    Ok((Observatory::from_config(&config), options))
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Analyze { file, export_calls } => {
            let (observatory, options) = load_observatory(config_path, cli.json)?;
            handle_analyze_command(&observatory, &file, export_calls.as_deref(), options)
        }
        Commands::Recommend { model, complexity } => {
            let (observatory, options) = load_observatory(config_path, cli.json)?;
            handle_recommend_command(&observatory, &model, &complexity, options)
        }
        Commands::Pricing => {
            let (observatory, options) = load_observatory(config_path, cli.json)?;
            handle_pricing_command(&observatory, options)
        }
        Commands::Config { action } => handle_config_action(action, config_path, cli.json),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json_output = cli.json;
    if let Err(e) = run(cli) {
        if json_output {
            println!("{}", error_json(&e));
        } else {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(1);
    }
}
