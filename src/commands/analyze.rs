// Analyze command handler
use super::OutputOptions;
use crate::observatory::Observatory;
use crate::output::export_calls;
use anyhow::Context;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn handle_analyze_command(
    observatory: &Observatory,
    file: &Path,
    export_path: Option<&Path>,
    options: OutputOptions,
) -> anyhow::Result<()> {
    let bytes = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let upload = observatory.detect_and_parse(&bytes)?;
    let result = observatory.analyze(&upload.records)?;

    if let Some(path) = export_path {
        export_calls(path, &upload.records)
            .with_context(|| format!("Failed to export calls to {}", path.display()))?;
        info!(path = %path.display(), calls = upload.records.len(), "Exported normalized calls");
    }

    if !options.json {
        println!("Detected {} format - parsed {} calls", upload.layout, upload.records.len());
        if result.summary.assumed_model_calls > 0 {
            println!(
                "{} calls had no model column and were priced as {}",
                result.summary.assumed_model_calls,
                observatory.assumed_model()
            );
        }
        println!();
    }
    println!("{}", options.render(&result)?);
    Ok(())
}
