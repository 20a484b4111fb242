//! Normalized call records written back out as CSV.

use crate::models::CallRecord;
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::Path;

/// Fixed column set: every row carries every field so the CSV stays rectangular.
#[derive(Serialize)]
struct ExportRow<'a> {
    timestamp: &'a str,
    model: &'a str,
    input_tokens: u64,
    output_tokens: u64,
    thinking_tokens: u64,
    cost: f64,
    latency_ms: Option<f64>,
    model_assumed: bool,
}

impl<'a> From<&'a CallRecord> for ExportRow<'a> {
    fn from(record: &'a CallRecord) -> Self {
        Self {
            timestamp: &record.timestamp,
            model: &record.model,
            input_tokens: record.input_tokens,
            output_tokens: record.output_tokens,
            thinking_tokens: record.thinking_tokens,
            cost: record.cost,
            latency_ms: record.latency_ms,
            model_assumed: record.model_assumed,
        }
    }
}

pub fn write_calls<W: io::Write>(writer: W, records: &[CallRecord]) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(ExportRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and write `records` to it.
pub fn export_calls(path: &Path, records: &[CallRecord]) -> csv::Result<()> {
    let file = File::create(path)?;
    write_calls(file, records)
}
