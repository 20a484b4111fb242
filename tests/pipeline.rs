use llm_observatory::analysis::{Complexity, analyze};
use llm_observatory::config::Config;
use llm_observatory::output::{OutputFormat, export_calls};
use llm_observatory::parser::{Layout, detect_and_parse};
use llm_observatory::{Observatory, ObservatoryError};
use tempfile::TempDir;

/// End-to-end tests: raw export bytes in, analytics out

const BEDROCK_EXPORT: &str = "\"CloudWatch metrics export\"\n\
                              \"Namespace\",\"AWS/Bedrock\"\n\
                              \"Region\",\"us-east-1\"\n\
                              \"Period\",\"3600\"\n\
                              \n\
                              Time,InputTokenCount,InvocationLatency,Invocations,OutputTokenCount\n\
                              2025-01-15 10:00:00,2500,1800,3,1250\n\
                              2025-01-15 11:00:00,0,0,0,0\n";

const OPENAI_EXPORT: &str = "created,model,n_context_tokens_total,n_generated_tokens_total,cost\n\
                             2024-03-01 08:15:00,gpt-4,120,40,0.006\n\
                             2024-03-01 09:30:00,gpt-4,4000,900,0.174\n\
                             2024-03-01 09:45:00,gpt-3.5-turbo,not-a-number,10,0.0001\n";

#[test]
fn test_bedrock_export_expands_invocations() {
    let upload = detect_and_parse(BEDROCK_EXPORT.as_bytes()).unwrap();
    assert_eq!(upload.layout, Layout::BedrockMetrics);
    // the zero-invocation period contributes nothing
    assert_eq!(upload.records.len(), 3);
    assert!(upload.records.iter().all(|r| r == &upload.records[0]));
    assert!(upload.records[0].model_assumed);

    let result = analyze(&upload.records).unwrap();
    assert_eq!(result.summary.total_calls, 3);
    assert_eq!(result.summary.assumed_model_calls, 3);
    assert_eq!(result.summary.total_input_tokens, 7500);
    assert_eq!(result.complexity_breakdown[&Complexity::Complex], 3);
    assert_eq!(result.hourly_costs.keys().copied().collect::<Vec<_>>(), vec![10]);
}

#[test]
fn test_opus_call_downgrades_to_haiku() {
    let csv = "timestamp,model,input_tokens,output_tokens,cost\n\
               2024-02-13T14:23:15Z,claude-3-opus-20240229,150,50,0.006\n";
    let upload = detect_and_parse(csv.as_bytes()).unwrap();
    assert_eq!(upload.layout, Layout::AnthropicUsage);

    let result = analyze(&upload.records).unwrap();
    let opportunity = &result.optimization_opportunities[0];
    assert_eq!(opportunity.recommended_model, "claude-3-haiku-20240307");
    assert_eq!(opportunity.complexity, Complexity::Simple);
    assert!((opportunity.savings - 0.0059).abs() < 1e-12);
    assert_eq!(result.summary.potential_savings, 0.01);
    assert_eq!(result.hourly_costs[&14], 0.01);
}

#[test]
fn test_openai_export_skips_bad_rows() {
    let upload = detect_and_parse(OPENAI_EXPORT.as_bytes()).unwrap();
    assert_eq!(upload.layout, Layout::OpenAiUsage);
    assert_eq!(upload.records.len(), 2);
    assert_eq!(upload.records[1].input_tokens, 4000);
    assert_eq!(upload.records[1].thinking_tokens, 0);

    let result = analyze(&upload.records).unwrap();
    assert_eq!(result.summary.total_cost, 0.18);
    assert_eq!(result.model_distribution["gpt-4"], 2);
}

#[test]
fn test_unparsable_timestamp_still_counts() {
    let csv = "timestamp,model,input_tokens,output_tokens,cost\n\
               sometime last week,gpt-4o,100,20,0.5\n";
    let upload = detect_and_parse(csv.as_bytes()).unwrap();
    let result = analyze(&upload.records).unwrap();

    assert_eq!(result.summary.total_calls, 1);
    assert_eq!(result.summary.total_cost, 0.5);
    assert!(result.hourly_costs.is_empty());
}

#[test]
fn test_unrecognized_and_empty_inputs() {
    let err = detect_and_parse(b"name,age\nalice,30\n").unwrap_err();
    assert_eq!(err, ObservatoryError::UnrecognizedFormat);
    assert_eq!(err.code(), "UNRECOGNIZED_FORMAT");

    // header only: no layout yields a record
    let err = detect_and_parse(b"model,input_tokens,output_tokens\n").unwrap_err();
    assert_eq!(err, ObservatoryError::UnrecognizedFormat);

    assert_eq!(analyze(&[]).unwrap_err().code(), "EMPTY_INPUT");
}

#[test]
fn test_analysis_is_idempotent() {
    let upload = detect_and_parse(OPENAI_EXPORT.as_bytes()).unwrap();
    let first = analyze(&upload.records).unwrap();
    let second = analyze(&upload.records).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn test_configured_observatory_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::load_from(Some(&config_path)).unwrap();
    config.set_value("parser.bedrock_default_model", "claude-3-opus-20240229").unwrap();
    config.save_to(&config_path).unwrap();

    let config = Config::load_from(Some(&config_path)).unwrap();
    let observatory = Observatory::from_config(&config);
    let upload = observatory.detect_and_parse(BEDROCK_EXPORT.as_bytes()).unwrap();
    assert!(upload.records.iter().all(|r| r.model == "claude-3-opus-20240229"));

    let result = observatory.analyze(&upload.records).unwrap();
    // complex calls on opus can move to gpt-4o
    assert_eq!(result.optimization_opportunities.len(), 3);
    assert!(result.summary.savings_percentage > 0.0);

    let export_path = temp_dir.path().join("calls.csv");
    export_calls(&export_path, &upload.records).unwrap();
    let exported = std::fs::read_to_string(&export_path).unwrap();
    assert_eq!(exported.lines().count(), 4);
    assert!(exported.lines().nth(1).unwrap().ends_with(",true"));
}

#[test]
fn test_max_token_cells_do_not_overflow_totals() {
    let csv = "timestamp,model,input_tokens,output_tokens,cost\n\
               2024-02-13T14:00:00,gpt-4o,18446744073709551615,1,0.5\n\
               2024-02-13T15:00:00,gpt-4o,5,1,0.5\n";
    let upload = detect_and_parse(csv.as_bytes()).unwrap();
    assert_eq!(upload.records.len(), 2);

    let result = analyze(&upload.records).unwrap();
    assert_eq!(result.summary.total_input_tokens, u64::MAX);
    assert_eq!(result.summary.total_output_tokens, 2);
}
