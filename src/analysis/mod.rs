// Analysis module
pub mod complexity;
pub mod engine;
pub mod optimization;

pub use complexity::{Complexity, classify};
pub use engine::{AnalysisResult, Analyzer, Summary, analyze};
pub use optimization::{OptimizationOpportunity, Optimizer, Recommendation};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::parser::detect_and_parse;

    #[test]
    fn test_parse_then_analyze_anthropic_export() {
        let csv = "timestamp,model,input_tokens,output_tokens,cache_creation_input_tokens,cost\n\
                   2024-02-13T14:23:15,claude-3-opus-20240229,150,50,0,0.006\n\
                   2024-02-13T15:10:00,claude-3-opus-20240229,1500,400,120,0.0525\n\
                   2024-02-13T15:45:00,claude-3-haiku-20240307,300,100,0,0.0002\n";

        let upload = detect_and_parse(csv.as_bytes()).unwrap();
        let result = analyze(&upload.records).unwrap();

        assert_eq!(result.summary.total_calls, 3);
        assert_eq!(result.summary.total_thinking_tokens, 120);
        assert_eq!(result.model_distribution["claude-3-opus-20240229"], 2);
        assert_eq!(result.complexity_breakdown[&Complexity::Simple], 1);
        assert_eq!(result.complexity_breakdown[&Complexity::Medium], 1);
        assert_eq!(result.complexity_breakdown[&Complexity::Complex], 1);

        // both opus calls can be downgraded, the haiku call cannot
        let recommended: Vec<&str> = result
            .optimization_opportunities
            .iter()
            .map(|o| o.recommended_model.as_str())
            .collect();
        assert_eq!(recommended, vec!["claude-3-haiku-20240307", "gpt-4o"]);
        assert_eq!(result.hourly_costs.keys().copied().collect::<Vec<_>>(), vec![14, 15]);
    }
}
