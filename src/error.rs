//! Error taxonomy surfaced to callers of the core pipeline.

use thiserror::Error;

/// Result type alias for core operations.
pub type ObservatoryResult<T> = Result<T, ObservatoryError>;

/// Batch-level failures. Row-level problems never reach this type; parsers
/// absorb them by skipping the offending row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObservatoryError {
    #[error(
        "Could not parse CSV. Supported formats: AWS Bedrock CloudWatch, Anthropic, OpenAI"
    )]
    UnrecognizedFormat,

    #[error("No calls found in CSV")]
    EmptyInput,

    #[error("Unknown complexity bucket: {0}")]
    UnknownComplexityBucket(String),
}

impl ObservatoryError {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            ObservatoryError::UnrecognizedFormat => "UNRECOGNIZED_FORMAT",
            ObservatoryError::EmptyInput => "EMPTY_INPUT",
            ObservatoryError::UnknownComplexityBucket(_) => "UNKNOWN_COMPLEXITY_BUCKET",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ObservatoryError::UnrecognizedFormat.code(), "UNRECOGNIZED_FORMAT");
        assert_eq!(ObservatoryError::EmptyInput.code(), "EMPTY_INPUT");
        assert_eq!(
            ObservatoryError::UnknownComplexityBucket("huge".to_string()).code(),
            "UNKNOWN_COMPLEXITY_BUCKET"
        );
    }

    #[test]
    fn test_error_messages() {
        let err = ObservatoryError::UnknownComplexityBucket("huge".to_string());
        assert_eq!(err.to_string(), "Unknown complexity bucket: huge");
        assert!(ObservatoryError::UnrecognizedFormat.to_string().contains("Bedrock"));
    }
}
