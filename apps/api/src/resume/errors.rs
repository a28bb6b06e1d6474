use thiserror::Error;

use crate::llm_client::LlmError;
use crate::resume::DocumentFormat;

/// Failures of a single pipeline run. All are terminal: nothing is retried
/// and nothing is persisted.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Unsupported file type: '{0}'")]
    UnsupportedFileType(String),

    #[error("Failed to extract text from {format}: {reason}")]
    ExtractionFailed {
        format: DocumentFormat,
        reason: String,
    },

    #[error("AI call failed: {0}")]
    AiCallFailed(#[from] LlmError),

    #[error("No JSON object found in the model response")]
    NoJsonFound,

    #[error("Malformed JSON in the model response: {0}")]
    MalformedJson(#[source] serde_json::Error),
}

impl ParseError {
    pub fn extraction(format: DocumentFormat, reason: impl std::fmt::Display) -> Self {
        ParseError::ExtractionFailed {
            format,
            reason: reason.to_string(),
        }
    }
}
