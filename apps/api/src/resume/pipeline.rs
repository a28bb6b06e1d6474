use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::resume::classifier::{DocumentFormat, Extractors};
use crate::resume::coerce::coerce_reply;
use crate::resume::models::{ParsedResumeRecord, PARSED_RESUME_KEY};
use crate::resume::prompts::build_resume_prompt;
use crate::resume::ParseError;
use crate::store::KeyValueStore;

/// An uploaded document as received from the caller.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Bytes,
}

/// Stateless resume parser: classify → extract → one LLM call → coerce.
pub struct ResumeParser {
    extractors: Arc<Extractors>,
    llm: Arc<dyn CompletionClient>,
}

impl ResumeParser {
    pub fn new(llm: Arc<dyn CompletionClient>) -> Self {
        Self::with_extractors(Extractors::default(), llm)
    }

    pub fn with_extractors(extractors: Extractors, llm: Arc<dyn CompletionClient>) -> Self {
        Self {
            extractors: Arc::new(extractors),
            llm,
        }
    }

    pub async fn parse(&self, document: &SourceDocument) -> Result<ParsedResumeRecord, ParseError> {
        let format = DocumentFormat::from_mime(&document.content_type)?;
        let text = self.extract_blocking(format, document.bytes.clone()).await?;
        info!(
            "Extracted {} chars from {format} upload {:?}",
            text.len(),
            document.file_name.as_deref().unwrap_or("<unnamed>")
        );
        self.parse_text(&text).await
    }

    /// Document decoding is CPU-bound, so it runs on the blocking pool. A panicking
    /// decoder surfaces as an extraction failure for that format.
    async fn extract_blocking(
        &self,
        format: DocumentFormat,
        bytes: Bytes,
    ) -> Result<String, ParseError> {
        let extractors = Arc::clone(&self.extractors);
        tokio::task::spawn_blocking(move || extractors.extract_as(format, &bytes))
            .await
            .map_err(|e| ParseError::extraction(format, format!("extractor task failed: {e}")))?
    }

    /// Runs the model over already-extracted text. Coercion failures are not retried.
    pub async fn parse_text(&self, resume_text: &str) -> Result<ParsedResumeRecord, ParseError> {
        let prompt = build_resume_prompt(resume_text);
        let reply = self.llm.complete(&prompt).await?;
        debug!("Model reply: {} chars", reply.len());
        coerce_reply(&reply)
    }
}

/// Parses `document` and, only on success, overwrites the store slot with the record.
pub async fn parse_and_store(
    parser: &ResumeParser,
    store: &dyn KeyValueStore,
    document: &SourceDocument,
) -> Result<ParsedResumeRecord, AppError> {
    let record = parser.parse(document).await?;
    let serialized = serde_json::to_string(&record).map_err(|e| AppError::Internal(e.into()))?;
    store.set(PARSED_RESUME_KEY, serialized).await?;
    info!("Stored parsed resume under '{PARSED_RESUME_KEY}'");
    Ok(record)
}
