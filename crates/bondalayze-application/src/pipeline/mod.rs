//! The analysis pipeline.
//!
//! gate -> extract -> clean -> combine -> analyze -> assemble, strictly in
//! sequence. Each stage owns its failure policy; the orchestrator only wires
//! outputs to inputs.

pub mod analyzer;
pub mod assembler;
pub mod cleaner;
pub mod extractor;

pub use analyzer::ConversationAnalyzer;
pub use assembler::assemble;
pub use cleaner::TranscriptCleaner;
pub use extractor::TranscriptExtractor;

use bondalayze_core::admission::check_admission;
use bondalayze_core::config::AppConfig;
use bondalayze_core::conversation::combine;
use bondalayze_core::error::{BondaError, Result};
use bondalayze_core::model_client::ChatModel;
use bondalayze_core::request::{AnalysisRequest, ApiResponse};
use std::sync::Arc;

pub struct AnalysisPipeline {
    extractor: TranscriptExtractor,
    cleaner: TranscriptCleaner,
    analyzer: ConversationAnalyzer,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: TranscriptExtractor,
        cleaner: TranscriptCleaner,
        analyzer: ConversationAnalyzer,
    ) -> Self {
        Self {
            extractor,
            cleaner,
            analyzer,
        }
    }

    /// Builds all three model-calling stages on one provider.
    pub fn from_config(model: Arc<dyn ChatModel>, config: &AppConfig) -> Self {
        Self::new(
            TranscriptExtractor::new(model.clone(), config.extractor.clone()),
            TranscriptCleaner::new(model.clone(), config.cleaner.clone()),
            ConversationAnalyzer::new(model, config.analyzer.clone()),
        )
    }

    /// Runs one analysis.
    ///
    /// `used_this_month` is the caller's count of completed analyses since
    /// the start of the month. Admission is decided before any model call;
    /// a failure anywhere after that discards all partial work.
    pub async fn run(
        &self,
        request: &AnalysisRequest,
        used_this_month: u32,
    ) -> Result<ApiResponse> {
        if !request.has_text() && request.images.is_empty() {
            return Err(BondaError::NoInputProvided);
        }
        check_admission(request.plan, request.images.len(), used_this_month)
            .into_result(request.plan)?;
        request.validate_input()?;

        tracing::info!(
            "[AnalysisPipeline] plan={} images={} typed_chars={}",
            request.plan,
            request.images.len(),
            request.typed_text.chars().count()
        );

        let raw_transcript = self.extractor.extract(&request.images).await?;
        let clean_transcript = self.cleaner.clean(&raw_transcript).await?;

        let combined =
            combine(&request.typed_text, &clean_transcript).ok_or(BondaError::NoInputProvided)?;
        let used_text = self.analyzer.window(&combined).to_string();

        let analysis = self.analyzer.analyze(&used_text).await?;
        Ok(assemble(clean_transcript, used_text, analysis))
    }
}
