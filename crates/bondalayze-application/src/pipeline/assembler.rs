//! Result Assembler

use bondalayze_core::analysis::AnalysisResult;
use bondalayze_core::request::ApiResponse;

/// Merges the stage outputs into the response returned to the caller and
/// stored as the analysis record.
pub fn assemble(
    clean_transcript: String,
    used_text: String,
    analysis: AnalysisResult,
) -> ApiResponse {
    ApiResponse {
        analysis,
        extracted_text: clean_transcript,
        used_text,
    }
}
