//! Application layer: the analysis pipeline and the use cases built on it.

pub mod analysis_usecase;
pub mod pipeline;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analysis_usecase::{AnalysisUseCase, AnalyzeCommand};
pub use pipeline::AnalysisPipeline;
