//! Relationship analysis domain module.
//!
//! # Module Structure
//!
//! - `model`: the strongly-typed, bounded analysis result
//! - `sanitize`: validate-and-repair from an untyped model response

mod model;
mod sanitize;

pub use model::{
    AnalysisResult, BreakupRisk, DEFAULT_ATTACHMENT, DEFAULT_CONFLICT_PATTERN, EmotionalTone,
    ExtraAnalysis,
};
pub use sanitize::{clamp_percentage, sanitize_analysis};
