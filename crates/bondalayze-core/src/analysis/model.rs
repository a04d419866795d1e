//! AnalysisResult domain model.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const DEFAULT_ATTACHMENT: &str = "mixed";
pub const DEFAULT_CONFLICT_PATTERN: &str = "The conflict pattern was not clearly described.";

/// Overall emotional tone of the conversation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EmotionalTone {
    VeryNegative,
    Negative,
    #[default]
    Mixed,
    Positive,
    VeryPositive,
}

/// Estimated risk that the relationship ends.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BreakupRisk {
    Low,
    #[default]
    Medium,
    High,
}

/// Secondary interpretation fields. Always present in a final result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraAnalysis {
    pub emotional_tone: EmotionalTone,
    pub breakup_risk: BreakupRisk,
    pub attachment_you: String,
    pub attachment_them: String,
    pub conflict_pattern: String,
    pub recommendations: Vec<String>,
}

impl Default for ExtraAnalysis {
    fn default() -> Self {
        Self {
            emotional_tone: EmotionalTone::default(),
            breakup_risk: BreakupRisk::default(),
            attachment_you: DEFAULT_ATTACHMENT.to_string(),
            attachment_them: DEFAULT_ATTACHMENT.to_string(),
            conflict_pattern: DEFAULT_CONFLICT_PATTERN.to_string(),
            recommendations: Vec::new(),
        }
    }
}

/// Validated relationship-health analysis.
///
/// "you" is whoever speaks first in the submitted log and "them" is the
/// other party. That labeling is an assumption baked into the prompt, not
/// something detected from the text; multi-party or reordered logs make the
/// you/them fields meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Overall relationship health, 0-100.
    pub score: u8,
    pub summary: String,
    /// Effort shown by "you", 0-100.
    pub you_effort: u8,
    /// Effort shown by "them", 0-100.
    pub them_effort: u8,
    pub greens: Vec<String>,
    pub reds: Vec<String>,
    pub extra: ExtraAnalysis,
}
