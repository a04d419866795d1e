//! Validate-and-repair for analyzer output.
//!
//! The model is asked for a fixed JSON shape but nothing guarantees it
//! complies. Everything here works on an untyped `serde_json::Value` and
//! always yields a fully-typed [`AnalysisResult`]: shape violations are
//! normalized, never reported.

use serde_json::{Map, Value};
use std::str::FromStr;

use super::model::{
    AnalysisResult, BreakupRisk, DEFAULT_ATTACHMENT, DEFAULT_CONFLICT_PATTERN, EmotionalTone,
    ExtraAnalysis,
};

/// Builds a bounded result from whatever JSON the analyzer returned.
///
/// A non-object value is treated as an empty object.
pub fn sanitize_analysis(raw: &Value) -> AnalysisResult {
    let empty = Map::new();
    let root = raw.as_object().unwrap_or(&empty);
    let extra = root
        .get("extra")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    AnalysisResult {
        score: clamp_percentage(root.get("score")),
        summary: string_or(root.get("summary"), ""),
        you_effort: clamp_percentage(root.get("you_effort")),
        them_effort: clamp_percentage(root.get("them_effort")),
        greens: string_list(root.get("greens")),
        reds: string_list(root.get("reds")),
        extra: ExtraAnalysis {
            emotional_tone: enum_or_default(extra.get("emotional_tone")),
            breakup_risk: enum_or_default::<BreakupRisk>(extra.get("breakup_risk")),
            attachment_you: string_or(extra.get("attachment_you"), DEFAULT_ATTACHMENT),
            attachment_them: string_or(extra.get("attachment_them"), DEFAULT_ATTACHMENT),
            conflict_pattern: string_or(extra.get("conflict_pattern"), DEFAULT_CONFLICT_PATTERN),
            recommendations: string_list(extra.get("recommendations")),
        },
    }
}

/// Coerces a value into an integer percentage.
///
/// Numbers and numeric strings are rounded and clamped into [0, 100];
/// anything else (missing, null, bool, NaN, text) becomes 0.
pub fn clamp_percentage(value: Option<&Value>) -> u8 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(n) if n.is_finite() => n.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn string_or(value: Option<&Value>, default: &str) -> String {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Non-arrays become empty lists; non-string and blank elements are dropped.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Accepts `very positive`, `Very-Positive` and `very_positive` alike.
fn enum_or_default<T>(value: Option<&Value>) -> T
where
    T: FromStr + Default,
{
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_ascii_lowercase().replace([' ', '-'], "_"))
        .and_then(|token| T::from_str(&token).ok())
        .unwrap_or_default()
}
