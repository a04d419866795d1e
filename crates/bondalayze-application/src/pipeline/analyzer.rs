//! Conversation Analyzer
//!
//! The one stage that never degrades silently: a response that is not JSON
//! fails the whole analysis, while a JSON response of the wrong shape is
//! repaired by [`sanitize_analysis`]. An empty response is read as `{}` and
//! so yields a fully defaulted result.

use bondalayze_core::analysis::{AnalysisResult, sanitize_analysis};
use bondalayze_core::config::AnalyzerSettings;
use bondalayze_core::conversation::tail_truncate;
use bondalayze_core::error::{BondaError, Result};
use bondalayze_core::model_client::{ChatMessage, ChatModel, ChatRequest, content_or_empty};
use bondalayze_core::payload::parse_json_response;
use minijinja::{Environment, context};
use std::sync::Arc;

const DEFAULT_TEMPERATURE: f32 = 0.35;
const DEFAULT_MAX_TOKENS: u32 = 450;

const SYSTEM_PROMPT: &str = "You are a concise relationship conversation analyst. Always respond with VALID JSON ONLY, no extra text.";

const ANALYSIS_TEMPLATE: &str = r#"Analyze the following conversation between two people.

Rules:
- Treat the first speaker in the log as "you" and the other as "them".
- Be short and compact. Keep every text field under ~25 words.
- Focus on emotional and relational patterns, not grammar.

Return ONLY JSON in this exact shape:

{
  "score": number,              // 0-100 overall relationship health
  "summary": string,            // 2-3 short sentences, max ~35 words
  "you_effort": number,         // 0-100 approximate effort from "you"
  "them_effort": number,        // 0-100 approximate effort from "them"
  "greens": string[],           // 2-5 positive behaviors, each < 15 words
  "reds": string[],             // 2-5 problems, each < 15 words
  "extra": {
    "emotional_tone": "very_negative" | "negative" | "mixed" | "positive" | "very_positive",
    "breakup_risk": "low" | "medium" | "high",
    "attachment_you": string,   // "secure", "anxious", "avoidant" or "mixed"
    "attachment_them": string,  // same style as above
    "conflict_pattern": string, // 1-2 short sentences about how conflicts play out
    "recommendations": string[] // 3-5 practical, gentle tips, each < 18 words
  }
}

CONVERSATION:
"""{{ conversation }}""""#;

pub struct ConversationAnalyzer {
    model: Arc<dyn ChatModel>,
    settings: AnalyzerSettings,
}

impl ConversationAnalyzer {
    pub fn new(model: Arc<dyn ChatModel>, settings: AnalyzerSettings) -> Self {
        Self { model, settings }
    }

    /// The trailing part of `conversation` the model gets to see.
    pub fn window<'a>(&self, conversation: &'a str) -> &'a str {
        tail_truncate(conversation, self.settings.window_chars)
    }

    /// Analyzes the tail window of `conversation`.
    ///
    /// # Errors
    ///
    /// * `BondaError::AnalysisSchema` when the response is not JSON
    /// * `BondaError::Upstream` when the provider call fails
    pub async fn analyze(&self, conversation: &str) -> Result<AnalysisResult> {
        let window = self.window(conversation);
        let prompt = render_prompt(window)?;

        let request = ChatRequest::new(
            self.settings.model.clone().unwrap_or_default(),
            vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
        )
        .with_temperature(self.settings.temperature.unwrap_or(DEFAULT_TEMPERATURE))
        .with_max_tokens(self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS))
        .json_object();

        tracing::debug!(
            "[ConversationAnalyzer] Analyzing {} chars (input was {})",
            window.chars().count(),
            conversation.chars().count()
        );
        let response = content_or_empty(self.model.chat_complete(request).await)?;
        let body = if response.trim().is_empty() {
            tracing::warn!("[ConversationAnalyzer] Empty response, using default analysis");
            "{}"
        } else {
            response.as_str()
        };

        let Some(value) = parse_json_response(body) else {
            tracing::error!(
                "[ConversationAnalyzer] Response is not JSON ({} bytes)",
                response.len()
            );
            return Err(BondaError::AnalysisSchema {
                raw_len: response.len(),
            });
        };

        let analysis = sanitize_analysis(&value);
        tracing::info!(
            "[ConversationAnalyzer] score={} tone={} risk={}",
            analysis.score,
            analysis.extra.emotional_tone,
            analysis.extra.breakup_risk
        );
        Ok(analysis)
    }
}

fn render_prompt(conversation: &str) -> Result<String> {
    Environment::new()
        .render_str(ANALYSIS_TEMPLATE, context! { conversation => conversation })
        .map_err(|err| BondaError::internal(format!("Failed to render analysis prompt: {err}")))
}
