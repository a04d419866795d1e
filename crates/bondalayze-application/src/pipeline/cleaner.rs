//! Transcript Cleaner
//!
//! Normalizes a raw transcript: strips timestamps, date separators and call
//! events while keeping every surviving message verbatim. Best effort only;
//! an unusable model response leaves the raw transcript in place.

use bondalayze_core::config::StageSettings;
use bondalayze_core::error::Result;
use bondalayze_core::model_client::{ChatMessage, ChatModel, ChatRequest, content_or_empty};
use bondalayze_core::payload::{parse_json_response, string_field};
use std::sync::Arc;

const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 2000;

const SYSTEM_PROMPT: &str =
    "You clean chat transcripts. Always respond with VALID JSON ONLY, no extra text.";

const RULES: &str = r#"Clean the chat transcript below.

Rules:
- Remove timestamps (for example "10:42", "10:42 PM", "[21:03]").
- Remove date and day separator lines (for example "Today", "Yesterday", "Mon, 3 Jun").
- Remove call-event lines (for example "Missed call", "Voice call 2:31", "Video call ended").
- Keep every other message exactly as written, in the same order, one message per line.
- Never rewrite, translate, correct or summarize the remaining text. The chat may mix languages and scripts; leave them untouched.
- Drop lines that are empty after cleaning.

Return ONLY JSON in this exact shape:
{"clean_text": "first message\nsecond message"}

TRANSCRIPT:
"#;

pub struct TranscriptCleaner {
    model: Arc<dyn ChatModel>,
    settings: StageSettings,
}

impl TranscriptCleaner {
    pub fn new(model: Arc<dyn ChatModel>, settings: StageSettings) -> Self {
        Self { model, settings }
    }

    /// Returns the cleaned transcript, or `raw` unchanged when the model
    /// response is empty or unusable. Blank input makes no model call.
    pub async fn clean(&self, raw: &str) -> Result<String> {
        if raw.trim().is_empty() {
            return Ok(String::new());
        }

        let request = ChatRequest::new(
            self.settings.model.clone().unwrap_or_default(),
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!("{RULES}\"\"\"{raw}\"\"\"")),
            ],
        )
        .with_temperature(self.settings.temperature.unwrap_or(DEFAULT_TEMPERATURE))
        .with_max_tokens(self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS))
        .json_object();

        let response = content_or_empty(self.model.chat_complete(request).await)?;

        let cleaned = parse_json_response(&response)
            .as_ref()
            .and_then(|value| string_field(value, "clean_text").map(drop_empty_lines));

        match cleaned {
            Some(text) => {
                tracing::info!(
                    "[TranscriptCleaner] {} -> {} chars",
                    raw.chars().count(),
                    text.chars().count()
                );
                Ok(text)
            }
            None => {
                tracing::warn!(
                    "[TranscriptCleaner] Unusable response ({} bytes), keeping raw transcript",
                    response.len()
                );
                Ok(raw.to_string())
            }
        }
    }
}

/// Removes blank lines, keeping the rest in order.
pub fn drop_empty_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
