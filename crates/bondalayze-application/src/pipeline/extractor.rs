//! Transcript Extractor
//!
//! Turns chat screenshots into a raw, line-per-message transcript with a
//! vision-capable model. Transcription fidelity only: noise such as
//! timestamps and call events is left for the cleaner.

use bondalayze_core::config::StageSettings;
use bondalayze_core::error::Result;
use bondalayze_core::image::EncodedImage;
use bondalayze_core::model_client::{ChatMessage, ChatModel, ChatRequest, content_or_empty};
use bondalayze_core::payload::{parse_json_response, string_field};
use std::sync::Arc;

const DEFAULT_TEMPERATURE: f32 = 0.0;
const DEFAULT_MAX_TOKENS: u32 = 2000;

const SYSTEM_PROMPT: &str =
    "You transcribe chat screenshots. Always respond with VALID JSON ONLY, no extra text.";

const INSTRUCTIONS: &str = r#"Transcribe every visible chat message in these screenshots.

Rules:
- Keep the exact order of the messages, top to bottom, screenshot after screenshot.
- One message per line. Keep sender names exactly as displayed when they are visible.
- Copy the text exactly as written. Do not paraphrase, translate, summarize or fix spelling.
- Keep call-event lines such as "missed call" or "voice call" on their own lines.
- Ignore the keyboard, status bar and other app UI.

Return ONLY JSON in this exact shape:
{"transcript": "first message\nsecond message"}"#;

pub struct TranscriptExtractor {
    model: Arc<dyn ChatModel>,
    settings: StageSettings,
}

impl TranscriptExtractor {
    pub fn new(model: Arc<dyn ChatModel>, settings: StageSettings) -> Self {
        Self { model, settings }
    }

    /// Returns the raw transcript of `images`.
    ///
    /// No images means no model call and an empty transcript. A response
    /// that is empty, not JSON, or lacks a string `transcript` also yields
    /// an empty transcript. Provider failures are returned as errors.
    pub async fn extract(&self, images: &[EncodedImage]) -> Result<String> {
        if images.is_empty() {
            return Ok(String::new());
        }

        let request = ChatRequest::new(
            self.settings.model.clone().unwrap_or_default(),
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user_with_images(INSTRUCTIONS, images),
            ],
        )
        .with_temperature(self.settings.temperature.unwrap_or(DEFAULT_TEMPERATURE))
        .with_max_tokens(self.settings.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS))
        .json_object();

        tracing::debug!("[TranscriptExtractor] Transcribing {} screenshot(s)", images.len());
        let response = content_or_empty(self.model.chat_complete(request).await)?;

        let transcript = parse_json_response(&response).as_ref().and_then(|value| {
            string_field(value, "transcript").map(|text| text.trim().to_string())
        });

        match transcript {
            Some(text) => {
                tracing::info!(
                    "[TranscriptExtractor] Extracted {} chars from {} screenshot(s)",
                    text.chars().count(),
                    images.len()
                );
                Ok(text)
            }
            None => {
                tracing::warn!(
                    "[TranscriptExtractor] Unusable response ({} bytes), continuing without screenshot text",
                    response.len()
                );
                Ok(String::new())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedChatModel;
    use bondalayze_core::BondaError;
    use bondalayze_core::model_client::ModelError;

    fn screenshots(count: usize) -> Vec<EncodedImage> {
        (0..count)
            .map(|i| EncodedImage::new(format!("data:image/jpeg;base64,SHOT{i}")))
            .collect()
    }

    #[tokio::test]
    async fn test_no_images_skips_model() {
        let model = Arc::new(ScriptedChatModel::new());
        let extractor = TranscriptExtractor::new(model.clone(), StageSettings::default());

        assert_eq!(extractor.extract(&[]).await.unwrap(), "");
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_extracts_transcript_field() {
        let model = Arc::new(ScriptedChatModel::with_texts([
            r#"{"transcript": "  Sam: are you up?\nMe: yes  "}"#,
        ]));
        let extractor = TranscriptExtractor::new(model.clone(), StageSettings::default());

        let text = extractor.extract(&screenshots(2)).await.unwrap();
        assert_eq!(text, "Sam: are you up?\nMe: yes");

        let request = &model.requests()[0];
        assert!(request.json_mode);
        assert_eq!(request.temperature, Some(0.0));
        assert_eq!(request.messages[1].image_count(), 2);
    }

    #[tokio::test]
    async fn test_non_json_degrades_to_empty() {
        let model = Arc::new(ScriptedChatModel::with_texts(["I see two people talking"]));
        let extractor = TranscriptExtractor::new(model, StageSettings::default());

        assert_eq!(extractor.extract(&screenshots(1)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_reply_without_content_degrades_to_empty() {
        let model = Arc::new(ScriptedChatModel::with_replies([Err(ModelError::EmptyResponse)]));
        let extractor = TranscriptExtractor::new(model, StageSettings::default());

        assert_eq!(extractor.extract(&screenshots(1)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_missing_field_degrades_to_empty() {
        let model = Arc::new(ScriptedChatModel::with_texts([r#"{"text": "hello"}"#]));
        let extractor = TranscriptExtractor::new(model, StageSettings::default());

        assert_eq!(extractor.extract(&screenshots(1)).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_provider_failure_is_an_error() {
        let model = Arc::new(ScriptedChatModel::with_replies([Err(ModelError::Http {
            status_code: 500,
            message: "boom".to_string(),
            is_retryable: true,
            retry_after: None,
        })]));
        let extractor = TranscriptExtractor::new(model, StageSettings::default());

        let err = extractor.extract(&screenshots(1)).await.unwrap_err();
        assert!(matches!(err, BondaError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_stage_settings_override_defaults() {
        let model = Arc::new(ScriptedChatModel::with_texts([r#"{"transcript": "hi"}"#]));
        let settings = StageSettings {
            model: Some("gpt-4o".to_string()),
            temperature: Some(0.1),
            max_tokens: Some(800),
        };
        let extractor = TranscriptExtractor::new(model.clone(), settings);
        extractor.extract(&screenshots(1)).await.unwrap();

        let request = &model.requests()[0];
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.temperature, Some(0.1));
        assert_eq!(request.max_tokens, Some(800));
    }
}
