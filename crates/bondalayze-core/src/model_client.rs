//! Model provider abstraction.
//!
//! Pipeline stages only talk to [`ChatModel`]; the HTTP implementation lives
//! in `bondalayze-interaction`, tests use scripted doubles.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::error::BondaError;
use crate::image::EncodedImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One piece of message content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    Image(EncodedImage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub parts: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![ContentPart::Text(text.into())],
        }
    }

    /// A user message carrying instructions followed by images.
    pub fn user_with_images(text: impl Into<String>, images: &[EncodedImage]) -> Self {
        let mut parts = vec![ContentPart::Text(text.into())];
        parts.extend(images.iter().cloned().map(ContentPart::Image));
        Self {
            role: Role::User,
            parts,
        }
    }

    /// Concatenated text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                ContentPart::Text(text) => Some(text.as_str()),
                ContentPart::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn image_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|part| matches!(part, ContentPart::Image(_)))
            .count()
    }
}

/// A single chat completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model name; empty selects the provider's default model.
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a single JSON object response.
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: None,
            json_mode: false,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json_object(mut self) -> Self {
        self.json_mode = true;
        self
    }
}

/// Failures reported by a model provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("Request to model provider failed: {message}")]
    Transport { message: String, is_retryable: bool },

    #[error("Model provider returned HTTP {status_code}: {message}")]
    Http {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    #[error("Model provider returned no content")]
    EmptyResponse,

    #[error("Could not decode model provider response: {0}")]
    Decode(String),

    #[error("Invalid model request: {0}")]
    InvalidRequest(String),
}

impl ModelError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ModelError::Transport { is_retryable, .. } | ModelError::Http { is_retryable, .. } => {
                *is_retryable
            }
            _ => false,
        }
    }
}

impl From<ModelError> for BondaError {
    fn from(err: ModelError) -> Self {
        BondaError::Upstream(err.to_string())
    }
}

/// Maps a reply without any content to empty text so callers can apply
/// their own empty-content policy. Every other error is kept.
pub fn content_or_empty(reply: Result<String, ModelError>) -> Result<String, ModelError> {
    match reply {
        Err(ModelError::EmptyResponse) => Ok(String::new()),
        other => other,
    }
}

/// Chat completion provider.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Runs one completion and returns the assistant's text content.
    async fn chat_complete(&self, request: ChatRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_with_images_keeps_order() {
        let images = vec![
            EncodedImage::new("data:image/jpeg;base64,AAA"),
            EncodedImage::new("data:image/jpeg;base64,BBB"),
        ];
        let message = ChatMessage::user_with_images("Transcribe", &images);
        assert_eq!(message.image_count(), 2);
        assert_eq!(message.text(), "Transcribe");
        assert_eq!(message.parts[1], ContentPart::Image(images[0].clone()));
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new("gpt-4o-mini", vec![ChatMessage::user("hi")])
            .with_temperature(0.35)
            .with_max_tokens(450)
            .json_object();
        assert_eq!(request.temperature, Some(0.35));
        assert_eq!(request.max_tokens, Some(450));
        assert!(request.json_mode);
    }

    #[test]
    fn test_content_or_empty_only_absorbs_missing_content() {
        assert_eq!(content_or_empty(Err(ModelError::EmptyResponse)), Ok(String::new()));
        assert_eq!(content_or_empty(Ok("hi".to_string())), Ok("hi".to_string()));
        assert!(content_or_empty(Err(ModelError::Decode("bad".to_string()))).is_err());
    }

    #[test]
    fn test_model_error_becomes_upstream() {
        let err: BondaError = ModelError::EmptyResponse.into();
        assert!(matches!(err, BondaError::Upstream(_)));
    }
}
