//! Scripted `ChatModel` double.

use async_trait::async_trait;
use bondalayze_core::model_client::{ChatModel, ChatRequest, ModelError};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Replies with pre-recorded responses in order and records every request.
///
/// Running out of replies yields `ModelError::InvalidRequest`, so a test that
/// expects no model call fails loudly when one happens.
#[derive(Default)]
pub struct ScriptedChatModel {
    replies: Mutex<VecDeque<Result<String, ModelError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChatModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replies(replies: impl IntoIterator<Item = Result<String, ModelError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for a script made only of successful text replies.
    pub fn with_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_replies(texts.into_iter().map(|text| Ok(text.into())))
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl ChatModel for ScriptedChatModel {
    async fn chat_complete(&self, request: ChatRequest) -> Result<String, ModelError> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(ModelError::InvalidRequest(
                    "ScriptedChatModel has no reply left".to_string(),
                ))
            })
    }
}
