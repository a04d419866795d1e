//! OpenAIChatClient - Direct REST client for the OpenAI Chat Completions API.
//!
//! Used by every model-calling pipeline stage: vision transcription (image
//! parts as data URLs), cleaning and analysis, all in JSON-object mode.
//! Configuration priority: ~/.config/bondalayze/secret.json > environment variables

use async_trait::async_trait;
use bondalayze_core::config::{DEFAULT_OPENAI_MODEL, ProviderSettings};
use bondalayze_core::model_client::{
    ChatMessage, ChatModel, ChatRequest, ContentPart, ModelError, Role,
};
use bondalayze_infrastructure::paths::BondaPaths;
use bondalayze_infrastructure::storage::{SecretStorage, StorageError};
use reqwest::{Client, StatusCode, header::HeaderValue};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Client implementation that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAIChatClient {
    /// Creates a new client with the provided API key and default model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Loads credentials from secret.json or environment variables and
    /// applies the provider settings.
    ///
    /// Priority:
    /// 1. secret.json (`openai.api_key`, `openai.model_name`)
    /// 2. Environment variables (OPENAI_API_KEY, OPENAI_MODEL)
    ///
    /// Model name defaults to `gpt-4o-mini` if not specified.
    pub fn try_from_config(
        paths: &BondaPaths,
        provider: &ProviderSettings,
    ) -> Result<Self, ModelError> {
        let client = match Self::from_secret_file(paths) {
            Some(client) => client,
            None => {
                let api_key = env::var("OPENAI_API_KEY").map_err(|_| {
                    ModelError::InvalidRequest(
                        "OPENAI_API_KEY not found in secret.json or environment variables".into(),
                    )
                })?;
                let model =
                    env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into());
                Self::new(api_key, model)
            }
        };

        client
            .with_base_url(provider.base_url.clone())
            .with_timeout(Duration::from_secs(provider.request_timeout_secs))
    }

    fn from_secret_file(paths: &BondaPaths) -> Option<Self> {
        let storage = SecretStorage::open(paths).ok()?;
        let secret_config = match storage.load() {
            Ok(config) => config,
            Err(StorageError::Missing(path)) => {
                tracing::debug!("[OpenAIChatClient] No secret file at {}", path.display());
                return None;
            }
            Err(err) => {
                tracing::warn!("[OpenAIChatClient] Ignoring unusable secret.json: {}", err);
                return None;
            }
        };
        let openai = secret_config.openai?;
        let model = openai
            .model_name
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.into());
        Some(Self::new(openai.api_key, model))
    }

    /// Points the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Rebuilds the HTTP client with a per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, ModelError> {
        self.client = Client::builder().timeout(timeout).build().map_err(|err| {
            ModelError::InvalidRequest(format!("Failed to build HTTP client: {err}"))
        })?;
        Ok(self)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_body(&self, request: ChatRequest) -> ChatCompletionRequest {
        let model = if request.model.trim().is_empty() {
            self.model.clone()
        } else {
            request.model
        };

        ChatCompletionRequest {
            model,
            messages: request.messages.iter().map(to_wire_message).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            response_format: request.json_mode.then_some(ResponseFormat {
                kind: "json_object",
            }),
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, ModelError> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH);
        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|err| ModelError::Transport {
                message: format!("OpenAI API request failed: {err}"),
                is_retryable: err.is_connect() || err.is_timeout(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(status, body_text, retry_after));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| ModelError::Decode(format!("Failed to parse OpenAI response: {err}")))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ChatModel for OpenAIChatClient {
    async fn chat_complete(&self, request: ChatRequest) -> Result<String, ModelError> {
        if request.messages.is_empty() {
            return Err(ModelError::InvalidRequest(
                "OpenAI request must include at least one message".into(),
            ));
        }

        let body = self.build_body(request);
        tracing::debug!(
            "[OpenAIChatClient] model={} messages={} json_mode={}",
            body.model,
            body.messages.len(),
            body.response_format.is_some()
        );

        self.send_request(&body).await
    }
}

fn to_wire_message(message: &ChatMessage) -> WireMessage {
    let content = message
        .parts
        .iter()
        .map(|part| match part {
            ContentPart::Text(text) => MessageContent::Text { text: text.clone() },
            // OpenAI accepts base64 data URLs directly as image URLs
            ContentPart::Image(image) => MessageContent::ImageUrl {
                image_url: ImageUrl {
                    url: image.data_url.clone(),
                },
            },
        })
        .collect();

    WireMessage {
        role: message.role,
        content,
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct WireMessage {
    role: Role,
    content: Vec<MessageContent>,
}

enum MessageContent {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

// Custom serialization for MessageContent
impl Serialize for MessageContent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(None)?;

        match self {
            MessageContent::Text { text } => {
                map.serialize_entry("type", "text")?;
                map.serialize_entry("text", text)?;
            }
            MessageContent::ImageUrl { image_url } => {
                map.serialize_entry("type", "image_url")?;
                map.serialize_entry("image_url", image_url)?;
            }
        }

        map.end()
    }
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, ModelError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ModelError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: String, retry_after: Option<Duration>) -> ModelError {
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or(body);

    let is_retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    ModelError::Http {
        status_code: status.as_u16(),
        message,
        is_retryable,
        retry_after,
    }
}

fn parse_retry_after(header: Option<&HeaderValue>) -> Option<Duration> {
    let value = header?.to_str().ok()?;
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondalayze_core::image::EncodedImage;
    use serde_json::{Value, json};
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn completion(content: &str) -> Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
            ]
        })
    }

    fn client_for(server: &MockServer) -> OpenAIChatClient {
        OpenAIChatClient::new("test-key", "gpt-4o-mini").with_base_url(server.uri())
    }

    #[tokio::test]
    async fn test_sends_json_mode_request_with_images() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(completion(r#"{"transcript":"Hi"}"#)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let request = ChatRequest::new(
            "",
            vec![
                ChatMessage::system("You transcribe chats."),
                ChatMessage::user_with_images(
                    "Transcribe",
                    &[EncodedImage::new("data:image/jpeg;base64,AAAA")],
                ),
            ],
        )
        .with_temperature(0.0)
        .with_max_tokens(100)
        .json_object();

        let text = client_for(&server).chat_complete(request).await.unwrap();
        assert_eq!(text, r#"{"transcript":"Hi"}"#);

        let received = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["max_tokens"], 100);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"][0]["type"], "text");
        assert_eq!(body["messages"][1]["content"][1]["type"], "image_url");
        assert_eq!(
            body["messages"][1]["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[tokio::test]
    async fn test_explicit_model_overrides_default() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
            .mount(&server)
            .await;

        let request = ChatRequest::new("gpt-4o", vec![ChatMessage::user("hi")]);
        client_for(&server).chat_complete(request).await.unwrap();

        let received = server.received_requests().await.unwrap();
        let body: Value = serde_json::from_slice(&received[0].body).unwrap();
        assert_eq!(body["model"], "gpt-4o");
        assert!(body.get("response_format").is_none());
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn test_rate_limit_is_mapped() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(429)
                    .insert_header("retry-after", "7")
                    .set_body_json(json!({
                        "error": {"message": "Rate limit reached", "type": "requests"}
                    })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat_complete(ChatRequest::new("", vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ModelError::Http {
                status_code: 429,
                message: "Rate limit reached".to_string(),
                is_retryable: true,
                retry_after: Some(Duration::from_secs(7)),
            }
        );
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_plain_text_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat_complete(ChatRequest::new("", vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();

        match err {
            ModelError::Http {
                status_code,
                message,
                is_retryable,
                ..
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(message, "bad request");
                assert!(!is_retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_content_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .chat_complete(ChatRequest::new("", vec![ChatMessage::user("hi")]))
            .await
            .unwrap_err();
        assert_eq!(err, ModelError::EmptyResponse);
    }

    #[tokio::test]
    async fn test_empty_message_list_is_rejected_locally() {
        let client = OpenAIChatClient::new("k", "m");
        let err = client
            .chat_complete(ChatRequest::new("", Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidRequest(_)));
    }

    #[test]
    fn test_try_from_config_reads_secret_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("secret.json"),
            r#"{"openai": {"api_key": "sk-file", "model_name": "gpt-4o"}}"#,
        )
        .unwrap();

        let paths = BondaPaths::new(Some(temp_dir.path()));
        let provider = ProviderSettings {
            base_url: "http://localhost:9999/v1/".to_string(),
            request_timeout_secs: 5,
        };
        let client = OpenAIChatClient::try_from_config(&paths, &provider).unwrap();
        assert_eq!(client.model(), "gpt-4o");
        assert_eq!(client.base_url, "http://localhost:9999/v1");
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[test]
    fn test_malformed_secret_file_is_reported_at_warn() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("secret.json"), "{ \"openai\": ").unwrap();
        let paths = BondaPaths::new(Some(temp_dir.path()));

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let client = tracing::subscriber::with_default(subscriber, || {
            OpenAIChatClient::from_secret_file(&paths)
        });

        assert!(client.is_none());
        let output = logs.text();
        assert!(output.contains("WARN"));
        assert!(output.contains("Ignoring unusable secret.json"));
    }

    #[test]
    fn test_missing_secret_file_is_not_a_warning() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let paths = BondaPaths::new(Some(temp_dir.path()));

        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_max_level(tracing::Level::WARN)
            .finish();
        let client = tracing::subscriber::with_default(subscriber, || {
            OpenAIChatClient::from_secret_file(&paths)
        });

        assert!(client.is_none());
        assert!(logs.text().is_empty());
    }
}
