//! Configuration models.
//!
//! `SecretConfig` mirrors `secret.json` (API keys), `AppConfig` mirrors
//! `config.toml` (everything else). Every setting has a default so an empty
//! or missing file is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::conversation::DEFAULT_WINDOW_CHARS;
use crate::plan::Plan;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// Root structure of secret.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub openai: Option<OpenAIConfig>,
}

/// OpenAI API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Root structure of config.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub extractor: StageSettings,
    pub cleaner: StageSettings,
    pub analyzer: AnalyzerSettings,
    /// Development accounts served by the in-memory identity provider.
    #[serde(rename = "users")]
    pub users: Vec<UserSeed>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
    /// Maximum accepted request body, screenshots included.
    pub max_body_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8787".to_string(),
            max_body_bytes: 12 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub base_url: String,
    /// Per-request HTTP timeout for model calls. No retries are attempted.
    pub request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            request_timeout_secs: 60,
        }
    }
}

/// Sampling settings for one model-calling stage.
///
/// `model = None` means "use the provider's default model".
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StageSettings {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerSettings {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Trailing characters of the conversation sent to the model.
    pub window_chars: usize,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            model: None,
            temperature: None,
            max_tokens: None,
            window_chars: DEFAULT_WINDOW_CHARS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserSeed {
    pub token: String,
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub plan: Plan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.analyzer.window_chars, 9000);
        assert_eq!(config.provider.request_timeout_secs, 60);
    }

    #[test]
    fn test_partial_toml() {
        let config: AppConfig = toml::from_str(
            r#"
            [analyzer]
            model = "gpt-4o"
            window_chars = 4000

            [[users]]
            token = "dev-token"
            id = "user-1"
            plan = "pro"
            "#,
        )
        .unwrap();
        assert_eq!(config.analyzer.model.as_deref(), Some("gpt-4o"));
        assert_eq!(config.analyzer.window_chars, 4000);
        assert_eq!(config.users.len(), 1);
        assert_eq!(config.users[0].plan, Plan::Pro);
        assert_eq!(config.server.bind, "127.0.0.1:8787");
    }
}
