//! Provider configuration from TOML (`[provider]` section)

use deskpilot_application::ChatOptions;
use deskpilot_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};

/// Raw provider configuration from TOML
///
/// Any OpenAI-compatible chat completions endpoint works.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileProviderConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,
    /// Model name sent with every request
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Sampling temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens per response
    pub max_tokens: Option<u32>,
    /// HTTP timeout in seconds
    pub timeout_secs: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            temperature: Some(0.2),
            max_tokens: None,
            timeout_secs: 60,
        }
    }
}

impl FileProviderConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }

    pub fn chat_options(&self) -> ChatOptions {
        let mut options = ChatOptions::default();
        if let Some(t) = self.temperature {
            options = options.with_temperature(t);
        }
        if let Some(m) = self.max_tokens {
            options = options.with_max_tokens(m);
        }
        options
    }

    pub(super) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyModel,
                "provider.model cannot be empty",
            ));
        }
        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroTimeout,
                "provider.timeout_secs cannot be 0",
            ));
        }
        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::TemperatureOutOfRange,
                format!("provider.temperature {} is outside 0.0 - 2.0", t),
            ));
        }
        if self.api_key().is_none() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::MissingApiKey,
                format!(
                    "${} is not set; requests will be sent without an API key",
                    self.api_key_env
                ),
            ));
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_options() {
        let config = FileProviderConfig {
            max_tokens: Some(2048),
            ..Default::default()
        };
        let options = config.chat_options();
        assert_eq!(options.temperature, Some(0.2));
        assert_eq!(options.max_tokens, Some(2048));
        assert!(!options.json_response);
    }

    #[test]
    fn test_issues() {
        let config = FileProviderConfig {
            model: " ".to_string(),
            temperature: Some(3.5),
            api_key_env: "DESKPILOT_TEST_UNSET_KEY".to_string(),
            ..Default::default()
        };
        let codes: Vec<_> = config.issues().iter().map(|i| i.code).collect();
        assert!(codes.contains(&ConfigIssueCode::EmptyModel));
        assert!(codes.contains(&ConfigIssueCode::TemperatureOutOfRange));
        assert!(codes.contains(&ConfigIssueCode::MissingApiKey));
    }
}
