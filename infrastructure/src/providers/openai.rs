//! OpenAI-compatible chat completions gateway.
//!
//! Works with any server exposing `POST {base_url}/chat/completions`
//! (OpenAI, Ollama, vLLM, LM Studio). Function specs are sent as `tools`
//! and `tool_calls` in the reply become [`ContentBlock::ToolUse`] blocks.

use async_trait::async_trait;
use deskpilot_application::{ChatOptions, GatewayError, LlmGateway};
use deskpilot_domain::{ContentBlock, LlmResponse, Message, StopReason};
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Connection settings for [`OpenAiGateway`]
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout: Duration,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl OpenAiConfig {
    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

pub struct OpenAiGateway {
    client: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiGateway {
    pub fn new(config: OpenAiConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn headers(&self) -> Result<HeaderMap, GatewayError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = &self.config.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|e| GatewayError::Unauthorized(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }
}

// ==================== Wire format ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: String,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    name: String,
    /// JSON-encoded object, as a string
    #[serde(default)]
    arguments: String,
}

fn build_request<'a>(
    model: &'a str,
    messages: &'a [Message],
    options: &ChatOptions,
) -> ChatRequest<'a> {
    let tools = options
        .functions
        .iter()
        .map(|f| {
            serde_json::json!({
                "type": "function",
                "function": {
                    "name": f.name,
                    "description": f.description,
                    "parameters": f.parameters,
                }
            })
        })
        .collect();

    ChatRequest {
        model,
        messages,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
        // Some servers reject json mode combined with tools
        response_format: (options.json_response && options.functions.is_empty())
            .then(|| serde_json::json!({"type": "json_object"})),
        tools,
    }
}

fn parse_response(body: &str) -> Result<LlmResponse, GatewayError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    let choice = parsed
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("Missing choices".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
        content.push(ContentBlock::Text(text));
    }
    for call in choice.message.tool_calls {
        let input = match serde_json::from_str::<Value>(&call.function.arguments) {
            Ok(Value::Object(map)) => map,
            _ => {
                warn!(
                    "Tool call '{}' carried non-object arguments; using empty input",
                    call.function.name
                );
                Map::new()
            }
        };
        content.push(ContentBlock::ToolUse {
            id: call.id,
            name: call.function.name,
            input,
        });
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_finish_reason),
        model: parsed.model,
    })
}

fn status_error(status: StatusCode, text: String) -> GatewayError {
    let message = format!("HTTP {}: {}", status, text);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::RequestFailed(message),
    }
}

#[async_trait]
impl LlmGateway for OpenAiGateway {
    async fn chat(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<LlmResponse, GatewayError> {
        let body = build_request(&self.config.model, messages, options);
        debug!(
            model = %self.config.model,
            messages = messages.len(),
            tools = body.tools.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.config.endpoint())
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        if !status.is_success() {
            return Err(status_error(status, text));
        }

        parse_response(&text)
    }
}
