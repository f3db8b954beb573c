//! LLM Gateway port
//!
//! The engine's only view of a language-model provider: send messages, get
//! back text and/or tool-use blocks.

use async_trait::async_trait;
use deskpilot_domain::{LlmResponse, Message};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A function the provider may call instead of answering in text
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSpec {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments
    pub parameters: Value,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}

/// Per-call provider options
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatOptions {
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    /// Ask the provider for a bare JSON object
    pub json_response: bool,
    pub functions: Vec<FunctionSpec>,
}

impl ChatOptions {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }

    pub fn with_function(mut self, function: FunctionSpec) -> Self {
        self.functions.push(function);
        self
    }
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer. Any error is
/// treated by the engine as a failure of the step or attempt that made the
/// call.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        options: &ChatOptions,
    ) -> Result<LlmResponse, GatewayError>;
}
