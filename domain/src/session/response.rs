//! Provider response types.
//!
//! A response is a list of content blocks: plain text, or tool-use requests
//! when the provider supports native function calling. Plan generation
//! prefers a `create_plan` tool-use block and falls back to text.

use serde_json::{Map, Value};

/// A single block of content within a provider response.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse {
        /// Provider-assigned call id
        id: String,
        name: String,
        input: Map<String, Value>,
    },
}

impl ContentBlock {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tool_use(&self) -> Option<(&str, &Map<String, Value>)> {
        match self {
            ContentBlock::ToolUse { name, input, .. } => Some((name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    ToolUse,
    /// Hit the token limit; output may be truncated
    MaxTokens,
    Other(String),
}

impl StopReason {
    /// Map an OpenAI-style `finish_reason`
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" => StopReason::EndTurn,
            "tool_calls" | "function_call" | "tool_use" => StopReason::ToolUse,
            "length" | "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl LlmResponse {
    /// Text-only response
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text(text.into())],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all `Text` blocks.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Input of the first tool-use block named `name`.
    pub fn tool_use(&self, name: &str) -> Option<&Map<String, Value>> {
        self.content
            .iter()
            .filter_map(ContentBlock::as_tool_use)
            .find(|(n, _)| *n == name)
            .map(|(_, input)| input)
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }

    pub fn is_truncated(&self) -> bool {
        self.stop_reason == Some(StopReason::MaxTokens)
    }
}
