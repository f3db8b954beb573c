//! Tool result and error types

use serde::{Deserialize, Serialize};

/// Error that occurred during tool execution.
///
/// | Code | Meaning |
/// |------|---------|
/// | `NOT_FOUND` | Unknown tool or missing resource |
/// | `INVALID_ARGUMENT` | Missing or malformed parameter |
/// | `EXECUTION_FAILED` | Runtime failure (I/O, non-zero exit) |
/// | `TIMEOUT` | Operation exceeded its time limit |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    pub code: String,
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Not found: {}", resource.into()))
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", format!("Unknown tool: {}", name.into()))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new("TIMEOUT", format!("Operation timed out: {}", operation.into()))
    }

    pub fn is_not_found(&self) -> bool {
        self.code == "NOT_FOUND"
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one tool invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: true,
            output: Some(output.into()),
            error: None,
            duration_ms: None,
        }
    }

    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            success: false,
            output: None,
            error: Some(error),
            duration_ms: None,
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// Output decoded as JSON when it is JSON, otherwise as a plain string.
    pub fn output_value(&self) -> serde_json::Value {
        let raw = self.output.as_deref().unwrap_or_default();
        serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_display() {
        let result = ToolResult::failure("open_app", ToolError::unknown_tool("open_app"));
        assert!(!result.is_success());
        assert!(result.error().unwrap().is_not_found());
        assert_eq!(result.error().unwrap().to_string(), "[NOT_FOUND] Unknown tool: open_app");
    }

    #[test]
    fn test_output_value() {
        assert_eq!(ToolResult::success("t", r#"{"ok": true}"#).output_value(), json!({"ok": true}));
        assert_eq!(ToolResult::success("t", "plain text").output_value(), json!("plain text"));
        assert_eq!(ToolResult::success("t", "42").output_value(), json!(42));
    }
}
