//! Tool Executor port
//!
//! The tool registry as seen by `tool_call` steps.

use async_trait::async_trait;
use deskpilot_domain::{ToolCall, ToolDefinition, ToolResult, ToolSpec};

/// Port for tool execution
///
/// Implementations (adapters) live in the infrastructure layer. `execute`
/// never returns `Err`: failures come back as an unsuccessful [`ToolResult`].
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Whether `name` (or an alias of it) is registered
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().resolve(name).is_some()
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get_resolved(name)
    }

    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
