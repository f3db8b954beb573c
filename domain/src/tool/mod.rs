//! Tool domain module
//!
//! ```text
//! ToolSpec (registry + aliases) ──▶ ToolCall ──▶ ToolResult
//! ```
//!
//! Definitions carry a [`RiskLevel`]; high-risk tools mark the owning intent
//! as requiring approval. Execution itself sits behind the application
//! layer's `ToolExecutorPort`.

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{ToolError, ToolResult};
