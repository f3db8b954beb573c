//! Domain layer for deskpilot
//!
//! Pure types and pure logic of the plan execution engine. Nothing in this
//! crate performs I/O; providers, tools, processes and the file system are
//! reached through ports defined in the application layer.
//!
//! # Core Concepts
//!
//! ## Intent → Plan → Result
//!
//! - **[`TaskIntent`]**: what the user asked for, produced by classification
//! - **[`ExecutionPlan`]**: ordered [`PlanStep`]s with declared dependencies
//! - **[`ExecutionResult`]**: terminal record of one run, with [`Artifact`]s
//!
//! ## Project generation
//!
//! - **[`ProjectAnalysis`]**: a generated project candidate
//! - [`validate_project`], [`enhance_project`], [`fallback_project`] and
//!   [`validate_match`] implement the completeness and relevance rules

pub mod config;
pub mod core;
pub mod intent;
pub mod parsing;
pub mod plan;
pub mod project;
pub mod prompt;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use core::error::DomainError;
pub use intent::{Complexity, IntentType, TaskIntent, match_fast_path};
pub use parsing::{ParseError, parse_structured_response, strip_code_fences};
pub use plan::{
    Artifact, ArtifactType, ExecutionPlan, ExecutionResult, FileOperationKind, ParsedPlan,
    PlanOrderError, PlanStep, StepAction, StepId, execution_order, parse_plan_value,
    synthesize_output,
};
pub use project::{
    MatchResult, ProjectAnalysis, ProjectFile, ProjectRequest, ProjectValidationError,
    enhance_project, fallback_project, validate_match, validate_project,
};
pub use prompt::{CREATE_PLAN_TOOL, EnginePromptTemplate};
pub use session::{ContentBlock, LlmResponse, Message, Role, StopReason};
pub use tool::{
    DefaultToolValidator, RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter,
    ToolResult, ToolSpec, ToolValidator,
};
