//! Plan domain entities

use crate::intent::TaskIntent;
use crate::util::{current_timestamp_ms, generate_id};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default per-step duration estimate when the generator gives none (ms).
pub const DEFAULT_STEP_DURATION_MS: u64 = 5_000;

/// Default per-step token estimate when the generator gives none.
pub const DEFAULT_STEP_TOKENS: u64 = 1_500;

/// Identifier of a step, unique within its plan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StepId(String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StepId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StepId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// File operation kinds for [`StepAction::FileOperation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileOperationKind {
    Read,
    Write,
    Delete,
    List,
}

impl FileOperationKind {
    pub fn as_str(&self) -> &str {
        match self {
            FileOperationKind::Read => "read",
            FileOperationKind::Write => "write",
            FileOperationKind::Delete => "delete",
            FileOperationKind::List => "list",
        }
    }
}

impl std::str::FromStr for FileOperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "read" => Ok(FileOperationKind::Read),
            "write" | "create" => Ok(FileOperationKind::Write),
            "delete" | "remove" => Ok(FileOperationKind::Delete),
            "list" | "ls" => Ok(FileOperationKind::List),
            _ => Err(format!("Unknown file operation: {}", s)),
        }
    }
}

/// What a step does.
///
/// `Unsupported` only comes out of plan parsing when the generator emits an
/// action type this engine does not know; executing it always fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepAction {
    /// Invoke a registered tool by name
    ToolCall {
        tool: String,
        #[serde(default)]
        params: Map<String, Value>,
    },
    /// Generate code with the provider, then run it
    CodeGen { language: String, prompt: String },
    /// Ask the provider a question
    LlmQuery {
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        context: Option<Value>,
    },
    /// Touch the file system
    FileOperation {
        operation: FileOperationKind,
        path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<String>,
    },
    /// Pause without side effects
    Wait { duration_ms: u64 },
    /// Ask the user something
    UserInput { prompt: String },
    /// Action type not understood by this engine
    Unsupported { action_type: String },
}

impl StepAction {
    pub fn kind(&self) -> &str {
        match self {
            StepAction::ToolCall { .. } => "tool_call",
            StepAction::CodeGen { .. } => "code_gen",
            StepAction::LlmQuery { .. } => "llm_query",
            StepAction::FileOperation { .. } => "file_operation",
            StepAction::Wait { .. } => "wait",
            StepAction::UserInput { .. } => "user_input",
            StepAction::Unsupported { action_type } => action_type,
        }
    }
}

/// A single step of an [`ExecutionPlan`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: StepId,
    pub description: String,
    pub action: StepAction,
    /// Steps that must complete before this one
    pub dependencies: Vec<StepId>,
    /// Whether one retry is allowed after a failure
    pub retryable: bool,
    /// Estimated duration in milliseconds
    pub estimated_duration_ms: u64,
}

impl PlanStep {
    pub fn new(id: impl Into<StepId>, description: impl Into<String>, action: StepAction) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            action,
            dependencies: Vec::new(),
            retryable: false,
            estimated_duration_ms: DEFAULT_STEP_DURATION_MS,
        }
    }

    pub fn with_dependency(mut self, id: impl Into<StepId>) -> Self {
        let id = id.into();
        if !self.dependencies.contains(&id) {
            self.dependencies.push(id);
        }
        self
    }

    pub fn retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }

    pub fn with_estimated_duration(mut self, ms: u64) -> Self {
        self.estimated_duration_ms = ms;
        self
    }
}

/// An ordered set of steps answering one request.
///
/// Never mutated after creation; the executor orders a borrowed view of the
/// steps rather than the plan itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub id: String,
    pub intent: TaskIntent,
    pub steps: Vec<PlanStep>,
    pub estimated_duration_ms: u64,
    pub estimated_tokens: u64,
    /// Creation time, milliseconds since the Unix epoch
    pub created_at: u64,
}

impl ExecutionPlan {
    /// Wrap steps in a plan envelope, filling estimates from per-step defaults.
    pub fn new(intent: TaskIntent, steps: Vec<PlanStep>) -> Self {
        let estimated_duration_ms = steps.iter().map(|s| s.estimated_duration_ms).sum();
        let estimated_tokens = steps.len() as u64 * DEFAULT_STEP_TOKENS;
        Self {
            id: format!("plan-{}", generate_id()),
            intent,
            steps,
            estimated_duration_ms,
            estimated_tokens,
            created_at: current_timestamp_ms(),
        }
    }

    pub fn with_estimated_duration(mut self, ms: u64) -> Self {
        self.estimated_duration_ms = ms;
        self
    }

    pub fn with_estimated_tokens(mut self, tokens: u64) -> Self {
        self.estimated_tokens = tokens;
        self
    }

    pub fn step(&self, id: &StepId) -> Option<&PlanStep> {
        self.steps.iter().find(|s| &s.id == id)
    }

    /// Last step in declaration order
    pub fn last_step(&self) -> Option<&PlanStep> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}
