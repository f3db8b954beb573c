//! Intent domain entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Kind of request the user made.
///
/// Drives how the plan builder treats the request: `SimpleToolCall` gets a
/// one-step plan, `Conversation` is answered directly, everything else is
/// delegated to the plan generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentType {
    /// Small talk, greetings, acknowledgements
    Conversation,
    /// A single tool invocation with parameters taken from the text
    SimpleToolCall,
    /// Several dependent actions
    MultiStepTask,
    /// Write a snippet of code
    CodeGeneration,
    /// Write and run a snippet of code
    CodeExecution,
    /// Read, write, delete or list files
    FileOperation,
    /// Build a whole software project
    ProjectGeneration,
    /// Answer a factual question
    InformationQuery,
    /// Drive the desktop (open apps, run commands)
    SystemAutomation,
}

impl IntentType {
    pub fn as_str(&self) -> &str {
        match self {
            IntentType::Conversation => "conversation",
            IntentType::SimpleToolCall => "simple_tool_call",
            IntentType::MultiStepTask => "multi_step_task",
            IntentType::CodeGeneration => "code_generation",
            IntentType::CodeExecution => "code_execution",
            IntentType::FileOperation => "file_operation",
            IntentType::ProjectGeneration => "project_generation",
            IntentType::InformationQuery => "information_query",
            IntentType::SystemAutomation => "system_automation",
        }
    }

    /// All variants, in declaration order.
    pub fn all() -> &'static [IntentType] {
        &[
            IntentType::Conversation,
            IntentType::SimpleToolCall,
            IntentType::MultiStepTask,
            IntentType::CodeGeneration,
            IntentType::CodeExecution,
            IntentType::FileOperation,
            IntentType::ProjectGeneration,
            IntentType::InformationQuery,
            IntentType::SystemAutomation,
        ]
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for IntentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        IntentType::all()
            .iter()
            .find(|t| t.as_str() == normalized)
            .copied()
            .ok_or_else(|| format!("Unknown intent type: {}", s))
    }
}

/// Estimated complexity of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Trivial,
    #[default]
    Simple,
    Moderate,
    Complex,
}

impl Complexity {
    pub fn as_str(&self) -> &str {
        match self {
            Complexity::Trivial => "trivial",
            Complexity::Simple => "simple",
            Complexity::Moderate => "moderate",
            Complexity::Complex => "complex",
        }
    }
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Complexity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trivial" => Ok(Complexity::Trivial),
            "simple" => Ok(Complexity::Simple),
            "moderate" | "medium" => Ok(Complexity::Moderate),
            "complex" | "high" => Ok(Complexity::Complex),
            _ => Err(format!("Unknown complexity: {}", s)),
        }
    }
}

/// Confidence assigned to the degraded intent produced when classification fails.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// The classified meaning of one user request.
///
/// Produced once by the classifier and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskIntent {
    #[serde(rename = "type")]
    pub intent_type: IntentType,
    pub description: String,
    pub complexity: Complexity,
    pub estimated_steps: u32,
    pub required_tools: BTreeSet<String>,
    pub requires_approval: bool,
    /// Always within `[0, 1]`
    pub confidence: f64,
}

impl TaskIntent {
    pub fn new(intent_type: IntentType, description: impl Into<String>) -> Self {
        Self {
            intent_type,
            description: description.into(),
            complexity: Complexity::default(),
            estimated_steps: 1,
            required_tools: BTreeSet::new(),
            requires_approval: false,
            confidence: 1.0,
        }
    }

    /// Low-confidence conversation intent used whenever classification fails.
    pub fn fallback_conversation(text: &str) -> Self {
        Self::new(IntentType::Conversation, text.trim())
            .with_complexity(Complexity::Trivial)
            .with_confidence(FALLBACK_CONFIDENCE)
    }

    pub fn with_complexity(mut self, complexity: Complexity) -> Self {
        self.complexity = complexity;
        self
    }

    pub fn with_estimated_steps(mut self, steps: u32) -> Self {
        self.estimated_steps = steps;
        self
    }

    pub fn with_tool(mut self, tool: impl Into<String>) -> Self {
        self.required_tools.insert(tool.into());
        self
    }

    pub fn with_approval(mut self, requires_approval: bool) -> Self {
        self.requires_approval = requires_approval;
        self
    }

    /// Set the confidence, clamped into `[0, 1]` (NaN becomes 0).
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        self
    }

    /// First required tool in name order, if any.
    pub fn primary_tool(&self) -> Option<&str> {
        self.required_tools.iter().next().map(|s| s.as_str())
    }

    pub fn is_conversation(&self) -> bool {
        self.intent_type == IntentType::Conversation
    }

    pub fn is_project_generation(&self) -> bool {
        self.intent_type == IntentType::ProjectGeneration
    }
}
