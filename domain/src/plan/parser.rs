//! Plan parsing from generator output.
//!
//! Turns the loosely-shaped JSON a provider returns into [`PlanStep`]s. The
//! parser is forgiving about field names and id types but performs no graph
//! validation: cycles and dangling dependencies are left for the executor.
//!
//! Expected schema:
//! ```json
//! {
//!   "steps": [
//!     {
//!       "id": "string | number",
//!       "description": "string",
//!       "action": { "type": "tool_call", "tool": "open_app", "params": { ... } },
//!       "dependencies": ["id", ...],
//!       "retryable": true,
//!       "estimatedDuration": 2000
//!     }
//!   ],
//!   "estimatedDuration": 10000,
//!   "estimatedTokens": 4000
//! }
//! ```
//! A bare top-level array of steps is accepted too.

use super::entities::{DEFAULT_STEP_DURATION_MS, FileOperationKind, PlanStep, StepAction, StepId};
use serde_json::{Map, Value};

/// Default wait when a `wait` action has no usable duration (ms).
const DEFAULT_WAIT_MS: u64 = 1_000;

/// Steps and optional envelope estimates extracted from generator output.
#[derive(Debug, Clone)]
pub struct ParsedPlan {
    pub steps: Vec<PlanStep>,
    pub estimated_duration_ms: Option<u64>,
    pub estimated_tokens: Option<u64>,
}

/// Numbers become strings; null, blank and non-scalar values become `None`.
fn json_value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_field<'a>(obj: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| obj.get(*n)).filter(|v| !v.is_null())
}

fn first_str(obj: &Map<String, Value>, names: &[&str]) -> Option<String> {
    first_field(obj, names).and_then(json_value_to_string)
}

fn first_u64(obj: &Map<String, Value>, names: &[&str]) -> Option<u64> {
    first_field(obj, names).and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Parse a plan from an already-decoded JSON value.
///
/// Returns `None` when there is no step list or it is empty.
pub fn parse_plan_value(json: &Value) -> Option<ParsedPlan> {
    let (raw_steps, envelope) = match json {
        Value::Array(items) => (items, None),
        Value::Object(obj) => {
            let steps = first_field(obj, &["steps", "plan", "tasks"])?.as_array()?;
            (steps, Some(obj))
        }
        _ => return None,
    };

    if raw_steps.is_empty() {
        return None;
    }

    let steps = raw_steps
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| raw.as_object().map(|obj| parse_step(index, obj)))
        .collect::<Vec<_>>();

    if steps.is_empty() {
        return None;
    }

    Some(ParsedPlan {
        steps,
        estimated_duration_ms: envelope
            .and_then(|o| first_u64(o, &["estimatedDuration", "estimated_duration"])),
        estimated_tokens: envelope
            .and_then(|o| first_u64(o, &["estimatedTokens", "estimated_tokens"])),
    })
}

fn parse_step(index: usize, obj: &Map<String, Value>) -> PlanStep {
    let id = first_str(obj, &["id", "stepId", "step_id"])
        .unwrap_or_else(|| format!("step_{}", index + 1));
    let description = first_str(obj, &["description", "name", "title"])
        .unwrap_or_else(|| "No description".to_string());

    let action = parse_action(obj, &description);

    let mut step = PlanStep::new(id, description, action)
        .retryable(
            first_field(obj, &["retryable", "retry"])
                .and_then(Value::as_bool)
                .unwrap_or(true),
        )
        .with_estimated_duration(
            first_u64(obj, &["estimatedDuration", "estimated_duration"])
                .unwrap_or(DEFAULT_STEP_DURATION_MS),
        );

    if let Some(deps) = first_field(obj, &["dependencies", "depends_on", "dependsOn"])
        .and_then(Value::as_array)
    {
        for dep in deps {
            if let Some(dep_id) = json_value_to_string(dep) {
                step = step.with_dependency(StepId::new(dep_id));
            }
        }
    }

    step
}

/// Resolve the action payload: either a nested `action` object or the step
/// object itself carrying a `type`/`action` string.
fn parse_action(step: &Map<String, Value>, description: &str) -> StepAction {
    let (kind, payload) = match step.get("action") {
        Some(Value::Object(action)) => (first_str(action, &["type", "kind"]), action),
        Some(Value::String(kind)) => (Some(kind.clone()), step),
        _ => (first_str(step, &["type", "kind"]), step),
    };

    let Some(kind) = kind else {
        return StepAction::Unsupported {
            action_type: "missing".to_string(),
        };
    };

    let normalized = kind.to_lowercase().replace(['-', ' '], "_");
    match normalized.as_str() {
        "tool_call" | "tool" => {
            match first_str(payload, &["tool", "toolName", "tool_name", "name"]) {
                Some(tool) => StepAction::ToolCall {
                    tool,
                    params: first_field(payload, &["params", "parameters", "args", "arguments"])
                        .and_then(Value::as_object)
                        .cloned()
                        .unwrap_or_default(),
                },
                None => malformed(&normalized),
            }
        }
        "code_gen" | "codegen" | "code_generation" => StepAction::CodeGen {
            language: first_str(payload, &["language", "lang"])
                .unwrap_or_else(|| "javascript".to_string()),
            prompt: first_str(payload, &["prompt", "task"])
                .unwrap_or_else(|| description.to_string()),
        },
        "llm_query" | "query" => StepAction::LlmQuery {
            prompt: first_str(payload, &["prompt", "query", "question"])
                .unwrap_or_else(|| description.to_string()),
            context: first_field(payload, &["context"]).cloned(),
        },
        "file_operation" | "file_op" | "file" => {
            let operation = first_str(payload, &["operation", "op"])
                .and_then(|op| op.parse::<FileOperationKind>().ok());
            let path = first_str(payload, &["path", "file", "filePath"]);
            match (operation, path) {
                (Some(operation), Some(path)) => StepAction::FileOperation {
                    operation,
                    path,
                    content: first_field(payload, &["content", "data"])
                        .and_then(Value::as_str)
                        .map(str::to_string),
                },
                _ => malformed(&normalized),
            }
        }
        "wait" | "delay" | "sleep" => StepAction::Wait {
            duration_ms: first_u64(payload, &["duration_ms", "durationMs", "duration", "ms"])
                .unwrap_or(DEFAULT_WAIT_MS),
        },
        "user_input" | "ask_user" => StepAction::UserInput {
            prompt: first_str(payload, &["prompt", "question"])
                .unwrap_or_else(|| description.to_string()),
        },
        _ => StepAction::Unsupported { action_type: kind },
    }
}

fn malformed(kind: &str) -> StepAction {
    StepAction::Unsupported {
        action_type: format!("{} (malformed)", kind),
    }
}
