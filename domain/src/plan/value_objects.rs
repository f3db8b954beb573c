//! Plan execution value objects: artifacts, results and output synthesis.

use super::entities::{ExecutionPlan, StepId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;

/// Kind of thing a step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactType {
    File,
    Code,
    Data,
    Project,
    Url,
}

impl ArtifactType {
    pub fn as_str(&self) -> &str {
        match self {
            ArtifactType::File => "file",
            ArtifactType::Code => "code",
            ArtifactType::Data => "data",
            ArtifactType::Project => "project",
            ArtifactType::Url => "url",
        }
    }
}

impl std::fmt::Display for ArtifactType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Something a step produced that the caller may want to show or keep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    #[serde(rename = "type")]
    pub artifact_type: ArtifactType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl Artifact {
    pub fn new(artifact_type: ArtifactType) -> Self {
        Self {
            artifact_type,
            path: None,
            content: None,
            metadata: Map::new(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Extract the `artifact` field of a step result, if present and well-formed.
    pub fn from_step_result(result: &Value) -> Option<Self> {
        let raw = result.as_object()?.get("artifact")?;
        serde_json::from_value(raw.clone()).ok()
    }

    /// Embed this artifact into a step result object under `artifact`.
    pub fn attach_to(&self, mut result: Map<String, Value>) -> Value {
        if let Ok(value) = serde_json::to_value(self) {
            result.insert("artifact".to_string(), value);
        }
        Value::Object(result)
    }
}

/// Terminal record of one plan run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub success: bool,
    pub plan_id: String,
    pub steps_completed: usize,
    pub total_steps: usize,
    pub output: Value,
    pub artifacts: Vec<Artifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,
}

impl ExecutionResult {
    pub fn succeeded(
        plan: &ExecutionPlan,
        output: Value,
        artifacts: Vec<Artifact>,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: true,
            plan_id: plan.id.clone(),
            steps_completed: plan.len(),
            total_steps: plan.len(),
            output,
            artifacts,
            error: None,
            duration_ms,
        }
    }

    pub fn failed(
        plan: &ExecutionPlan,
        steps_completed: usize,
        artifacts: Vec<Artifact>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            success: false,
            plan_id: plan.id.clone(),
            steps_completed,
            total_steps: plan.len(),
            output: Value::Null,
            artifacts,
            error: Some(error.into()),
            duration_ms,
        }
    }

    /// Short human-readable rendering of `output`.
    pub fn output_text(&self) -> String {
        match &self.output {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Build the run's output value.
///
/// Keyed on the last step in *declaration* order, not the last one executed.
/// A string or number result is returned verbatim; anything else becomes a
/// record of every step's id, description and result plus `finalResult`.
pub fn synthesize_output(plan: &ExecutionPlan, results: &HashMap<StepId, Value>) -> Value {
    let Some(last) = plan.last_step() else {
        return Value::Null;
    };
    let final_result = results.get(&last.id).cloned().unwrap_or(Value::Null);

    if matches!(final_result, Value::String(_) | Value::Number(_)) {
        return final_result;
    }

    let steps: Vec<Value> = plan
        .steps
        .iter()
        .map(|step| {
            json!({
                "id": step.id.as_str(),
                "description": step.description,
                "result": results.get(&step.id).cloned().unwrap_or(Value::Null),
            })
        })
        .collect();

    json!({
        "steps": steps,
        "finalResult": final_result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentType, TaskIntent};
    use crate::plan::entities::{PlanStep, StepAction};

    fn plan(ids: &[&str]) -> ExecutionPlan {
        let steps = ids
            .iter()
            .map(|id| PlanStep::new(*id, format!("do {}", id), StepAction::Wait { duration_ms: 0 }))
            .collect();
        ExecutionPlan::new(TaskIntent::new(IntentType::MultiStepTask, "t"), steps)
    }

    #[test]
    fn test_primitive_last_result_is_verbatim() {
        let plan = plan(&["a", "b"]);
        let mut results = HashMap::new();
        results.insert(StepId::new("a"), json!({"x": 1}));
        results.insert(StepId::new("b"), json!("done"));
        assert_eq!(synthesize_output(&plan, &results), json!("done"));

        results.insert(StepId::new("b"), json!(42));
        assert_eq!(synthesize_output(&plan, &results), json!(42));
    }

    #[test]
    fn test_structured_last_result_is_composed() {
        let plan = plan(&["a", "b"]);
        let mut results = HashMap::new();
        results.insert(StepId::new("a"), json!("first"));
        results.insert(StepId::new("b"), json!({"files": 3}));

        let output = synthesize_output(&plan, &results);
        assert_eq!(output["finalResult"], json!({"files": 3}));
        assert_eq!(output["steps"][0]["id"], "a");
        assert_eq!(output["steps"][0]["description"], "do a");
        assert_eq!(output["steps"][0]["result"], "first");
        assert_eq!(output["steps"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_uses_declaration_order_last_step() {
        // "b" is declared last even if it would have executed first.
        let plan = plan(&["a", "b"]);
        let mut results = HashMap::new();
        results.insert(StepId::new("a"), json!("executed last"));
        results.insert(StepId::new("b"), json!("declared last"));
        assert_eq!(synthesize_output(&plan, &results), json!("declared last"));
    }

    #[test]
    fn test_artifact_from_step_result() {
        let artifact = Artifact::new(ArtifactType::File).with_path("out.txt");
        let result = artifact.attach_to(Map::new());
        assert_eq!(Artifact::from_step_result(&result), Some(artifact));

        assert!(Artifact::from_step_result(&json!("plain")).is_none());
        assert!(Artifact::from_step_result(&json!({"artifact": {"type": "hologram"}})).is_none());
    }

    #[test]
    fn test_failed_result_keeps_partial_artifacts() {
        let plan = plan(&["a", "b", "c"]);
        let artifacts = vec![Artifact::new(ArtifactType::Code)];
        let result = ExecutionResult::failed(&plan, 1, artifacts, "boom", 12);
        assert!(!result.success);
        assert_eq!(result.steps_completed, 1);
        assert_eq!(result.total_steps, 3);
        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(result.error.as_deref(), Some("boom"));
    }
}
