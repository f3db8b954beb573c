//! Mock ports shared by the use case tests.

use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use crate::ports::file_system::FileSystemPort;
use crate::ports::generation_progress::GenerationProgressNotifier;
use crate::ports::llm_gateway::{ChatOptions, GatewayError, LlmGateway};
use crate::ports::plan_progress::PlanProgressNotifier;
use crate::ports::process_runner::{
    ProcessError, ProcessOptions, ProcessOutput, ProcessRunnerPort,
};
use crate::ports::tool_executor::ToolExecutorPort;
use async_trait::async_trait;
use deskpilot_domain::{
    ExecutionPlan, ExecutionResult, LlmResponse, Message, PlanStep, ProjectAnalysis, RiskLevel,
    ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult, ToolSpec,
};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Gateway that replays scripted replies in order.
pub(crate) struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<LlmResponse, GatewayError>>>,
    /// Every message list the gateway received
    pub calls: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedGateway {
    pub fn new(replies: Vec<Result<LlmResponse, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(LlmResponse::from_text(*t)))
                .collect(),
        )
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Content of the last message of call `index`.
    pub fn prompt(&self, index: usize) -> String {
        self.calls.lock().unwrap()[index]
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn chat(
        &self,
        messages: &[Message],
        _options: &ChatOptions,
    ) -> Result<LlmResponse, GatewayError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("script exhausted".to_string())))
    }
}

/// Tool executor with a fixed registry and scripted results per tool.
pub(crate) struct MockToolExecutor {
    spec: ToolSpec,
    results: Mutex<HashMap<String, VecDeque<ToolResult>>>,
    pub calls: Mutex<Vec<ToolCall>>,
}

impl MockToolExecutor {
    pub fn new() -> Self {
        let spec = ToolSpec::new()
            .register(
                ToolDefinition::new("open_app", "Open an application", RiskLevel::Low)
                    .with_parameter(ToolParameter::new("name", "Application name", true)),
            )
            .register(
                ToolDefinition::new("delete_file", "Delete a file", RiskLevel::High)
                    .with_parameter(ToolParameter::new("path", "Target path", true)),
            )
            .register_alias("launch", "open_app");
        Self {
            spec,
            results: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn script(self, tool: &str, results: Vec<ToolResult>) -> Self {
        self.results
            .lock()
            .unwrap()
            .insert(tool.to_string(), results.into());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ToolExecutorPort for MockToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        self.calls.lock().unwrap().push(call.clone());
        let Some(name) = self.spec.resolve(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };
        self.results
            .lock()
            .unwrap()
            .get_mut(name)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| ToolResult::success(name, "ok"))
    }
}

/// Process runner replaying scripted outcomes.
pub(crate) struct MockProcessRunner {
    outcomes: Mutex<VecDeque<Result<ProcessOutput, ProcessError>>>,
    /// Program, arguments and working directory of every run
    pub runs: Mutex<Vec<(String, Vec<String>, Option<PathBuf>)>>,
}

impl MockProcessRunner {
    pub fn new(outcomes: Vec<Result<ProcessOutput, ProcessError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            runs: Mutex::new(Vec::new()),
        }
    }

    pub fn stdout(text: &str) -> Result<ProcessOutput, ProcessError> {
        Ok(ProcessOutput {
            stdout: text.to_string(),
            stderr: String::new(),
            exit_code: Some(0),
        })
    }
}

#[async_trait]
impl ProcessRunnerPort for MockProcessRunner {
    async fn run(
        &self,
        program: &str,
        args: &[String],
        options: &ProcessOptions,
    ) -> Result<ProcessOutput, ProcessError> {
        self.runs.lock().unwrap().push((
            program.to_string(),
            args.to_vec(),
            options.working_dir.clone(),
        ));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Self::stdout(""))
    }
}

/// In-memory file system.
#[derive(Default)]
pub(crate) struct MemoryFileSystem {
    pub files: Mutex<BTreeMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        self
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.lock().unwrap().contains_key(Path::new(path))
    }
}

impl FileSystemPort for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn list(&self, path: &Path) -> io::Result<Vec<String>> {
        let files = self.files.lock().unwrap();
        let mut names: Vec<String> = files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        Ok(names)
    }
}

/// Records every progress event as a short string.
#[derive(Default)]
pub(crate) struct RecordingProgress {
    pub events: Mutex<Vec<String>>,
}

impl RecordingProgress {
    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl PlanProgressNotifier for RecordingProgress {
    fn on_plan_start(&self, plan: &ExecutionPlan) {
        self.push(format!("plan-start:{}", plan.len()));
    }

    fn on_step_start(&self, step: &PlanStep, _index: usize, _total: usize, percent: f64) {
        self.push(format!("step-start:{}:{}", step.id, percent.round()));
    }

    fn on_step_complete(&self, step: &PlanStep, _result: &Value) {
        self.push(format!("step-complete:{}", step.id));
    }

    fn on_step_error(&self, step: &PlanStep, _error: &str) {
        self.push(format!("step-error:{}", step.id));
    }

    fn on_step_retry(&self, step: &PlanStep) {
        self.push(format!("step-retry:{}", step.id));
    }

    fn on_plan_complete(&self, result: &ExecutionResult) {
        self.push(format!("plan-complete:{}", result.steps_completed));
    }

    fn on_plan_error(&self, _error: &str) {
        self.push("plan-error".to_string());
    }
}

impl GenerationProgressNotifier for RecordingProgress {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        self.push(format!("attempt:{}/{}", attempt, max_attempts));
    }

    fn on_attempt_failed(&self, attempt: usize, violations: &[String]) {
        self.push(format!("attempt-failed:{}:{}", attempt, violations.len()));
    }

    fn on_enhanced(&self, _project: &ProjectAnalysis, added_files: &[String]) {
        self.push(format!("enhanced:{}", added_files.len()));
    }

    fn on_fallback(&self, project: &ProjectAnalysis) {
        self.push(format!("fallback:{}", project.name));
    }
}

/// Keeps every logged event type.
#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub events: Mutex<Vec<ConversationEvent>>,
}

impl RecordingLogger {
    pub fn types(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.event_type)
            .collect()
    }
}

impl ConversationLogger for RecordingLogger {
    fn log(&self, event: ConversationEvent) {
        self.events.lock().unwrap().push(event);
    }
}
