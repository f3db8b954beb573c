//! Execute Plan use case.
//!
//! [`PlanExecutor::run`] orders a plan's steps, executes them one at a time
//! and folds the results into an [`ExecutionResult`].
//!
//! # Run lifecycle
//!
//! ```text
//! Idle ──▶ Sorting ──▶ Executing(i) ──▶ Completed
//!             │             │
//!             └─────────────┴──────────▶ Failed
//! ```
//!
//! - A structural error (cycle, unknown or duplicate id) fails the run
//!   before any step executes.
//! - A failed step is re-executed exactly once when it is `retryable`;
//!   a second failure, or any failure of a non-retryable step, fails the run.
//! - Artifacts are collected in completion order. Partial artifacts are
//!   returned with a failed run.
//!
//! All mutable state lives in a per-call [`RunContext`], so one executor can
//! serve concurrent runs.

use crate::config::EngineParams;
use crate::ports::file_system::FileSystemPort;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use crate::ports::plan_progress::PlanProgressNotifier;
use crate::ports::process_runner::{ProcessError, ProcessOptions, ProcessRunnerPort};
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::user_input::{UserInputError, UserInputPort};
use deskpilot_domain::util::truncate_str;
use deskpilot_domain::{
    Artifact, ArtifactType, DefaultToolValidator, EnginePromptTemplate, ExecutionPlan,
    ExecutionResult, FileOperationKind, Message, PlanStep, StepAction, StepId, ToolCall,
    ToolValidator, execution_order, strip_code_fences, synthesize_output,
};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a single step failed.
#[derive(Error, Debug)]
pub enum StepError {
    #[error("Unknown action '{0}'")]
    UnknownAction(String),

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Tool '{tool}' failed: {message}")]
    Tool { tool: String, message: String },

    #[error("Invalid step: {0}")]
    Invalid(String),

    #[error("Provider error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("File operation on '{path}' failed: {source}")]
    File {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("User input failed: {0}")]
    UserInput(#[from] UserInputError),
}

impl StepError {
    fn file(path: &Path, source: io::Error) -> Self {
        StepError::File {
            path: path.display().to_string(),
            source,
        }
    }
}

/// Mutable state of one run.
#[derive(Default)]
struct RunContext {
    results: HashMap<StepId, Value>,
    artifacts: Vec<Artifact>,
}

/// Interpreter and file extension for a `code_gen` language.
fn interpreter(language: &str) -> Option<(&'static str, &'static str)> {
    match language.trim().to_lowercase().as_str() {
        "javascript" | "js" | "node" | "nodejs" => Some(("node", "js")),
        "python" | "python3" | "py" => Some(("python3", "py")),
        "shell" | "sh" | "bash" => Some(("sh", "sh")),
        _ => None,
    }
}

fn scratch_path(dir: &Path, step: &StepId, extension: &str) -> PathBuf {
    let safe: String = step
        .as_str()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S%3f");
    dir.join(format!("step-{}-{}.{}", safe, stamp, extension))
}

pub struct PlanExecutor {
    gateway: Arc<dyn LlmGateway>,
    tools: Arc<dyn ToolExecutorPort>,
    processes: Arc<dyn ProcessRunnerPort>,
    files: Arc<dyn FileSystemPort>,
    user_input: Option<Arc<dyn UserInputPort>>,
    params: EngineParams,
}

impl PlanExecutor {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        processes: Arc<dyn ProcessRunnerPort>,
        files: Arc<dyn FileSystemPort>,
    ) -> Self {
        Self {
            gateway,
            tools,
            processes,
            files,
            user_input: None,
            params: EngineParams::default(),
        }
    }

    pub fn with_user_input(mut self, user_input: Arc<dyn UserInputPort>) -> Self {
        self.user_input = Some(user_input);
        self
    }

    pub fn with_params(mut self, params: EngineParams) -> Self {
        self.params = params;
        self
    }

    /// Run `plan` to completion or first unrecovered failure.
    pub async fn run(
        &self,
        plan: &ExecutionPlan,
        progress: &dyn PlanProgressNotifier,
    ) -> ExecutionResult {
        let started = Instant::now();
        let elapsed = || started.elapsed().as_millis() as u64;
        progress.on_plan_start(plan);

        let order = match execution_order(&plan.steps) {
            Ok(order) => order,
            Err(e) => {
                let message = e.to_string();
                warn!("Plan {} rejected: {}", plan.id, message);
                progress.on_plan_error(&message);
                return ExecutionResult::failed(plan, 0, Vec::new(), message, elapsed());
            }
        };

        info!("Executing plan {} ({} steps)", plan.id, order.len());
        let mut ctx = RunContext::default();
        let total = order.len();

        for (index, step) in order.into_iter().enumerate() {
            let percent = index as f64 / total as f64 * 100.0;
            progress.on_step_start(step, index, total, percent);
            debug!("Step {} ({}): {}", step.id, step.action.kind(), step.description);

            match self.run_with_retry(step, &ctx, progress).await {
                Ok(result) => {
                    if let Some(artifact) = Artifact::from_step_result(&result) {
                        ctx.artifacts.push(artifact);
                    }
                    progress.on_step_complete(step, &result);
                    ctx.results.insert(step.id.clone(), result);
                }
                Err(e) => {
                    let message = format!("Step '{}' failed: {}", step.id, e);
                    warn!("{}", message);
                    progress.on_plan_error(&message);
                    return ExecutionResult::failed(
                        plan,
                        ctx.results.len(),
                        ctx.artifacts,
                        message,
                        elapsed(),
                    );
                }
            }
        }

        let output = synthesize_output(plan, &ctx.results);
        let result = ExecutionResult::succeeded(plan, output, ctx.artifacts, elapsed());
        info!("Plan {} completed in {}ms", plan.id, result.duration_ms);
        progress.on_plan_complete(&result);
        result
    }

    /// At most two attempts, and only for retryable steps.
    async fn run_with_retry(
        &self,
        step: &PlanStep,
        ctx: &RunContext,
        progress: &dyn PlanProgressNotifier,
    ) -> Result<Value, StepError> {
        let error = match self.execute_step(step, ctx).await {
            Ok(result) => return Ok(result),
            Err(e) => e,
        };
        progress.on_step_error(step, &error.to_string());
        if !step.retryable {
            return Err(error);
        }

        info!("Retrying step {} after: {}", step.id, error);
        progress.on_step_retry(step);
        self.execute_step(step, ctx).await.inspect_err(|e| {
            progress.on_step_error(step, &e.to_string());
        })
    }

    async fn execute_step(&self, step: &PlanStep, ctx: &RunContext) -> Result<Value, StepError> {
        match &step.action {
            StepAction::ToolCall { tool, params } => self.call_tool(tool, params).await,
            StepAction::CodeGen { language, prompt } => {
                self.generate_and_run(step, language, prompt).await
            }
            StepAction::LlmQuery { prompt, context } => {
                self.query(step, prompt, context.as_ref(), ctx).await
            }
            StepAction::FileOperation {
                operation,
                path,
                content,
            } => self.file_operation(*operation, path, content.as_deref()),
            StepAction::Wait { duration_ms } => {
                tokio::time::sleep(Duration::from_millis(*duration_ms)).await;
                Ok(json!({ "waited_ms": duration_ms }))
            }
            StepAction::UserInput { prompt } => match &self.user_input {
                Some(port) => Ok(Value::String(port.ask(prompt).await?)),
                None => Err(StepError::UnknownAction("user_input".to_string())),
            },
            StepAction::Unsupported { action_type } => {
                Err(StepError::UnknownAction(action_type.clone()))
            }
        }
    }

    // ==================== Action handlers ====================

    async fn call_tool(&self, tool: &str, params: &Map<String, Value>) -> Result<Value, StepError> {
        let definition = self
            .tools
            .get_tool(tool)
            .ok_or_else(|| StepError::UnknownTool(tool.to_string()))?;

        let call = ToolCall::new(tool).with_arguments(params.clone());
        DefaultToolValidator
            .validate(&call, definition)
            .map_err(StepError::Invalid)?;

        let result = self.tools.execute(&call).await;
        if !result.is_success() {
            let message = result
                .error()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(StepError::Tool {
                tool: tool.to_string(),
                message,
            });
        }
        Ok(result.output_value())
    }

    async fn generate_and_run(
        &self,
        step: &PlanStep,
        language: &str,
        prompt: &str,
    ) -> Result<Value, StepError> {
        let (program, extension) = interpreter(language)
            .ok_or_else(|| StepError::Invalid(format!("unsupported language '{}'", language)))?;

        let messages = [Message::user(EnginePromptTemplate::code_generation(
            language, prompt,
        ))];
        let response = self
            .gateway
            .chat(&messages, &self.params.chat_options)
            .await?;
        let code = strip_code_fences(&response.text_content());
        if code.is_empty() {
            return Err(StepError::Invalid("provider returned no code".to_string()));
        }

        let scratch_dir = self.scratch_dir();
        let path = scratch_path(&scratch_dir, &step.id, extension);
        self.files
            .write(&path, &code)
            .map_err(|e| StepError::file(&path, e))?;

        let options = ProcessOptions {
            timeout: self.params.code_timeout,
            max_buffer_bytes: self.params.max_output_bytes,
            working_dir: Some(scratch_dir),
        };
        let args = vec![path.display().to_string()];
        let output = self.processes.run(program, &args, &options).await?;
        debug!(
            "Step {} printed: {}",
            step.id,
            truncate_str(&output.stdout, 200)
        );

        let artifact = Artifact::new(ArtifactType::Code)
            .with_path(path.display().to_string())
            .with_content(code.clone())
            .with_metadata("language", language);
        let mut result = Map::new();
        result.insert("code".to_string(), Value::String(code));
        result.insert("stdout".to_string(), Value::String(output.stdout));
        result.insert("stderr".to_string(), Value::String(output.stderr));
        Ok(artifact.attach_to(result))
    }

    /// The interpreter runs inside the scratch directory, so the script path
    /// handed to it must not be relative to the caller's directory.
    fn scratch_dir(&self) -> PathBuf {
        let dir = &self.params.scratch_dir;
        std::path::absolute(dir).unwrap_or_else(|e| {
            warn!("Cannot resolve scratch dir {}: {}", dir.display(), e);
            dir.clone()
        })
    }

    /// Without an explicit context, the results of the step's dependencies
    /// are passed along.
    async fn query(
        &self,
        step: &PlanStep,
        prompt: &str,
        context: Option<&Value>,
        ctx: &RunContext,
    ) -> Result<Value, StepError> {
        let inherited = if context.is_none() && !step.dependencies.is_empty() {
            let deps: Map<String, Value> = step
                .dependencies
                .iter()
                .filter_map(|id| ctx.results.get(id).map(|v| (id.to_string(), v.clone())))
                .collect();
            Some(Value::Object(deps))
        } else {
            None
        };

        let messages = [Message::user(EnginePromptTemplate::query(
            prompt,
            context.or(inherited.as_ref()),
        ))];
        let response = self
            .gateway
            .chat(&messages, &self.params.chat_options)
            .await?;
        Ok(Value::String(response.text_content()))
    }

    fn file_operation(
        &self,
        operation: FileOperationKind,
        path: &str,
        content: Option<&str>,
    ) -> Result<Value, StepError> {
        let target = Path::new(path);
        match operation {
            FileOperationKind::Read => {
                let text = self
                    .files
                    .read_to_string(target)
                    .map_err(|e| StepError::file(target, e))?;
                Ok(Value::String(text))
            }
            FileOperationKind::Write => {
                let body = content.unwrap_or_default();
                self.files
                    .write(target, body)
                    .map_err(|e| StepError::file(target, e))?;
                let artifact = Artifact::new(ArtifactType::File)
                    .with_path(path)
                    .with_content(body);
                let mut result = Map::new();
                result.insert("path".to_string(), Value::String(path.to_string()));
                result.insert("bytes".to_string(), json!(body.len()));
                Ok(artifact.attach_to(result))
            }
            FileOperationKind::Delete => {
                self.files
                    .remove(target)
                    .map_err(|e| StepError::file(target, e))?;
                Ok(json!({ "path": path, "deleted": true }))
            }
            FileOperationKind::List => {
                let entries = self
                    .files
                    .list(target)
                    .map_err(|e| StepError::file(target, e))?;
                Ok(json!({ "path": path, "entries": entries }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::plan_progress::NoPlanProgress;
    use crate::use_cases::test_support::{
        MemoryFileSystem, MockProcessRunner, MockToolExecutor, RecordingProgress, ScriptedGateway,
    };
    use deskpilot_domain::{IntentType, TaskIntent, ToolError, ToolResult};

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        tools: Arc<MockToolExecutor>,
        processes: Arc<MockProcessRunner>,
        files: Arc<MemoryFileSystem>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                gateway: Arc::new(ScriptedGateway::texts(&[])),
                tools: Arc::new(MockToolExecutor::new()),
                processes: Arc::new(MockProcessRunner::new(vec![])),
                files: Arc::new(MemoryFileSystem::default()),
            }
        }

        fn executor(&self) -> PlanExecutor {
            PlanExecutor::new(
                self.gateway.clone(),
                self.tools.clone(),
                self.processes.clone(),
                self.files.clone(),
            )
            .with_params(EngineParams::default().with_scratch_dir("/scratch"))
        }
    }

    fn plan(steps: Vec<PlanStep>) -> ExecutionPlan {
        ExecutionPlan::new(TaskIntent::new(IntentType::MultiStepTask, "test"), steps)
    }

    fn write(id: &str, path: &str) -> PlanStep {
        PlanStep::new(
            id,
            format!("write {}", path),
            StepAction::FileOperation {
                operation: FileOperationKind::Write,
                path: path.to_string(),
                content: Some(format!("content of {}", path)),
            },
        )
    }

    fn open_app(id: &str) -> PlanStep {
        let mut params = Map::new();
        params.insert("name".to_string(), json!("Notes"));
        PlanStep::new(
            id,
            "open notes",
            StepAction::ToolCall {
                tool: "open_app".to_string(),
                params,
            },
        )
    }

    fn failure() -> ToolResult {
        ToolResult::failure("open_app", ToolError::execution_failed("window server busy"))
    }

    fn started(progress: &RecordingProgress) -> Vec<String> {
        progress
            .events()
            .into_iter()
            .filter_map(|e| {
                e.strip_prefix("step-start:")
                    .map(|s| s.split(':').next().unwrap_or("").to_string())
            })
            .collect()
    }

    #[tokio::test]
    async fn test_dependencies_execute_first() {
        let h = Harness::new();
        let progress = RecordingProgress::default();
        let plan = plan(vec![
            write("a", "a.txt"),
            write("b", "b.txt").with_dependency("a"),
            write("c", "c.txt").with_dependency("a"),
        ]);

        let result = h.executor().run(&plan, &progress).await;

        assert!(result.success);
        assert_eq!(result.steps_completed, 3);
        assert_eq!(started(&progress), vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_declaration_order_is_not_execution_order() {
        let h = Harness::new();
        let progress = RecordingProgress::default();
        let plan = plan(vec![
            write("late", "late.txt").with_dependency("early"),
            write("early", "early.txt"),
        ]);

        let result = h.executor().run(&plan, &progress).await;

        assert_eq!(started(&progress), vec!["early", "late"]);
        let paths: Vec<_> = result
            .artifacts
            .iter()
            .map(|a| a.path.clone().unwrap())
            .collect();
        assert_eq!(paths, vec!["early.txt", "late.txt"]);
    }

    #[tokio::test]
    async fn test_cycle_executes_nothing() {
        let h = Harness::new();
        let progress = RecordingProgress::default();
        let plan = plan(vec![
            open_app("a").with_dependency("c"),
            open_app("b").with_dependency("a"),
            open_app("c").with_dependency("b"),
        ]);

        let result = h.executor().run(&plan, &progress).await;

        assert!(!result.success);
        assert_eq!(result.steps_completed, 0);
        assert_eq!(result.total_steps, 3);
        assert!(result.error.unwrap().contains("Circular dependency"));
        assert_eq!(h.tools.call_count(), 0);
        assert_eq!(progress.events(), vec!["plan-start:3", "plan-error"]);
    }

    #[tokio::test]
    async fn test_missing_dependency_is_fatal() {
        let h = Harness::new();
        let plan = plan(vec![open_app("a").with_dependency("ghost")]);
        let result = h.executor().run(&plan, &NoPlanProgress).await;
        assert!(!result.success);
        assert_eq!(h.tools.call_count(), 0);
    }

    #[tokio::test]
    async fn test_retryable_step_runs_exactly_twice() {
        let mut h = Harness::new();
        h.tools = Arc::new(MockToolExecutor::new().script("open_app", vec![failure(), failure()]));
        let progress = RecordingProgress::default();
        let plan = plan(vec![open_app("a").retryable(true)]);

        let result = h.executor().run(&plan, &progress).await;

        assert!(!result.success);
        assert_eq!(h.tools.call_count(), 2);
        assert!(result.error.unwrap().contains("window server busy"));
        assert_eq!(
            progress.events(),
            vec![
                "plan-start:1",
                "step-start:a:0",
                "step-error:a",
                "step-retry:a",
                "step-error:a",
                "plan-error"
            ]
        );
    }

    #[tokio::test]
    async fn test_non_retryable_step_runs_once() {
        let mut h = Harness::new();
        h.tools = Arc::new(MockToolExecutor::new().script("open_app", vec![failure()]));
        let plan = plan(vec![open_app("a").retryable(false), write("b", "b.txt")]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert!(!result.success);
        assert_eq!(h.tools.call_count(), 1);
        assert_eq!(result.steps_completed, 0);
        assert!(!h.files.contains("b.txt"));
    }

    #[tokio::test]
    async fn test_retry_recovers() {
        let mut h = Harness::new();
        h.tools = Arc::new(MockToolExecutor::new().script(
            "open_app",
            vec![failure(), ToolResult::success("open_app", "{\"pid\": 42}")],
        ));
        let plan = plan(vec![open_app("a").retryable(true)]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert!(result.success);
        assert_eq!(h.tools.call_count(), 2);
        assert_eq!(result.output["finalResult"]["pid"], 42);
    }

    #[tokio::test]
    async fn test_failed_run_keeps_partial_artifacts() {
        let mut h = Harness::new();
        h.tools = Arc::new(MockToolExecutor::new().script("open_app", vec![failure()]));
        let plan = plan(vec![write("a", "a.txt"), open_app("b").with_dependency("a")]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert!(!result.success);
        assert_eq!(result.steps_completed, 1);
        assert_eq!(result.artifacts.len(), 1);
        assert!(h.files.contains("a.txt"));
    }

    #[tokio::test]
    async fn test_unknown_tool_and_action_fail() {
        let h = Harness::new();
        let unknown_tool = plan(vec![PlanStep::new(
            "a",
            "fly",
            StepAction::ToolCall {
                tool: "teleport".to_string(),
                params: Map::new(),
            },
        )]);
        let result = h.executor().run(&unknown_tool, &NoPlanProgress).await;
        assert!(result.error.unwrap().contains("Unknown tool 'teleport'"));

        let unknown_action = plan(vec![PlanStep::new(
            "a",
            "dance",
            StepAction::Unsupported {
                action_type: "dance".to_string(),
            },
        )
        .retryable(true)]);
        let result = h.executor().run(&unknown_action, &NoPlanProgress).await;
        assert!(result.error.unwrap().contains("Unknown action 'dance'"));

        let ask = plan(vec![PlanStep::new(
            "a",
            "ask",
            StepAction::UserInput {
                prompt: "Which file?".to_string(),
            },
        )]);
        let result = h.executor().run(&ask, &NoPlanProgress).await;
        assert!(result.error.unwrap().contains("user_input"));
    }

    #[tokio::test]
    async fn test_missing_required_parameter_fails_step() {
        let h = Harness::new();
        let plan = plan(vec![PlanStep::new(
            "a",
            "open",
            StepAction::ToolCall {
                tool: "open_app".to_string(),
                params: Map::new(),
            },
        )]);
        let result = h.executor().run(&plan, &NoPlanProgress).await;
        assert!(result.error.unwrap().contains("'name'"));
        assert_eq!(h.tools.call_count(), 0);
    }

    #[tokio::test]
    async fn test_code_gen_writes_and_runs() {
        let mut h = Harness::new();
        h.gateway = Arc::new(ScriptedGateway::texts(&[
            "```javascript\nconsole.log(6 * 7)\n```",
        ]));
        h.processes = Arc::new(MockProcessRunner::new(vec![MockProcessRunner::stdout("42\n")]));
        let plan = plan(vec![PlanStep::new(
            "calc",
            "compute",
            StepAction::CodeGen {
                language: "javascript".to_string(),
                prompt: "print 6*7".to_string(),
            },
        )]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert!(result.success);
        let runs = h.processes.runs.lock().unwrap().clone();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].0, "node");
        assert!(runs[0].1[0].starts_with("/scratch/step-calc-"));
        assert!(runs[0].1[0].ends_with(".js"));
        assert_eq!(
            h.files.read_to_string(Path::new(&runs[0].1[0])).unwrap(),
            "console.log(6 * 7)"
        );

        assert_eq!(result.output["finalResult"]["stdout"], "42\n");
        assert_eq!(result.artifacts.len(), 1);
        assert_eq!(result.artifacts[0].artifact_type, ArtifactType::Code);
    }

    #[tokio::test]
    async fn test_code_gen_relative_scratch_dir() {
        let mut h = Harness::new();
        h.gateway = Arc::new(ScriptedGateway::texts(&["echo hi"]));
        let plan = plan(vec![PlanStep::new(
            "s",
            "greet",
            StepAction::CodeGen {
                language: "sh".to_string(),
                prompt: "say hi".to_string(),
            },
        )]);
        let executor = PlanExecutor::new(
            h.gateway.clone(),
            h.tools.clone(),
            h.processes.clone(),
            h.files.clone(),
        )
        .with_params(EngineParams::default().with_scratch_dir("scratch"));

        let result = executor.run(&plan, &NoPlanProgress).await;

        assert!(result.success);
        let expected_dir = std::env::current_dir().unwrap().join("scratch");
        let runs = h.processes.runs.lock().unwrap().clone();
        let script = PathBuf::from(&runs[0].1[0]);
        assert!(script.is_absolute());
        assert_eq!(script.parent(), Some(expected_dir.as_path()));
        assert_eq!(runs[0].2, Some(expected_dir));
        // The script is written where the interpreter will look for it
        assert_eq!(h.files.read_to_string(&script).unwrap(), "echo hi");
    }

    #[tokio::test]
    async fn test_code_gen_timeout_fails_step() {
        let mut h = Harness::new();
        h.gateway = Arc::new(ScriptedGateway::texts(&["while true; do :; done"]));
        h.processes = Arc::new(MockProcessRunner::new(vec![Err(ProcessError::Timeout(
            Duration::from_secs(30),
        ))]));
        let plan = plan(vec![PlanStep::new(
            "spin",
            "spin",
            StepAction::CodeGen {
                language: "shell".to_string(),
                prompt: "loop".to_string(),
            },
        )]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;
        assert!(!result.success);
        assert!(result.error.unwrap().contains("timed out after 30s"));
    }

    #[tokio::test]
    async fn test_primitive_last_result_is_output() {
        let mut h = Harness::new();
        h.gateway = Arc::new(ScriptedGateway::texts(&["Three files changed."]));
        let plan = plan(vec![
            write("a", "a.txt"),
            PlanStep::new(
                "b",
                "summarize",
                StepAction::LlmQuery {
                    prompt: "Summarize".to_string(),
                    context: None,
                },
            )
            .with_dependency("a"),
        ]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert_eq!(result.output, json!("Three files changed."));
        // Dependency results are passed as context
        assert!(h.gateway.prompt(0).contains("a.txt"));
    }

    #[tokio::test]
    async fn test_file_operations() {
        let h = Harness::new();
        h.files.write(Path::new("docs/a.md"), "alpha").unwrap();
        let op = |id: &str, operation, path: &str| {
            PlanStep::new(
                id,
                id,
                StepAction::FileOperation {
                    operation,
                    path: path.to_string(),
                    content: None,
                },
            )
        };
        let plan = plan(vec![
            op("read", FileOperationKind::Read, "docs/a.md"),
            op("list", FileOperationKind::List, "docs").with_dependency("read"),
            op("delete", FileOperationKind::Delete, "docs/a.md").with_dependency("list"),
        ]);

        let result = h.executor().run(&plan, &NoPlanProgress).await;

        assert!(result.success);
        let steps = result.output["steps"].as_array().unwrap();
        assert_eq!(steps[0]["result"], "alpha");
        assert_eq!(steps[1]["result"]["entries"], json!(["a.md"]));
        assert_eq!(result.output["finalResult"]["deleted"], true);
        assert!(!h.files.contains("docs/a.md"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_wait_step() {
        let h = Harness::new();
        let plan = plan(vec![PlanStep::new(
            "pause",
            "pause",
            StepAction::Wait { duration_ms: 1500 },
        )]);
        let result = h.executor().run(&plan, &NoPlanProgress).await;
        assert!(result.success);
        assert_eq!(result.output["finalResult"]["waited_ms"], 1500);
    }

    #[tokio::test]
    async fn test_percent_complete() {
        let h = Harness::new();
        let progress = RecordingProgress::default();
        let plan = plan(vec![write("a", "a.txt"), write("b", "b.txt")]);
        h.executor().run(&plan, &progress).await;

        let events = progress.events();
        assert!(events.contains(&"step-start:a:0".to_string()));
        assert!(events.contains(&"step-start:b:50".to_string()));
        assert_eq!(events.last().unwrap(), "plan-complete:2");
    }
}
