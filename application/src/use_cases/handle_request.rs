//! Handle Request use case.
//!
//! One user turn, end to end:
//!
//! ```text
//! text ─▶ classify ─┬─ conversation ─▶ direct answer
//!                   └─ otherwise ────▶ build plan ─▶ run plan
//!                                          │
//!                        project_generation└─▶ generate ─▶ match ─▶ apply
//! ```
//!
//! Turns are serialized per use case instance; the recent-conversation
//! window it keeps is the only state carried between turns.

use crate::config::EngineParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::file_system::FileSystemPort;
use crate::ports::generation_progress::GenerationProgressNotifier;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::plan_progress::{NoPlanProgress, PlanProgressNotifier};
use crate::ports::process_runner::ProcessRunnerPort;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::user_input::UserInputPort;
use crate::use_cases::build_plan::BuildPlanUseCase;
use crate::use_cases::classify_intent::ClassifyIntentUseCase;
use crate::use_cases::execute_plan::PlanExecutor;
use crate::use_cases::generate_project::GenerateProjectUseCase;
use deskpilot_domain::util::truncate_str;
use deskpilot_domain::{
    Artifact, ArtifactType, DomainError, EnginePromptTemplate, ExecutionPlan, ExecutionResult,
    MatchResult, Message, ProjectAnalysis, ProjectRequest, TaskIntent, validate_match,
};
use serde::Serialize;
use serde_json::json;
use std::collections::VecDeque;
use std::path::{Component, Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{info, warn};

/// Longest remembered line of conversation.
const HISTORY_LINE_BYTES: usize = 300;

/// A generated project and what became of it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedProject {
    pub analysis: ProjectAnalysis,
    pub match_result: MatchResult,
    /// Whether a strict-name regeneration happened
    pub regenerated: bool,
    /// Directory the files were written to, if applied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub written_to: Option<PathBuf>,
}

/// Everything one turn produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub intent: TaskIntent,
    pub success: bool,
    /// Text to show the user
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<ExecutionPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<GeneratedProject>,
    pub duration_ms: u64,
}

impl TurnOutcome {
    fn new(intent: TaskIntent) -> Self {
        Self {
            intent,
            success: false,
            response: String::new(),
            plan: None,
            result: None,
            project: None,
            duration_ms: 0,
        }
    }

    fn failed(intent: TaskIntent, error: impl Into<String>) -> Self {
        let mut outcome = Self::new(intent);
        outcome.response = error.into();
        outcome
    }
}

pub struct HandleRequestUseCase {
    gateway: Arc<dyn LlmGateway>,
    files: Arc<dyn FileSystemPort>,
    classifier: ClassifyIntentUseCase,
    builder: BuildPlanUseCase,
    executor: PlanExecutor,
    generator: GenerateProjectUseCase,
    logger: Arc<dyn ConversationLogger>,
    plan_progress: Arc<dyn PlanProgressNotifier>,
    params: EngineParams,
    history: Mutex<VecDeque<String>>,
}

impl HandleRequestUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tools: Arc<dyn ToolExecutorPort>,
        processes: Arc<dyn ProcessRunnerPort>,
        files: Arc<dyn FileSystemPort>,
        params: EngineParams,
    ) -> Self {
        let options = params.chat_options.clone();
        Self {
            classifier: ClassifyIntentUseCase::new(gateway.clone())
                .with_tools(tools.clone())
                .with_options(options.clone()),
            builder: BuildPlanUseCase::new(gateway.clone())
                .with_tools(tools.clone())
                .with_options(options.clone()),
            executor: PlanExecutor::new(gateway.clone(), tools, processes, files.clone())
                .with_params(params.clone()),
            generator: GenerateProjectUseCase::new(gateway.clone())
                .with_options(options)
                .with_retry_delay(params.generation_retry_delay),
            gateway,
            files,
            logger: Arc::new(NoConversationLogger),
            plan_progress: Arc::new(NoPlanProgress),
            params,
            history: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_plan_progress(mut self, progress: Arc<dyn PlanProgressNotifier>) -> Self {
        self.plan_progress = progress;
        self
    }

    pub fn with_generation_progress(
        mut self,
        progress: Arc<dyn GenerationProgressNotifier>,
    ) -> Self {
        self.generator = self.generator.with_progress(progress);
        self
    }

    pub fn with_user_input(mut self, user_input: Arc<dyn UserInputPort>) -> Self {
        self.executor = self.executor.with_user_input(user_input);
        self
    }

    /// Handle one turn. Failures are reported in the outcome, never raised.
    pub async fn handle(&self, text: &str) -> TurnOutcome {
        let started = Instant::now();
        if text.trim().is_empty() {
            return TurnOutcome::failed(
                TaskIntent::fallback_conversation(text),
                DomainError::EmptyRequest.to_string(),
            );
        }
        self.log("user_request", json!({ "text": text }));

        let mut outcome = match self.params.turn_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.run_turn(text)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    let message = format!("Turn timed out after {}s", limit.as_secs_f64());
                    warn!("{}", message);
                    self.log("turn_timeout", json!({ "seconds": limit.as_secs_f64() }));
                    TurnOutcome::failed(TaskIntent::fallback_conversation(text), message)
                }
            },
            None => self.run_turn(text).await,
        };

        outcome.duration_ms = started.elapsed().as_millis() as u64;
        self.remember(text, &outcome.response);
        self.log(
            "turn_complete",
            json!({ "success": outcome.success, "durationMs": outcome.duration_ms }),
        );
        outcome
    }

    async fn run_turn(&self, text: &str) -> TurnOutcome {
        let context = self.recent_context();
        let intent = self.classifier.classify(text, &context).await;
        self.log(
            "intent_classified",
            serde_json::to_value(&intent).unwrap_or_default(),
        );

        if intent.is_conversation() {
            return self.answer(intent, text, &context).await;
        }

        let mut outcome = TurnOutcome::new(intent.clone());
        match self.builder.build(&intent, text, &context).await {
            Ok(plan) => {
                self.log("plan_built", serde_json::to_value(&plan).unwrap_or_default());
                let result = self.executor.run(&plan, self.plan_progress.as_ref()).await;
                self.log(
                    "plan_result",
                    serde_json::to_value(&result).unwrap_or_default(),
                );
                outcome.success = result.success;
                outcome.response = match &result.error {
                    Some(error) => error.clone(),
                    None => result.output_text(),
                };
                outcome.plan = Some(plan);
                outcome.result = Some(result);
            }
            Err(e) => {
                warn!("Plan generation failed: {}", e);
                self.log("plan_failed", json!({ "error": e.to_string() }));
                outcome.response = e.to_string();
            }
        }

        if intent.is_project_generation() {
            self.generate_project(&mut outcome, text).await;
        }
        outcome
    }

    async fn answer(&self, intent: TaskIntent, text: &str, context: &[String]) -> TurnOutcome {
        let mut messages = vec![Message::system(EnginePromptTemplate::conversation_system())];
        for line in context {
            match line.split_once(": ") {
                Some(("assistant", content)) => messages.push(Message::assistant(content)),
                Some((_, content)) => messages.push(Message::user(content)),
                None => messages.push(Message::user(line.as_str())),
            }
        }
        messages.push(Message::user(text));

        match self.gateway.chat(&messages, &self.params.chat_options).await {
            Ok(response) => {
                let mut outcome = TurnOutcome::new(intent);
                outcome.success = true;
                outcome.response = response.text_content();
                self.log("assistant_reply", json!({ "text": outcome.response }));
                outcome
            }
            Err(e) => {
                warn!("Conversation reply failed: {}", e);
                TurnOutcome::failed(intent, e.to_string())
            }
        }
    }

    // ==================== Project generation ====================

    /// The pipeline runs even when the preparatory plan failed; it never fails.
    /// Any plan error stays at the head of the response.
    async fn generate_project(&self, outcome: &mut TurnOutcome, text: &str) {
        let max_attempts = self.params.generation_max_attempts;
        let request = ProjectRequest::new(text);
        let mut analysis = self.generator.generate_with_retry(&request, max_attempts).await;
        let mut match_result = validate_match(text, &analysis.name, &analysis.description);
        let mut regenerated = false;

        if !match_result.matches {
            warn!(
                "Project '{}' does not match the request ({}), regenerating",
                analysis.name, match_result.reason
            );
            regenerated = true;
            let strict = self
                .generator
                .generate_with_retry(&request.clone().strict(), max_attempts)
                .await;
            let strict_match = validate_match(text, &strict.name, &strict.description);
            if strict_match.confidence >= match_result.confidence {
                analysis = strict;
                match_result = strict_match;
            }
        }

        self.log(
            "project_generated",
            json!({
                "name": analysis.name,
                "files": analysis.files.len(),
                "matches": match_result.matches,
                "confidence": match_result.confidence,
                "regenerated": regenerated,
            }),
        );

        let written_to = match &self.params.project_root {
            Some(root) => self.apply_project(root, &analysis, outcome),
            None => None,
        };

        // A plan that could not be built is covered by the pipeline; a plan
        // that ran and failed still fails the turn.
        let plan_error = (!outcome.success).then(|| outcome.response.clone());
        outcome.success = outcome.result.as_ref().is_none_or(|r| r.success);
        let summary = match &written_to {
            Some(dir) => format!(
                "Generated project '{}' ({} files) in {}",
                analysis.name,
                analysis.files.len(),
                dir.display()
            ),
            None => format!(
                "Generated project '{}' ({} files)",
                analysis.name,
                analysis.files.len()
            ),
        };
        outcome.response = match plan_error {
            Some(error) if !error.is_empty() => format!("{}\n{}", error, summary),
            _ => summary,
        };
        outcome.project = Some(GeneratedProject {
            analysis,
            match_result,
            regenerated,
            written_to,
        });
    }

    /// Write the project's files beneath `root/<name>`.
    ///
    /// Paths escaping the project directory are skipped.
    fn apply_project(
        &self,
        root: &Path,
        project: &ProjectAnalysis,
        outcome: &mut TurnOutcome,
    ) -> Option<PathBuf> {
        let dir = root.join(directory_name(&project.name));
        let mut written = 0usize;

        for file in &project.files {
            let relative = Path::new(&file.path);
            if !is_contained(relative) {
                warn!("Skipping project file outside the project: {}", file.path);
                continue;
            }
            match self.files.write(&dir.join(relative), &file.content) {
                Ok(()) => written += 1,
                Err(e) => warn!("Failed to write {}: {}", file.path, e),
            }
        }

        if written == 0 {
            return None;
        }
        info!("Wrote {} files to {}", written, dir.display());
        self.log(
            "project_written",
            json!({ "path": dir.display().to_string(), "files": written }),
        );

        let artifact = Artifact::new(ArtifactType::Project)
            .with_path(dir.display().to_string())
            .with_metadata("files", written)
            .with_metadata("name", project.name.as_str());
        if let Some(result) = outcome.result.as_mut() {
            result.artifacts.push(artifact);
        }
        Some(dir)
    }

    // ==================== Conversation window ====================

    fn recent_context(&self) -> Vec<String> {
        match self.history.lock() {
            Ok(history) => history.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn remember(&self, text: &str, response: &str) {
        let Ok(mut history) = self.history.lock() else {
            return;
        };
        history.push_back(format!("user: {}", truncate_str(text, HISTORY_LINE_BYTES)));
        history.push_back(format!(
            "assistant: {}",
            truncate_str(response, HISTORY_LINE_BYTES)
        ));
        while history.len() > self.params.context_window {
            history.pop_front();
        }
    }

    fn log(&self, event_type: &'static str, payload: serde_json::Value) {
        self.logger.log(ConversationEvent::new(event_type, payload));
    }
}

fn directory_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('-');
    if cleaned.is_empty() {
        "project".to_string()
    } else {
        cleaned.to_string()
    }
}

fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::{ChatOptions, GatewayError};
    use crate::use_cases::test_support::{
        MemoryFileSystem, MockProcessRunner, MockToolExecutor, RecordingLogger, ScriptedGateway,
    };
    use async_trait::async_trait;
    use deskpilot_domain::{IntentType, LlmResponse, ProjectFile};
    use std::time::Duration;

    struct Harness {
        gateway: Arc<ScriptedGateway>,
        files: Arc<MemoryFileSystem>,
        logger: Arc<RecordingLogger>,
    }

    impl Harness {
        fn new(replies: &[&str]) -> Self {
            Self {
                gateway: Arc::new(ScriptedGateway::texts(replies)),
                files: Arc::new(MemoryFileSystem::default()),
                logger: Arc::new(RecordingLogger::default()),
            }
        }

        fn use_case(&self, params: EngineParams) -> HandleRequestUseCase {
            HandleRequestUseCase::new(
                self.gateway.clone(),
                Arc::new(MockToolExecutor::new()),
                Arc::new(MockProcessRunner::new(vec![])),
                self.files.clone(),
                params.with_retry_delay(Duration::ZERO),
            )
            .with_logger(self.logger.clone())
        }
    }

    const BODY: &str =
        "module.exports = function handler(req, res) { res.json({ ok: true, items: [] }); };\n";

    fn project_json(name: &str, description: &str) -> String {
        let mut project = ProjectAnalysis::new(name, "node")
            .with_description(description)
            .with_dependency("express", "^4.18.2")
            .with_file(ProjectFile::new("package.json", format!("{{}}\n{}", BODY), "manifest"))
            .with_file(ProjectFile::new("src/index.js", BODY, "entry"))
            .with_file(ProjectFile::new("README.md", format!("# App\n{}", BODY), "docs"));
        for i in 0..7 {
            project =
                project.with_file(ProjectFile::new(format!("src/r{}.js", i), BODY, "route"));
        }
        project.folder_structure = vec!["src".into(), "public".into(), "tests".into()];
        serde_json::to_string(&project).unwrap()
    }

    const ONE_STEP_PLAN: &str = r#"{"steps": [{"id": "1", "description": "scaffold", "action": {"type": "wait", "duration_ms": 0}}]}"#;

    #[tokio::test]
    async fn test_conversation_is_answered_directly() {
        let h = Harness::new(&["Hello! How can I help?"]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("hi").await;

        assert!(outcome.success);
        assert!(outcome.intent.is_conversation());
        assert_eq!(outcome.response, "Hello! How can I help?");
        assert!(outcome.plan.is_none());
        assert_eq!(h.gateway.call_count(), 1);
        assert_eq!(
            h.logger.types(),
            vec!["user_request", "intent_classified", "assistant_reply", "turn_complete"]
        );
    }

    #[tokio::test]
    async fn test_history_feeds_next_turn() {
        let h = Harness::new(&["Hello!", "{\"type\": \"conversation\"}", "Sure."]);
        let uc = h.use_case(EngineParams::default());

        uc.handle("hi").await;
        uc.handle("what did I just say?").await;

        // Classification prompt of the second turn carries the first exchange
        assert!(h.gateway.prompt(1).contains("- user: hi"));
        assert!(h.gateway.prompt(1).contains("- assistant: Hello!"));
    }

    #[tokio::test]
    async fn test_task_builds_and_runs_plan() {
        let h = Harness::new(&[
            "{\"type\": \"multi_step_task\", \"complexity\": \"moderate\"}",
            r#"{"steps": [{"id": "1", "description": "answer", "action": {"type": "llm_query", "prompt": "Say done"}}]}"#,
            "done",
        ]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("check the disk and tell me").await;

        assert!(outcome.success);
        assert_eq!(outcome.response, "done");
        assert_eq!(outcome.plan.unwrap().len(), 1);
        assert!(h.logger.types().contains(&"plan_result"));
    }

    #[tokio::test]
    async fn test_plan_failure_is_reported() {
        let h = Harness::new(&["{\"type\": \"multi_step_task\"}", "no plan today"]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("reorganize my desktop").await;

        assert!(!outcome.success);
        assert!(outcome.response.contains("Could not parse a plan"));
        assert!(h.logger.types().contains(&"plan_failed"));
    }

    #[tokio::test]
    async fn test_project_generation_applies_files() {
        let project = project_json("recipe-tracker", "Tracks recipes");
        let h = Harness::new(&[ONE_STEP_PLAN, project.as_str()]);
        let params = EngineParams::default().with_project_root(Some(PathBuf::from("/out")));
        let uc = h.use_case(params);

        let outcome = uc.handle("build me a recipe tracker app").await;

        assert!(outcome.success);
        assert_eq!(outcome.intent.intent_type, IntentType::ProjectGeneration);
        let generated = outcome.project.unwrap();
        assert!(generated.match_result.matches);
        assert!(!generated.regenerated);
        assert_eq!(generated.written_to, Some(PathBuf::from("/out/recipe-tracker")));
        assert!(h.files.contains("/out/recipe-tracker/src/index.js"));
        assert!(h.files.contains("/out/recipe-tracker/.gitignore"));

        let artifacts = &outcome.result.unwrap().artifacts;
        assert_eq!(artifacts.last().unwrap().artifact_type, ArtifactType::Project);
    }

    #[tokio::test]
    async fn test_mismatch_regenerates_strictly() {
        let wrong = project_json("weather-dashboard", "Shows weather");
        let right = project_json("chess-engine", "Plays chess");
        let h = Harness::new(&[ONE_STEP_PLAN, wrong.as_str(), right.as_str()]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("build a chess engine app").await;

        let generated = outcome.project.unwrap();
        assert!(generated.regenerated);
        assert_eq!(generated.analysis.name, "chess-engine");
        assert!(h.gateway.prompt(2).contains("MUST use the key words"));
    }

    #[tokio::test]
    async fn test_project_survives_unbuildable_plan() {
        let project = project_json("recipe-tracker", "Tracks recipes");
        let h = Harness::new(&["nonsense", project.as_str()]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("build me a recipe tracker app").await;

        assert!(outcome.success);
        assert!(outcome.plan.is_none());
        assert!(outcome.response.starts_with("Could not parse a plan"));
        assert!(outcome.response.ends_with("Generated project 'recipe-tracker' (12 files)"));
        assert_eq!(outcome.project.unwrap().analysis.name, "recipe-tracker");
    }

    #[tokio::test]
    async fn test_failed_plan_run_fails_project_turn() {
        let project = project_json("recipe-tracker", "Tracks recipes");
        let bad_plan = r#"{"steps": [{"id": "1", "description": "warp", "action": {"type": "tool_call", "tool": "teleport"}, "retryable": false}]}"#;
        let h = Harness::new(&[bad_plan, project.as_str()]);
        let uc = h.use_case(EngineParams::default());

        let outcome = uc.handle("build me a recipe tracker app").await;

        let result = outcome.result.as_ref().unwrap();
        assert!(!result.success);
        assert!(!outcome.success);
        assert!(outcome.response.contains("Unknown tool 'teleport'"));
        assert!(outcome.response.contains("Generated project 'recipe-tracker'"));
        assert!(outcome.project.is_some());
    }

    #[tokio::test]
    async fn test_empty_request() {
        let h = Harness::new(&[]);
        let outcome = h.use_case(EngineParams::default()).handle("   ").await;
        assert!(!outcome.success);
        assert_eq!(outcome.response, "Request is empty");
        assert_eq!(h.gateway.call_count(), 0);
    }

    struct SlowGateway;

    #[async_trait]
    impl LlmGateway for SlowGateway {
        async fn chat(
            &self,
            _messages: &[Message],
            _options: &ChatOptions,
        ) -> Result<LlmResponse, GatewayError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(LlmResponse::from_text("too late"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_timeout_reports_failure() {
        let logger = Arc::new(RecordingLogger::default());
        let uc = HandleRequestUseCase::new(
            Arc::new(SlowGateway),
            Arc::new(MockToolExecutor::new()),
            Arc::new(MockProcessRunner::new(vec![])),
            Arc::new(MemoryFileSystem::default()),
            EngineParams::default().with_turn_timeout(Some(Duration::from_secs(5))),
        )
        .with_logger(logger.clone());

        let outcome = uc.handle("hello").await;

        assert!(!outcome.success);
        assert!(outcome.response.contains("timed out"));
        assert!(logger.types().contains(&"turn_timeout"));
    }

    #[test]
    fn test_path_containment() {
        assert!(is_contained(Path::new("src/index.js")));
        assert!(is_contained(Path::new("./README.md")));
        assert!(!is_contained(Path::new("../escape.js")));
        assert!(!is_contained(Path::new("/etc/passwd")));
        assert_eq!(directory_name("My App!"), "My-App");
        assert_eq!(directory_name("!!!"), "project");
    }
}
