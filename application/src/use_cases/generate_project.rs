//! Generate Project use case.
//!
//! Wraps an unreliable generator so callers always receive a structurally
//! valid [`ProjectAnalysis`]:
//!
//! 1. Ask the provider for a candidate; validate it against the
//!    completeness rules.
//! 2. On violation, wait the fixed retry delay and try again. The next
//!    prompt lists every violated rule.
//! 3. On success, run the enhancement pass and validate once more.
//! 4. When every attempt failed, synthesize the deterministic fallback.

use crate::ports::generation_progress::{GenerationProgressNotifier, NoGenerationProgress};
use crate::ports::llm_gateway::{ChatOptions, GatewayError, LlmGateway};
use deskpilot_domain::{
    EnginePromptTemplate, Message, ParseError, ProjectAnalysis, ProjectRequest,
    ProjectValidationError, enhance_project, fallback_project, parse_structured_response,
    validate_project,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why one attempt was discarded. Never leaves this module.
#[derive(Error, Debug)]
enum AttemptError {
    #[error("Generator request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Generator reply was not a project: {0}")]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Invalid(#[from] ProjectValidationError),
}

impl AttemptError {
    /// Human-readable rule violations to report and feed back.
    fn violations(&self) -> Vec<String> {
        match self {
            AttemptError::Invalid(e) => e.violations.clone(),
            other => vec![other.to_string()],
        }
    }
}

pub struct GenerateProjectUseCase {
    gateway: Arc<dyn LlmGateway>,
    progress: Arc<dyn GenerationProgressNotifier>,
    options: ChatOptions,
    retry_delay: Duration,
}

impl GenerateProjectUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            progress: Arc::new(NoGenerationProgress),
            options: ChatOptions::default(),
            retry_delay: Duration::from_secs(2),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn GenerationProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Never fails; the worst case is the fallback project.
    pub async fn generate_with_retry(
        &self,
        request: &ProjectRequest,
        max_attempts: usize,
    ) -> ProjectAnalysis {
        let mut feedback: Vec<String> = Vec::new();

        for attempt in 1..=max_attempts {
            self.progress.on_attempt_start(attempt, max_attempts);
            info!("Project generation attempt {}/{}", attempt, max_attempts);

            match self.attempt(request, &feedback).await {
                Ok(project) => {
                    info!(
                        "Accepted project '{}' with {} files",
                        project.name,
                        project.files.len()
                    );
                    return project;
                }
                Err(e) => {
                    let violations = e.violations();
                    warn!("Attempt {} rejected: {}", attempt, e);
                    self.progress.on_attempt_failed(attempt, &violations);
                    if !matches!(e, AttemptError::Gateway(_)) {
                        feedback = violations;
                    }
                }
            }

            if attempt < max_attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        let project = fallback_project(request);
        warn!(
            "All {} attempts failed, using fallback project '{}'",
            max_attempts, project.name
        );
        self.progress.on_fallback(&project);
        project
    }

    async fn attempt(
        &self,
        request: &ProjectRequest,
        previous_violations: &[String],
    ) -> Result<ProjectAnalysis, AttemptError> {
        let messages = [
            Message::system(EnginePromptTemplate::project_system()),
            Message::user(EnginePromptTemplate::project_user(
                request,
                previous_violations,
            )),
        ];
        let options = self.options.clone().json();

        let response = self.gateway.chat(&messages, &options).await?;
        let mut project: ProjectAnalysis = parse_structured_response(&response.text_content())?;
        validate_project(&project)?;

        let added = enhance_project(&mut project);
        if !added.is_empty() {
            debug!("Enhancement added {}", added.join(", "));
        }
        self.progress.on_enhanced(&project, &added);

        validate_project(&project)?;
        Ok(project)
    }
}
