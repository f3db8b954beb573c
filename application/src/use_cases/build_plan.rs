//! Build Plan use case.
//!
//! Turns a [`TaskIntent`] into an [`ExecutionPlan`].
//!
//! - **Simple path** (`simple_tool_call`): one step, no dependencies. Tool
//!   parameters come from a best-effort extraction call that yields `{}` on
//!   any failure.
//! - **Complex path**: the provider synthesizes the whole step graph. The
//!   builder only wraps it in a plan envelope; graph shape (cycles, missing
//!   dependencies) is checked by the executor when the plan runs.

use crate::ports::llm_gateway::{ChatOptions, FunctionSpec, GatewayError, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use deskpilot_domain::{
    CREATE_PLAN_TOOL, EnginePromptTemplate, ExecutionPlan, IntentType, LlmResponse, Message,
    ParsedPlan, PlanStep, StepAction, TaskIntent, ToolDefinition, ToolSpec, parse_plan_value,
    parse_structured_response,
};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Plan generation failed. Not retried at this layer.
#[derive(Error, Debug)]
pub enum PlanGenerationError {
    #[error("Plan request failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Could not parse a plan from the response: {0}")]
    Unparseable(String),

    #[error("Generated plan has no steps")]
    NoSteps,
}

pub struct BuildPlanUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Option<Arc<dyn ToolExecutorPort>>,
    options: ChatOptions,
}

impl BuildPlanUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            tools: None,
            options: ChatOptions::default(),
        }
    }

    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutorPort>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn build(
        &self,
        intent: &TaskIntent,
        text: &str,
        context: &[String],
    ) -> Result<ExecutionPlan, PlanGenerationError> {
        if intent.intent_type == IntentType::SimpleToolCall {
            return Ok(self.build_simple(intent, text).await);
        }
        self.build_complex(intent, text, context).await
    }

    // ==================== Simple path ====================

    async fn build_simple(&self, intent: &TaskIntent, text: &str) -> ExecutionPlan {
        let step = match intent.primary_tool() {
            Some(tool) => {
                let definition = self.tools.as_ref().and_then(|t| t.get_tool(tool));
                let params = match definition {
                    Some(def) => self.extract_parameters(def, text).await,
                    None => Map::new(),
                };
                let retryable = !definition.is_some_and(ToolDefinition::is_high_risk);
                PlanStep::new(
                    "1",
                    intent.description.clone(),
                    StepAction::ToolCall {
                        tool: tool.to_string(),
                        params,
                    },
                )
                .retryable(retryable)
            }
            None => PlanStep::new(
                "1",
                intent.description.clone(),
                StepAction::LlmQuery {
                    prompt: text.to_string(),
                    context: None,
                },
            )
            .retryable(true),
        };

        debug!("Built single-step plan ({})", step.action.kind());
        ExecutionPlan::new(intent.clone(), vec![step])
    }

    /// Best-effort: any failure yields an empty map.
    async fn extract_parameters(&self, tool: &ToolDefinition, text: &str) -> Map<String, Value> {
        let messages = [Message::user(EnginePromptTemplate::parameter_extraction(
            tool, text,
        ))];
        let options = self.options.clone().json();

        let response = match self.gateway.chat(&messages, &options).await {
            Ok(r) => r,
            Err(e) => {
                warn!("Parameter extraction for '{}' failed: {}", tool.name, e);
                return Map::new();
            }
        };

        match parse_structured_response::<Map<String, Value>>(&response.text_content()) {
            Ok(params) => params,
            Err(e) => {
                warn!("Unparseable parameters for '{}': {}", tool.name, e);
                Map::new()
            }
        }
    }

    // ==================== Complex path ====================

    async fn build_complex(
        &self,
        intent: &TaskIntent,
        text: &str,
        context: &[String],
    ) -> Result<ExecutionPlan, PlanGenerationError> {
        let empty = ToolSpec::new();
        let spec = self.tools.as_ref().map_or(&empty, |t| t.tool_spec());

        let messages = [
            Message::system(EnginePromptTemplate::plan_system(spec)),
            Message::user(EnginePromptTemplate::plan_user(intent, text, context)),
        ];
        let options = self.options.clone().with_function(FunctionSpec::new(
            CREATE_PLAN_TOOL,
            "Submit the execution plan",
            EnginePromptTemplate::create_plan_schema(),
        ));

        let response = self.gateway.chat(&messages, &options).await?;
        if response.is_truncated() {
            warn!("Plan response was truncated; parsing what arrived");
        }

        let parsed = parse_plan_response(&response)?;
        let mut plan = ExecutionPlan::new(intent.clone(), parsed.steps);
        if let Some(ms) = parsed.estimated_duration_ms {
            plan = plan.with_estimated_duration(ms);
        }
        if let Some(tokens) = parsed.estimated_tokens {
            plan = plan.with_estimated_tokens(tokens);
        }

        info!("Built plan {} with {} steps", plan.id, plan.len());
        Ok(plan)
    }
}

/// Prefer a `create_plan` tool-use block, then the text content.
fn parse_plan_response(response: &LlmResponse) -> Result<ParsedPlan, PlanGenerationError> {
    if let Some(input) = response.tool_use(CREATE_PLAN_TOOL) {
        if let Some(parsed) = parse_plan_value(&Value::Object(input.clone())) {
            return Ok(parsed);
        }
        debug!("create_plan call carried no usable steps, trying text");
    }

    let text = response.text_content();
    let value: Value = parse_structured_response(&text)
        .map_err(|e| PlanGenerationError::Unparseable(e.to_string()))?;
    parse_plan_value(&value).ok_or(PlanGenerationError::NoSteps)
}
