//! Classify Intent use case.
//!
//! Maps raw user text to a [`TaskIntent`]. The fast-path rule table is
//! consulted first; only when no rule matches is the provider asked. This
//! operation never fails: any provider or parse problem degrades to a
//! low-confidence conversation intent.

use crate::ports::llm_gateway::{ChatOptions, LlmGateway};
use crate::ports::tool_executor::ToolExecutorPort;
use deskpilot_domain::{
    Complexity, EnginePromptTemplate, IntentType, Message, TaskIntent, match_fast_path,
    parse_structured_response,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Confidence assumed when the provider omits one.
const DEFAULT_PROVIDER_CONFIDENCE: f64 = 0.7;

/// Loosely-typed classification reply; every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ClassificationReply {
    #[serde(rename = "type", alias = "intent")]
    intent_type: Option<String>,
    description: Option<String>,
    complexity: Option<String>,
    estimated_steps: Option<u32>,
    required_tools: Vec<String>,
    requires_approval: Option<bool>,
    confidence: Option<f64>,
}

pub struct ClassifyIntentUseCase {
    gateway: Arc<dyn LlmGateway>,
    tools: Option<Arc<dyn ToolExecutorPort>>,
    options: ChatOptions,
}

impl ClassifyIntentUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>) -> Self {
        Self {
            gateway,
            tools: None,
            options: ChatOptions::default(),
        }
    }

    /// Use the registry to flag intents whose tools need approval.
    pub fn with_tools(mut self, tools: Arc<dyn ToolExecutorPort>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn classify(&self, text: &str, recent_context: &[String]) -> TaskIntent {
        if let Some((rule, intent)) = match_fast_path(text) {
            debug!("Fast-path rule '{}' matched", rule);
            return intent;
        }

        let messages = [
            Message::system(EnginePromptTemplate::classification_system()),
            Message::user(EnginePromptTemplate::classification_user(text, recent_context)),
        ];
        let options = self.options.clone().json();

        let response = match self.gateway.chat(&messages, &options).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Classification request failed, treating as conversation: {}", e);
                return TaskIntent::fallback_conversation(text);
            }
        };

        let reply: ClassificationReply =
            match parse_structured_response(&response.text_content()) {
                Ok(reply) => reply,
                Err(e) => {
                    warn!("Unparseable classification, treating as conversation: {}", e);
                    return TaskIntent::fallback_conversation(text);
                }
            };

        match self.intent_from_reply(reply, text) {
            Some(intent) => {
                info!(
                    "Classified as {} ({}, confidence {:.2})",
                    intent.intent_type, intent.complexity, intent.confidence
                );
                intent
            }
            None => TaskIntent::fallback_conversation(text),
        }
    }

    fn intent_from_reply(&self, reply: ClassificationReply, text: &str) -> Option<TaskIntent> {
        let intent_type: IntentType = match reply.intent_type.as_deref()?.parse() {
            Ok(t) => t,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        let description = reply
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| text.trim().to_string());
        let complexity = reply
            .complexity
            .and_then(|c| c.parse::<Complexity>().ok())
            .unwrap_or_default();

        let mut intent = TaskIntent::new(intent_type, description)
            .with_complexity(complexity)
            .with_estimated_steps(reply.estimated_steps.unwrap_or(1))
            .with_confidence(reply.confidence.unwrap_or(DEFAULT_PROVIDER_CONFIDENCE));
        for tool in reply.required_tools {
            let tool = tool.trim();
            if !tool.is_empty() {
                intent = intent.with_tool(tool);
            }
        }

        let risky = self.tools.as_ref().is_some_and(|tools| {
            intent
                .required_tools
                .iter()
                .filter_map(|name| tools.get_tool(name))
                .any(|def| def.is_high_risk())
        });
        let approval = reply.requires_approval.unwrap_or(false) || risky;
        Some(intent.with_approval(approval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::use_cases::test_support::{MockToolExecutor, ScriptedGateway};

    fn use_case(gateway: &Arc<ScriptedGateway>) -> ClassifyIntentUseCase {
        ClassifyIntentUseCase::new(gateway.clone())
    }

    #[tokio::test]
    async fn test_fast_path_skips_provider() {
        let gateway = Arc::new(ScriptedGateway::texts(&[]));
        let intent = use_case(&gateway)
            .classify("build me a recipe tracker app", &[])
            .await;
        assert_eq!(intent.intent_type, IntentType::ProjectGeneration);
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test]
    async fn test_provider_classification_in_fence() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "Sure:\n```json\n{\"type\": \"simple_tool_call\", \"description\": \"open notes\", \
             \"complexity\": \"trivial\", \"estimatedSteps\": 1, \"requiredTools\": [\"open_app\"], \
             \"confidence\": 0.9}\n```",
        ]));
        let intent = use_case(&gateway).classify("open my notes", &[]).await;

        assert_eq!(intent.intent_type, IntentType::SimpleToolCall);
        assert_eq!(intent.complexity, Complexity::Trivial);
        assert_eq!(intent.primary_tool(), Some("open_app"));
        assert_eq!(intent.confidence, 0.9);
        assert!(!intent.requires_approval);
        assert_eq!(gateway.call_count(), 1);
    }

    #[tokio::test]
    async fn test_context_reaches_prompt() {
        let gateway = Arc::new(ScriptedGateway::texts(&["{\"type\": \"conversation\"}"]));
        use_case(&gateway)
            .classify("and the other one?", &["user: open notes".to_string()])
            .await;
        assert!(gateway.prompt(0).contains("- user: open notes"));
    }

    #[tokio::test]
    async fn test_gateway_error_degrades_to_conversation() {
        let gateway = Arc::new(ScriptedGateway::new(vec![Err(GatewayError::Timeout)]));
        let intent = use_case(&gateway).classify("rename my files", &[]).await;
        assert!(intent.is_conversation());
        assert!(intent.confidence < 0.5);
    }

    #[tokio::test]
    async fn test_garbage_and_unknown_type_degrade() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "I think this is a task.",
            "{\"type\": \"interpretive_dance\"}",
        ]));
        let uc = use_case(&gateway);
        assert!(uc.classify("rename my files", &[]).await.is_conversation());
        assert!(uc.classify("rename my files", &[]).await.is_conversation());
    }

    #[tokio::test]
    async fn test_high_risk_tool_requires_approval() {
        let gateway = Arc::new(ScriptedGateway::texts(&[
            "{\"type\": \"simple_tool_call\", \"requiredTools\": [\"delete_file\"]}",
        ]));
        let intent = use_case(&gateway)
            .with_tools(Arc::new(MockToolExecutor::new()))
            .classify("delete old.txt", &[])
            .await;
        assert!(intent.requires_approval);
        assert_eq!(intent.description, "delete old.txt");
        assert_eq!(intent.confidence, DEFAULT_PROVIDER_CONFIDENCE);
    }
}
