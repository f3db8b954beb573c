//! Prompt templates for the plan execution engine

use crate::intent::{IntentType, TaskIntent};
use crate::project::ProjectRequest;
use crate::project::validation::{MIN_FILES, MIN_FOLDER_ENTRIES};
use crate::tool::{ToolDefinition, ToolSpec};
use serde_json::{Value, json};

/// Name of the function a provider calls to hand back a plan
pub const CREATE_PLAN_TOOL: &str = "create_plan";

/// Templates for every provider call the engine makes
pub struct EnginePromptTemplate;

impl EnginePromptTemplate {
    /// System prompt for direct conversational answers
    pub fn conversation_system() -> &'static str {
        "You are a helpful desktop assistant. Answer briefly and directly. \
         If the user asks for something you would need tools for, say what you would do."
    }

    /// System prompt for intent classification
    pub fn classification_system() -> String {
        let types = IntentType::all()
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            r#"You classify a desktop assistant request. Reply with one JSON object and nothing else:

{{
  "type": one of [{types}],
  "description": "short restatement of the task",
  "complexity": one of ["trivial", "simple", "moderate", "complex"],
  "estimatedSteps": integer,
  "requiredTools": ["tool names"],
  "requiresApproval": true if the task changes files or runs programs,
  "confidence": number between 0 and 1
}}"#
        )
    }

    /// User prompt for intent classification
    pub fn classification_user(text: &str, recent_context: &[String]) -> String {
        if recent_context.is_empty() {
            return format!("Request: {}", text);
        }
        let context = recent_context
            .iter()
            .map(|line| format!("- {}", line))
            .collect::<Vec<_>>()
            .join("\n");
        format!("Recent conversation:\n{}\n\nRequest: {}", context, text)
    }

    /// Extract tool parameters from free text
    pub fn parameter_extraction(tool: &ToolDefinition, text: &str) -> String {
        let params = tool
            .parameters
            .iter()
            .map(|p| {
                format!(
                    "- {} ({}{}): {}",
                    p.name,
                    p.param_type,
                    if p.required { ", required" } else { "" },
                    p.description
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!(
            "Extract the parameters for the tool `{}` from the request below.\n\
             Parameters:\n{}\n\n\
             Reply with a single JSON object mapping parameter names to values. \
             Use {{}} if nothing applies.\n\nRequest: {}",
            tool.name, params, text
        )
    }

    /// System prompt for plan generation
    pub fn plan_system(tools: &ToolSpec) -> String {
        let tool_list = if tools.is_empty() {
            "(no tools registered)".to_string()
        } else {
            tools
                .all()
                .map(|t| format!("- {}", t.signature()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        format!(
            r#"You break a request into executable steps. Available tools:
{tool_list}

Each step has an id, a description, an action, the ids of steps it depends on, and whether it may be retried once.
Action types:
- {{"type": "tool_call", "tool": "<name>", "params": {{...}}}}
- {{"type": "code_gen", "language": "javascript|python|shell", "prompt": "..."}}
- {{"type": "llm_query", "prompt": "...", "context": optional}}
- {{"type": "file_operation", "operation": "read|write|delete|list", "path": "...", "content": optional}}
- {{"type": "wait", "duration_ms": number}}
- {{"type": "user_input", "prompt": "..."}}

Call the `{CREATE_PLAN_TOOL}` function, or reply with JSON in a ```plan block:
{{"steps": [{{"id": "1", "description": "...", "action": {{...}}, "dependencies": [], "retryable": true}}], "estimatedDuration": ms, "estimatedTokens": n}}

The last step should produce the answer the user wants to see."#
        )
    }

    /// User prompt for plan generation
    pub fn plan_user(intent: &TaskIntent, text: &str, context: &[String]) -> String {
        let mut prompt = format!(
            "Request: {}\nIntent: {} ({}, about {} steps)",
            text, intent.intent_type, intent.complexity, intent.estimated_steps
        );
        if !intent.required_tools.is_empty() {
            let tools: Vec<&str> = intent.required_tools.iter().map(String::as_str).collect();
            prompt.push_str(&format!("\nLikely tools: {}", tools.join(", ")));
        }
        if !context.is_empty() {
            prompt.push_str("\n\nContext:\n");
            prompt.push_str(&context.join("\n"));
        }
        prompt
    }

    /// JSON schema of the `create_plan` function
    pub fn create_plan_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "steps": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string"},
                            "description": {"type": "string"},
                            "action": {"type": "object"},
                            "dependencies": {"type": "array", "items": {"type": "string"}},
                            "retryable": {"type": "boolean"}
                        },
                        "required": ["id", "description", "action"]
                    }
                },
                "estimatedDuration": {"type": "integer"},
                "estimatedTokens": {"type": "integer"}
            },
            "required": ["steps"]
        })
    }

    /// Prompt for a `code_gen` step
    pub fn code_generation(language: &str, prompt: &str) -> String {
        format!(
            "Write a complete, runnable {language} program for the task below. \
             It must print its result to stdout and must not wait for input. \
             Reply with only the code in a single fenced block.\n\nTask: {prompt}"
        )
    }

    /// Prompt for an `llm_query` step
    pub fn query(prompt: &str, context: Option<&Value>) -> String {
        match context {
            Some(ctx) => format!("{}\n\nContext:\n{}", prompt, ctx),
            None => prompt.to_string(),
        }
    }

    /// System prompt for project generation
    pub fn project_system() -> String {
        format!(
            r#"You generate complete, working software projects. Reply with one JSON object:
{{
  "name": "kebab-case-name",
  "type": "node|python|rust|go",
  "description": "one sentence",
  "dependencies": {{"package": "version"}},
  "devDependencies": {{"package": "version"}},
  "files": [{{"path": "relative/path", "content": "full file content", "purpose": "why it exists"}}],
  "folderStructure": ["dir", "dir/sub"],
  "setupCommands": ["..."],
  "runCommand": "...",
  "portNeeded": number or null,
  "environmentVariables": {{"NAME": "example"}}
}}

Rules:
- At least {MIN_FILES} files, every one fully implemented; no stubs or unfinished markers.
- Include a dependency manifest, a main entry file (main, index, app or server) and a README.
- Declare at least one dependency and at least {MIN_FOLDER_ENTRIES} folders."#
        )
    }

    /// User prompt for project generation.
    ///
    /// `previous_violations` are the rules the last attempt broke.
    pub fn project_user(request: &ProjectRequest, previous_violations: &[String]) -> String {
        let mut prompt = format!("Build this: {}", request.text);
        if request.strict_name {
            prompt.push_str(
                "\n\nThe project name and description MUST use the key words of the request. \
                 Do not build a different kind of app.",
            );
        }
        if !previous_violations.is_empty() {
            prompt.push_str("\n\nYour previous attempt was rejected:\n");
            for violation in previous_violations {
                prompt.push_str(&format!("- {}\n", violation));
            }
            prompt.push_str("Fix every item above.");
        }
        prompt
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::{RiskLevel, ToolParameter};

    #[test]
    fn test_classification_lists_all_types() {
        let prompt = EnginePromptTemplate::classification_system();
        for ty in IntentType::all() {
            assert!(prompt.contains(ty.as_str()));
        }
    }

    #[test]
    fn test_plan_system_lists_tools() {
        let tools = ToolSpec::new().register(
            ToolDefinition::new("open_app", "Open an application", RiskLevel::Low)
                .with_parameter(ToolParameter::new("name", "App name", true)),
        );
        let prompt = EnginePromptTemplate::plan_system(&tools);
        assert!(prompt.contains("open_app(name) - Open an application"));
        assert!(prompt.contains(CREATE_PLAN_TOOL));
    }

    #[test]
    fn test_project_user_carries_violations_and_strictness() {
        let request = ProjectRequest::new("recipe tracker").strict();
        let prompt = EnginePromptTemplate::project_user(&request, &["Missing README".to_string()]);
        assert!(prompt.contains("MUST use the key words"));
        assert!(prompt.contains("- Missing README"));

        let plain = EnginePromptTemplate::project_user(&ProjectRequest::new("x"), &[]);
        assert!(!plain.contains("rejected"));
    }

    #[test]
    fn test_classification_user_context() {
        assert_eq!(EnginePromptTemplate::classification_user("hi", &[]), "Request: hi");
        let with = EnginePromptTemplate::classification_user("hi", &["user: yo".to_string()]);
        assert!(with.starts_with("Recent conversation:\n- user: yo"));
    }
}
