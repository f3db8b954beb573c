//! Tool call validation
//!
//! Pure check of a call against its definition. The async executor port
//! lives in the application layer.

use super::entities::{ToolCall, ToolDefinition};

pub trait ToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String>;
}

/// Requires every `required` parameter to be present and non-null.
///
/// Extra arguments are tolerated: parameters extracted from free text often
/// carry keys the tool ignores.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, definition: &ToolDefinition) -> Result<(), String> {
        for param in definition.parameters.iter().filter(|p| p.required) {
            match call.arguments.get(&param.name) {
                Some(value) if !value.is_null() => {}
                _ => {
                    return Err(format!(
                        "Missing required parameter '{}' for tool '{}'",
                        param.name, definition.name
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{RiskLevel, ToolParameter};
    use serde_json::Value;

    fn definition() -> ToolDefinition {
        ToolDefinition::new("write_file", "Write", RiskLevel::High)
            .with_parameter(ToolParameter::new("path", "Target", true))
            .with_parameter(ToolParameter::new("content", "Body", false))
    }

    #[test]
    fn test_missing_required() {
        let err = DefaultToolValidator
            .validate(&ToolCall::new("write_file"), &definition())
            .unwrap_err();
        assert!(err.contains("'path'"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let call = ToolCall::new("write_file").with_arg("path", Value::Null);
        assert!(DefaultToolValidator.validate(&call, &definition()).is_err());
    }

    #[test]
    fn test_extra_arguments_allowed() {
        let call = ToolCall::new("write_file")
            .with_arg("path", "a.txt")
            .with_arg("mode", "0644");
        assert!(DefaultToolValidator.validate(&call, &definition()).is_ok());
    }
}
