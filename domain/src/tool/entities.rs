//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

/// Risk level of a tool operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// Read-only (read_file, glob_search)
    Low,
    /// Changes the machine (write_file, run_command)
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::High => "high",
        }
    }

    pub fn requires_approval(&self) -> bool {
        matches!(self, RiskLevel::High)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool the engine may call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub risk_level: RiskLevel,
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    pub required: bool,
    /// Type hint shown to the provider ("string", "path", "number")
    pub param_type: String,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        risk_level: RiskLevel,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            risk_level,
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    pub fn is_high_risk(&self) -> bool {
        self.risk_level.requires_approval()
    }

    /// One-line rendering used in prompts: `name(a, b?) - description`
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| {
                if p.required {
                    p.name.clone()
                } else {
                    format!("{}?", p.name)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}) - {}", self.name, params, self.description)
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }
}

/// Registry of available tools plus alias mappings.
///
/// Generators often invent near-miss names (`bash` for `run_command`);
/// aliases resolve those without another provider round-trip.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    tools: BTreeMap<String, ToolDefinition>,
    aliases: HashMap<String, String>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, tool: ToolDefinition) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn register_alias(
        mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    pub fn register_aliases(
        mut self,
        mappings: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        for (alias, canonical) in mappings {
            self.aliases.insert(alias.into(), canonical.into());
        }
        self
    }

    /// Canonical name for `name`, whether it is a tool or an alias.
    ///
    /// A registered tool name always wins over an alias of the same name.
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.tools.contains_key(name) {
            Some(name)
        } else {
            self.aliases
                .get(name)
                .map(String::as_str)
                .filter(|canonical| self.tools.contains_key(*canonical))
        }
    }

    pub fn get_resolved(&self, name: &str) -> Option<&ToolDefinition> {
        self.resolve(name).and_then(|canonical| self.tools.get(canonical))
    }

    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.get(name)
    }

    /// Tools in name order
    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// A call to a tool with arguments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: Map::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Map<String, Value>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.arguments.get(key).and_then(|v| v.as_str())
    }

    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.arguments.get(key).and_then(|v| v.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> ToolSpec {
        ToolSpec::new()
            .register(
                ToolDefinition::new("run_command", "Run a shell command", RiskLevel::High)
                    .with_parameter(ToolParameter::new("command", "Command line", true))
                    .with_parameter(
                        ToolParameter::new("cwd", "Working dir", false).with_type("path"),
                    ),
            )
            .register(ToolDefinition::new("read_file", "Read a file", RiskLevel::Low))
            .register_aliases([("bash", "run_command"), ("cat", "read_file"), ("ghost", "nowhere")])
    }

    #[test]
    fn test_resolve_aliases() {
        let spec = spec();
        assert_eq!(spec.resolve("bash"), Some("run_command"));
        assert_eq!(spec.resolve("read_file"), Some("read_file"));
        assert_eq!(spec.get_resolved("cat").unwrap().name, "read_file");
        assert_eq!(spec.resolve("unknown"), None);
        // An alias to an unregistered tool does not resolve
        assert_eq!(spec.resolve("ghost"), None);
    }

    #[test]
    fn test_tool_name_wins_over_alias() {
        let spec = spec()
            .register(ToolDefinition::new("cat", "Concatenate", RiskLevel::Low));
        assert_eq!(spec.get_resolved("cat").unwrap().name, "cat");
    }

    #[test]
    fn test_all_is_sorted() {
        let binding = spec();
        let names: Vec<&str> = binding.names().collect();
        assert_eq!(names, vec!["read_file", "run_command"]);
    }

    #[test]
    fn test_signature() {
        let spec = spec();
        assert_eq!(
            spec.get("run_command").unwrap().signature(),
            "run_command(command, cwd?) - Run a shell command"
        );
    }

    #[test]
    fn test_tool_call_args() {
        let call = ToolCall::new("read_file").with_arg("path", "/tmp/a").with_arg("limit", 10);
        assert_eq!(call.get_string("path"), Some("/tmp/a"));
        assert_eq!(call.get_u64("limit"), Some(10));
        assert!(call.require_string("missing").is_err());
    }
}
