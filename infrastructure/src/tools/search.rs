//! Search tool: glob_search

use deskpilot_domain::{RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use glob::glob;

pub const GLOB_SEARCH: &str = "glob_search";

/// Maximum number of results to return
const MAX_RESULTS: usize = 1000;

pub fn glob_search_definition() -> ToolDefinition {
    ToolDefinition::new(
        GLOB_SEARCH,
        "Search for files matching a glob pattern (e.g., '**/*.md', 'src/*.txt')",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("pattern", "Glob pattern to match files", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "base_dir",
            "Base directory to search from (default: current dir)",
            false,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new(
            "max_results",
            "Maximum number of results to return (default: 1000)",
            false,
        )
        .with_type("number"),
    )
}

/// Matching paths as a sorted JSON array.
pub fn execute_glob_search(call: &ToolCall) -> ToolResult {
    let pattern = match call.require_string("pattern") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(GLOB_SEARCH, ToolError::invalid_argument(e)),
    };
    let base_dir = call.get_string("base_dir").unwrap_or(".");
    let max_results = call
        .get_u64("max_results")
        .map(|n| n as usize)
        .unwrap_or(MAX_RESULTS)
        .min(MAX_RESULTS);

    let full_pattern = if pattern.starts_with('/') || pattern.starts_with("./") {
        pattern.to_string()
    } else {
        format!("{}/{}", base_dir.trim_end_matches('/'), pattern)
    };

    let entries = match glob(&full_pattern) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                GLOB_SEARCH,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            );
        }
    };

    // Unreadable entries are skipped
    let mut matches: Vec<String> = entries
        .filter_map(Result::ok)
        .map(|p| p.display().to_string())
        .take(max_results)
        .collect();
    matches.sort();

    ToolResult::success(GLOB_SEARCH, serde_json::Value::from(matches).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_glob_search_finds_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("notes")).unwrap();
        fs::write(dir.path().join("notes").join("a.md"), "").unwrap();
        fs::write(dir.path().join("notes").join("b.txt"), "").unwrap();

        let call = ToolCall::new(GLOB_SEARCH)
            .with_arg("pattern", "**/*.md")
            .with_arg("base_dir", dir.path().to_str().unwrap());
        let result = execute_glob_search(&call);

        let found = result.output_value();
        let found = found.as_array().unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].as_str().unwrap().ends_with("a.md"));
    }

    #[test]
    fn test_glob_search_respects_max_results() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..5 {
            fs::write(dir.path().join(format!("{}.log", i)), "").unwrap();
        }

        let call = ToolCall::new(GLOB_SEARCH)
            .with_arg("pattern", "*.log")
            .with_arg("base_dir", dir.path().to_str().unwrap())
            .with_arg("max_results", 2);
        let result = execute_glob_search(&call);

        assert_eq!(result.output_value().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_pattern() {
        let call = ToolCall::new(GLOB_SEARCH).with_arg("pattern", "[");
        let result = execute_glob_search(&call);

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }
}
