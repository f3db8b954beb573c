//! File tools: read_file, write_file, list_directory

use deskpilot_domain::{RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

pub const READ_FILE: &str = "read_file";
pub const WRITE_FILE: &str = "write_file";
pub const LIST_DIRECTORY: &str = "list_directory";

/// Maximum file size for reading (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

pub fn read_file_definition() -> ToolDefinition {
    ToolDefinition::new(READ_FILE, "Read the contents of a text file", RiskLevel::Low)
        .with_parameter(ToolParameter::new("path", "Path to the file", true).with_type("path"))
        .with_parameter(
            ToolParameter::new("offset", "Line number to start from (0-based)", false)
                .with_type("number"),
        )
        .with_parameter(
            ToolParameter::new("limit", "Maximum number of lines to return", false)
                .with_type("number"),
        )
}

pub fn write_file_definition() -> ToolDefinition {
    ToolDefinition::new(
        WRITE_FILE,
        "Write content to a file, creating parent directories as needed",
        RiskLevel::High,
    )
    .with_parameter(ToolParameter::new("path", "Path to the file", true).with_type("path"))
    .with_parameter(ToolParameter::new("content", "Content to write", true).with_type("string"))
}

pub fn list_directory_definition() -> ToolDefinition {
    ToolDefinition::new(
        LIST_DIRECTORY,
        "List the entries of a directory; subdirectories end with '/'",
        RiskLevel::Low,
    )
    .with_parameter(ToolParameter::new("path", "Directory to list", true).with_type("path"))
}

fn io_failure(tool: &str, path: &str, e: std::io::Error) -> ToolResult {
    let error = match e.kind() {
        ErrorKind::NotFound => ToolError::not_found(path),
        ErrorKind::PermissionDenied => {
            ToolError::execution_failed(format!("Permission denied: {}", path))
        }
        _ => ToolError::execution_failed(format!("{}: {}", path, e)),
    };
    ToolResult::failure(tool, error)
}

pub fn execute_read_file(call: &ToolCall) -> ToolResult {
    let path = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(READ_FILE, ToolError::invalid_argument(e)),
    };

    match fs::metadata(path) {
        Ok(meta) if meta.is_dir() => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!("'{}' is a directory", path)),
            );
        }
        Ok(meta) if meta.len() > MAX_READ_SIZE => {
            return ToolResult::failure(
                READ_FILE,
                ToolError::invalid_argument(format!(
                    "File too large ({} bytes). Maximum size is {} bytes",
                    meta.len(),
                    MAX_READ_SIZE
                )),
            );
        }
        Ok(_) => {}
        Err(e) => return io_failure(READ_FILE, path, e),
    }

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return io_failure(READ_FILE, path, e),
    };

    let offset = call.get_u64("offset").unwrap_or(0) as usize;
    let limit = call.get_u64("limit").map(|l| l as usize);
    let output = if offset > 0 || limit.is_some() {
        content
            .lines()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        content
    };

    ToolResult::success(READ_FILE, output)
}

pub fn execute_write_file(call: &ToolCall) -> ToolResult {
    let (path, content) = match (call.require_string("path"), call.require_string("content")) {
        (Ok(p), Ok(c)) => (p, c),
        (Err(e), _) | (_, Err(e)) => {
            return ToolResult::failure(WRITE_FILE, ToolError::invalid_argument(e));
        }
    };

    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
        && let Err(e) = fs::create_dir_all(parent)
    {
        return io_failure(WRITE_FILE, path, e);
    }

    match fs::write(path, content) {
        Ok(()) => ToolResult::success(
            WRITE_FILE,
            format!("Wrote {} bytes to {}", content.len(), path),
        ),
        Err(e) => io_failure(WRITE_FILE, path, e),
    }
}

/// Output is a JSON array so later steps receive structured entries.
pub fn execute_list_directory(call: &ToolCall) -> ToolResult {
    let path = match call.require_string("path") {
        Ok(p) => p,
        Err(e) => return ToolResult::failure(LIST_DIRECTORY, ToolError::invalid_argument(e)),
    };

    let read = match fs::read_dir(path) {
        Ok(r) => r,
        Err(e) => return io_failure(LIST_DIRECTORY, path, e),
    };

    let mut entries: Vec<String> = read
        .filter_map(Result::ok)
        .map(|entry| {
            let mut name = entry.file_name().to_string_lossy().into_owned();
            if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
                name.push('/');
            }
            name
        })
        .collect();
    entries.sort();

    ToolResult::success(
        LIST_DIRECTORY,
        serde_json::Value::from(entries).to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_file_success() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "Hello, World!").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let result = execute_read_file(&ToolCall::new(READ_FILE).with_arg("path", path));

        assert!(result.is_success());
        assert_eq!(result.output(), Some("Hello, World!\n"));
    }

    #[test]
    fn test_read_file_not_found() {
        let call = ToolCall::new(READ_FILE).with_arg("path", "/nonexistent/file.txt");
        let result = execute_read_file(&call);

        assert!(!result.is_success());
        assert!(result.error().unwrap().is_not_found());
    }

    #[test]
    fn test_read_file_with_offset_and_limit() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "line1\nline2\nline3\nline4\nline5").unwrap();
        let path = temp_file.path().to_str().unwrap();

        let call = ToolCall::new(READ_FILE)
            .with_arg("path", path)
            .with_arg("offset", 1)
            .with_arg("limit", 2);
        let result = execute_read_file(&call);

        assert_eq!(result.output(), Some("line2\nline3"));
    }

    #[test]
    fn test_read_directory_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let call = ToolCall::new(READ_FILE).with_arg("path", dir.path().to_str().unwrap());
        let result = execute_read_file(&call);

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_write_file_creates_parents() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("subdir").join("test.txt");

        let call = ToolCall::new(WRITE_FILE)
            .with_arg("path", path.to_str().unwrap())
            .with_arg("content", "Hello, World!");
        let result = execute_write_file(&call);

        assert!(result.is_success());
        assert_eq!(fs::read_to_string(&path).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_write_file_missing_content() {
        let call = ToolCall::new(WRITE_FILE).with_arg("path", "x.txt");
        let result = execute_write_file(&call);

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_list_directory_json_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "").unwrap();
        fs::create_dir(dir.path().join("a")).unwrap();

        let call = ToolCall::new(LIST_DIRECTORY).with_arg("path", dir.path().to_str().unwrap());
        let result = execute_list_directory(&call);

        assert_eq!(result.output_value(), json!(["a/", "b.md"]));
    }
}
