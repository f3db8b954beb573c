//! Command execution tool: run_command

use deskpilot_application::{ProcessError, ProcessOptions, ProcessRunnerPort};
use deskpilot_domain::{RiskLevel, ToolCall, ToolDefinition, ToolError, ToolParameter, ToolResult};
use std::path::PathBuf;
use std::time::Duration;

pub const RUN_COMMAND: &str = "run_command";

/// Default timeout for command execution (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub fn run_command_definition() -> ToolDefinition {
    ToolDefinition::new(
        RUN_COMMAND,
        "Execute a shell command and return its output. Use with caution.",
        RiskLevel::High,
    )
    .with_parameter(
        ToolParameter::new("command", "The command to execute", true).with_type("string"),
    )
    .with_parameter(
        ToolParameter::new("working_dir", "Working directory for the command", false)
            .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new("timeout_secs", "Timeout in seconds (default: 60)", false)
            .with_type("number"),
    )
}

fn shell_invocation(command: &str) -> (&'static str, Vec<String>) {
    if cfg!(target_os = "windows") {
        ("cmd", vec!["/C".to_string(), command.to_string()])
    } else {
        ("sh", vec!["-c".to_string(), command.to_string()])
    }
}

/// stdout, then stderr under a separator when both are present
fn combine_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (_, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{}\n--- stderr ---\n{}", stdout, stderr),
    }
}

pub async fn execute_run_command(
    runner: &dyn ProcessRunnerPort,
    call: &ToolCall,
    default_dir: Option<&PathBuf>,
    max_buffer_bytes: usize,
) -> ToolResult {
    let command = match call.require_string("command") {
        Ok(c) => c,
        Err(e) => return ToolResult::failure(RUN_COMMAND, ToolError::invalid_argument(e)),
    };

    let working_dir = call
        .get_string("working_dir")
        .map(PathBuf::from)
        .or_else(|| default_dir.cloned());
    if let Some(dir) = &working_dir
        && !dir.is_dir()
    {
        return ToolResult::failure(
            RUN_COMMAND,
            ToolError::not_found(format!("working directory {}", dir.display())),
        );
    }

    let timeout_secs = call.get_u64("timeout_secs").unwrap_or(DEFAULT_TIMEOUT_SECS);
    let options = ProcessOptions {
        timeout: Duration::from_secs(timeout_secs),
        max_buffer_bytes,
        working_dir,
    };

    let (program, args) = shell_invocation(command);
    match runner.run(program, &args, &options).await {
        Ok(output) => {
            ToolResult::success(RUN_COMMAND, combine_output(&output.stdout, &output.stderr))
        }
        Err(ProcessError::Timeout(_)) => ToolResult::failure(
            RUN_COMMAND,
            ToolError::timeout(format!("'{}' after {}s", command, timeout_secs)),
        ),
        Err(e) => ToolResult::failure(RUN_COMMAND, ToolError::execution_failed(e.to_string())),
    }
}
