//! Local tool executor: the concrete implementation of [`ToolExecutorPort`].
//!
//! ```text
//! ToolExecutorPort::execute()
//!   ├─ resolve alias → canonical name
//!   ├─ DefaultToolValidator (required parameters)
//!   ├─ run_command       → ProcessRunnerPort (async)
//!   └─ file / search     → std::fs, glob (synchronous)
//! ```

use super::{command, file, search};
use async_trait::async_trait;
use deskpilot_application::{ProcessRunnerPort, ToolExecutorPort};
use deskpilot_application::ports::process_runner::DEFAULT_MAX_BUFFER_BYTES;
use deskpilot_domain::{
    DefaultToolValidator, ToolCall, ToolError, ToolResult, ToolSpec, ToolValidator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Executor that runs tools on the local machine.
///
/// | Constructor | Tools |
/// |-------------|-------|
/// | [`new()`](Self::new) | All built-in tools and aliases |
/// | [`with_tools()`](Self::with_tools) | Custom [`ToolSpec`] |
#[derive(Clone)]
pub struct LocalToolExecutor {
    tool_spec: ToolSpec,
    processes: Arc<dyn ProcessRunnerPort>,
    /// Working directory for commands (None = current directory)
    working_dir: Option<PathBuf>,
    max_output_bytes: usize,
}

impl LocalToolExecutor {
    pub fn new(processes: Arc<dyn ProcessRunnerPort>) -> Self {
        Self::with_tools(super::default_tool_spec(), processes)
    }

    pub fn with_tools(tool_spec: ToolSpec, processes: Arc<dyn ProcessRunnerPort>) -> Self {
        Self {
            tool_spec,
            processes,
            working_dir: None,
            max_output_bytes: DEFAULT_MAX_BUFFER_BYTES,
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn with_max_output_bytes(mut self, bytes: usize) -> Self {
        self.max_output_bytes = bytes;
        self
    }

    async fn dispatch(&self, canonical: &str, call: &ToolCall) -> ToolResult {
        match canonical {
            file::READ_FILE => file::execute_read_file(call),
            file::WRITE_FILE => file::execute_write_file(call),
            file::LIST_DIRECTORY => file::execute_list_directory(call),
            search::GLOB_SEARCH => search::execute_glob_search(call),
            command::RUN_COMMAND => {
                command::execute_run_command(
                    self.processes.as_ref(),
                    call,
                    self.working_dir.as_ref(),
                    self.max_output_bytes,
                )
                .await
            }
            other => ToolResult::failure(
                other,
                ToolError::execution_failed(format!("Tool '{}' is not implemented", other)),
            ),
        }
    }
}

#[async_trait]
impl ToolExecutorPort for LocalToolExecutor {
    fn tool_spec(&self) -> &ToolSpec {
        &self.tool_spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let Some(definition) = self.tool_spec.get_resolved(&call.tool_name) else {
            return ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name));
        };

        if let Err(e) = DefaultToolValidator.validate(call, definition) {
            return ToolResult::failure(&definition.name, ToolError::invalid_argument(e));
        }

        let start = Instant::now();
        let result = self.dispatch(&definition.name, call).await;
        let duration_ms = start.elapsed().as_millis() as u64;
        debug!(
            tool = %definition.name,
            requested = %call.tool_name,
            success = result.is_success(),
            duration_ms,
            "Tool executed"
        );
        result.with_duration(duration_ms)
    }
}
