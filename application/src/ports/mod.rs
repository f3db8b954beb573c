//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod conversation_logger;
pub mod file_system;
pub mod generation_progress;
pub mod llm_gateway;
pub mod plan_progress;
pub mod process_runner;
pub mod tool_executor;
pub mod user_input;
