//! Application layer for deskpilot
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::EngineParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    file_system::FileSystemPort,
    generation_progress::{GenerationProgressNotifier, NoGenerationProgress},
    llm_gateway::{ChatOptions, FunctionSpec, GatewayError, LlmGateway},
    plan_progress::{NoPlanProgress, PlanProgressNotifier},
    process_runner::{ProcessError, ProcessOptions, ProcessOutput, ProcessRunnerPort},
    tool_executor::ToolExecutorPort,
    user_input::{UserInputError, UserInputPort},
};
pub use use_cases::build_plan::{BuildPlanUseCase, PlanGenerationError};
pub use use_cases::classify_intent::ClassifyIntentUseCase;
pub use use_cases::execute_plan::{PlanExecutor, StepError};
pub use use_cases::generate_project::GenerateProjectUseCase;
pub use use_cases::handle_request::{GeneratedProject, HandleRequestUseCase, TurnOutcome};
