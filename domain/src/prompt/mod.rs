//! Prompt templates for every provider call the engine makes.

pub mod engine;

pub use engine::{CREATE_PLAN_TOOL, EnginePromptTemplate};
