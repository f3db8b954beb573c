//! Use cases
//!
//! Application-level operations that orchestrate domain logic:
//!
//! - [`classify_intent`]: text → intent
//! - [`build_plan`]: intent → plan
//! - [`execute_plan`]: plan → result
//! - [`generate_project`]: generate-validate-retry with fallback
//! - [`handle_request`]: one full user turn

pub mod build_plan;
pub mod classify_intent;
pub mod execute_plan;
pub mod generate_project;
pub mod handle_request;

#[cfg(test)]
pub(crate) mod test_support;
