//! User input port for `user_input` steps.
//!
//! Optional collaborator: without one, `user_input` steps fail.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserInputError {
    #[error("Input cancelled")]
    Cancelled,

    #[error("I/O error: {0}")]
    Io(String),
}

#[async_trait]
pub trait UserInputPort: Send + Sync {
    /// Show `prompt` and wait for the user's answer
    async fn ask(&self, prompt: &str) -> Result<String, UserInputError>;
}
