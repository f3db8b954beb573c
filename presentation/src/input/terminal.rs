//! Terminal prompt for `user_input` steps.
//!
//! The prompt goes to stderr and the answer is one line from stdin. An empty
//! line or end of input cancels the step.

use async_trait::async_trait;
use colored::Colorize;
use deskpilot_application::{UserInputError, UserInputPort};
use std::io::{self, BufRead, Write};

pub struct TerminalUserInput;

impl TerminalUserInput {
    pub fn new() -> Self {
        Self
    }

    fn read_answer(prompt: &str) -> Result<String, UserInputError> {
        eprint!("{} {} ", "?".magenta().bold(), prompt);
        io::stderr()
            .flush()
            .map_err(|e| UserInputError::Io(format!("Failed to flush prompt: {}", e)))?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .map_err(|e| UserInputError::Io(format!("Failed to read input: {}", e)))?;

        parse_answer(read, &input)
    }
}

impl Default for TerminalUserInput {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_answer(bytes_read: usize, line: &str) -> Result<String, UserInputError> {
    let answer = line.trim();
    if bytes_read == 0 || answer.is_empty() {
        return Err(UserInputError::Cancelled);
    }
    Ok(answer.to_string())
}

#[async_trait]
impl UserInputPort for TerminalUserInput {
    async fn ask(&self, prompt: &str) -> Result<String, UserInputError> {
        let prompt = prompt.to_string();
        tokio::task::spawn_blocking(move || Self::read_answer(&prompt))
            .await
            .map_err(|e| UserInputError::Io(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer(6, "Paris\n").unwrap(), "Paris");
        assert_eq!(parse_answer(0, ""), Err(UserInputError::Cancelled));
        assert_eq!(parse_answer(3, "  \n"), Err(UserInputError::Cancelled));
    }
}
