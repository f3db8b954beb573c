//! Language model providers.

mod openai;

pub use openai::{OpenAiConfig, OpenAiGateway};
