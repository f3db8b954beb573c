//! Provider conversation types.
//!
//! - [`entities::Message`]: a `{role, content}` message sent to the provider
//! - [`response::LlmResponse`]: text and tool-use blocks coming back

pub mod entities;
pub mod response;

pub use entities::{Message, Role};
pub use response::{ContentBlock, LlmResponse, StopReason};
