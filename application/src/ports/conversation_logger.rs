//! Port for structured conversation logging.
//!
//! Separate from `tracing`: tracing carries human-readable diagnostics,
//! this port records what happened in each turn (classification, plan,
//! result, generation attempts) in a machine-readable form such as JSONL.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type, e.g. `"intent_classified"` or `"plan_built"`
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Record conversation events.
///
/// Synchronous and infallible.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
