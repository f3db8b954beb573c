//! Intent domain module
//!
//! What the user asked for, as a [`TaskIntent`], and the fast-path rule table
//! that recognises common phrasings without a provider round-trip.

pub mod entities;
pub mod rules;

pub use entities::{Complexity, IntentType, TaskIntent};
pub use rules::{IntentRule, fast_path_rules, match_fast_path};
