//! Fast-path intent rules.
//!
//! A fixed, ordered table of regex rules checked before asking the provider
//! to classify a request. The first matching rule wins; ties are broken by
//! table order, not by how specific a pattern is.
//!
//! ```text
//! 1. project-build phrasing     "build me a todo app"        → project_generation
//! 2. voice/build combinations   "hey, can you make a game"   → project_generation
//! 3. greeting/acknowledgement   "thanks!"                    → conversation
//! ```

use super::entities::{Complexity, IntentType, TaskIntent};
use regex::Regex;
use std::sync::LazyLock;

/// Tools a generated project needs from the host.
const PROJECT_TOOLS: &[&str] = &["file_writer", "terminal"];

/// One entry of the fast-path table.
pub struct IntentRule {
    /// Stable identifier, used in logs
    pub name: &'static str,
    pattern: Regex,
    build: fn(&str) -> TaskIntent,
}

impl IntentRule {
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    pub fn apply(&self, text: &str) -> TaskIntent {
        (self.build)(text)
    }
}

fn project_intent(text: &str, confidence: f64) -> TaskIntent {
    let mut intent = TaskIntent::new(IntentType::ProjectGeneration, text.trim())
        .with_complexity(Complexity::Complex)
        .with_estimated_steps(4)
        .with_confidence(confidence);
    for tool in PROJECT_TOOLS {
        intent = intent.with_tool(*tool);
    }
    intent
}

fn build_project_phrasing(text: &str) -> TaskIntent {
    project_intent(text, 0.95)
}

fn build_voice_project(text: &str) -> TaskIntent {
    project_intent(text, 0.9)
}

fn build_greeting(text: &str) -> TaskIntent {
    TaskIntent::new(IntentType::Conversation, text.trim())
        .with_complexity(Complexity::Trivial)
        .with_estimated_steps(0)
        .with_confidence(0.95)
}

static RULES: LazyLock<Vec<IntentRule>> = LazyLock::new(|| {
    vec![
        IntentRule {
            name: "project_build",
            pattern: Regex::new(
                r"(?i)\b(build|create|make|generate|scaffold|set up|code)\b(\s+\w+){0,6}?\s+(app|application|website|web\s?site|web\s?app|project|game|dashboard|api|server|landing page|tool|clone)\b",
            )
            .expect("valid project_build pattern"),
            build: build_project_phrasing,
        },
        IntentRule {
            name: "voice_build",
            pattern: Regex::new(
                r"(?i)^\s*(hey|ok|okay|yo|alright|so)?[\s,]*(can|could|would|will)\s+you\s+(please\s+)?(build|make|create|whip up|put together)\b",
            )
            .expect("valid voice_build pattern"),
            build: build_voice_project,
        },
        IntentRule {
            name: "greeting",
            pattern: Regex::new(
                r"(?i)^\s*(hi|hello|hey|hey there|yo|thanks|thank you|thx|ok|okay|cool|great|nice|awesome|got it|bye|goodbye|good (morning|afternoon|evening))\s*[!.?]*\s*$",
            )
            .expect("valid greeting pattern"),
            build: build_greeting,
        },
    ]
});

/// The ordered rule table.
pub fn fast_path_rules() -> &'static [IntentRule] {
    &RULES
}

/// Return the intent of the first matching rule, if any.
pub fn match_fast_path(text: &str) -> Option<(&'static str, TaskIntent)> {
    fast_path_rules()
        .iter()
        .find(|rule| rule.matches(text))
        .map(|rule| (rule.name, rule.apply(text)))
}
