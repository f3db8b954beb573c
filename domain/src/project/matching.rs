//! Request/candidate match check.
//!
//! Decides whether a generated project is about what the user asked for by
//! keyword overlap. Pure; no I/O.

use serde::{Deserialize, Serialize};

/// Minimum share of request keywords that must appear in the candidate
pub const MATCH_THRESHOLD: f64 = 0.5;

const STOP_WORDS: &[&str] = &[
    "a", "about", "all", "an", "and", "any", "app", "application", "are", "as", "at", "be", "build",
    "but", "by", "can", "could", "create", "do", "for", "from", "generate", "get", "give", "have",
    "hey", "i", "if", "in", "into", "is", "it", "its", "just", "let", "like", "make", "me", "my",
    "need", "new", "of", "ok", "okay", "on", "or", "our", "please", "project", "quick", "really",
    "set", "should", "simple", "so", "some", "that", "the", "then", "this", "to", "up", "us",
    "using", "very", "want", "we", "what", "where", "which", "will", "with", "would", "you",
    "your",
];

/// Outcome of [`validate_match`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub matches: bool,
    pub confidence: f64,
    pub reason: String,
    #[serde(default)]
    pub matched_keywords: Vec<String>,
}

/// Lower-cased, de-duplicated request keywords with stop words removed.
///
/// Keeps first-occurrence order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for token in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() > 1)
    {
        if !STOP_WORDS.contains(&token) && !keywords.iter().any(|k| k == token) {
            keywords.push(token.to_string());
        }
    }
    keywords
}

/// Compare the request's keywords with a candidate's name and description.
pub fn validate_match(request: &str, name: &str, description: &str) -> MatchResult {
    let keywords = extract_keywords(request);
    if keywords.is_empty() {
        return MatchResult {
            matches: false,
            confidence: 0.0,
            reason: "No keywords could be extracted from the request".to_string(),
            matched_keywords: Vec::new(),
        };
    }

    let name = name.to_lowercase();
    let description = description.to_lowercase();
    let matched: Vec<String> = keywords
        .iter()
        .filter(|k| name.contains(k.as_str()) || description.contains(k.as_str()))
        .cloned()
        .collect();

    let confidence = matched.len() as f64 / keywords.len() as f64;
    let matches = confidence >= MATCH_THRESHOLD;
    let reason = if matches {
        format!(
            "Matched {}/{} request keywords ({})",
            matched.len(),
            keywords.len(),
            matched.join(", ")
        )
    } else {
        let missing: Vec<&str> = keywords
            .iter()
            .filter(|k| !matched.contains(k))
            .map(String::as_str)
            .collect();
        format!(
            "Only {}/{} request keywords matched; missing: {}",
            matched.len(),
            keywords.len(),
            missing.join(", ")
        )
    };

    MatchResult {
        matches,
        confidence,
        reason,
        matched_keywords: matched,
    }
}
