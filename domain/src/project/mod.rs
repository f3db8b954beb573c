//! Project generation domain: candidates, completeness rules, enhancement,
//! deterministic fallback and request matching.

pub mod enhance;
pub mod entities;
pub mod fallback;
pub mod matching;
pub mod validation;

pub use enhance::{ProjectKind, enhance_project};
pub use entities::{ProjectAnalysis, ProjectFile, ProjectRequest};
pub use fallback::{FallbackKind, fallback_project};
pub use matching::{MATCH_THRESHOLD, MatchResult, extract_keywords, validate_match};
pub use validation::{ProjectValidationError, project_violations, validate_project};
