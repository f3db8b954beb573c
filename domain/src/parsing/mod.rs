//! Structured-response parsing shared by plan building and project generation.

pub mod structured;

pub use structured::{
    ParseError, ParseStrategy, parse_structured_response, repair_json, strip_code_fences,
};
