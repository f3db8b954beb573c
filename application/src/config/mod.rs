//! Application-level configuration.
//!
//! - [`EngineParams`]: timeouts, limits and retry policy for the use cases

pub mod engine_params;

pub use engine_params::EngineParams;
