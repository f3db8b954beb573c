//! Core domain concepts shared across subdomains.
//!
//! - [`error::DomainError`]: domain-level errors

pub mod error;
