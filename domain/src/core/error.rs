//! Domain error types

use crate::parsing::ParseError;
use crate::plan::ordering::PlanOrderError;
use crate::project::validation::ProjectValidationError;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Request is empty")]
    EmptyRequest,

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    PlanOrder(#[from] PlanOrderError),

    #[error(transparent)]
    ProjectValidation(#[from] ProjectValidationError),
}

impl DomainError {
    /// Whether the plan itself is structurally unusable
    pub fn is_plan_structure(&self) -> bool {
        matches!(self, DomainError::PlanOrder(_))
    }
}
