//! Plan domain module
//!
//! Execution plans, their steps and actions, the dependency ordering the
//! executor relies on, and the value objects a run produces.
//!
//! ```text
//! ExecutionPlan ──▶ execution_order() ──▶ [PlanStep…] ──▶ ExecutionResult
//!   (immutable)       (DFS topo sort)      (sequential)     (+ Artifacts)
//! ```

pub mod entities;
pub mod ordering;
pub mod parser;
pub mod value_objects;

pub use entities::{ExecutionPlan, FileOperationKind, PlanStep, StepAction, StepId};
pub use ordering::{PlanOrderError, execution_order};
pub use parser::{ParsedPlan, parse_plan_value};
pub use value_objects::{Artifact, ArtifactType, ExecutionResult, synthesize_output};
