//! Execution ordering for plan steps.
//!
//! Depth-first topological sort over step dependencies. Roots are visited in
//! array order and each step's dependencies in their declared order, so the
//! result is deterministic and keeps the input order wherever the graph does
//! not force otherwise.
//!
//! Reaching a step that is still on the DFS stack is a back-edge: the plan is
//! cyclic and nothing may execute.

use super::entities::{PlanStep, StepId};
use std::collections::HashMap;
use thiserror::Error;

/// Structural problems found while ordering a plan
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanOrderError {
    #[error("Circular dependency detected at step '{step}'")]
    CircularDependency { step: StepId },

    #[error("Step '{step}' depends on unknown step '{dependency}'")]
    MissingDependency { step: StepId, dependency: StepId },

    #[error("Duplicate step id '{0}'")]
    DuplicateStepId(StepId),
}

impl PlanOrderError {
    pub fn is_circular(&self) -> bool {
        matches!(self, PlanOrderError::CircularDependency { .. })
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    InProgress,
    Done,
}

/// Order `steps` so that every step comes after all of its dependencies.
///
/// Returns borrowed steps; the input slice is left untouched.
pub fn execution_order(steps: &[PlanStep]) -> Result<Vec<&PlanStep>, PlanOrderError> {
    let mut index: HashMap<&StepId, usize> = HashMap::with_capacity(steps.len());
    for (i, step) in steps.iter().enumerate() {
        if index.insert(&step.id, i).is_some() {
            return Err(PlanOrderError::DuplicateStepId(step.id.clone()));
        }
    }

    let mut marks = vec![Mark::Unvisited; steps.len()];
    let mut order = Vec::with_capacity(steps.len());

    for i in 0..steps.len() {
        visit(i, steps, &index, &mut marks, &mut order)?;
    }

    Ok(order)
}

fn visit<'a>(
    i: usize,
    steps: &'a [PlanStep],
    index: &HashMap<&StepId, usize>,
    marks: &mut [Mark],
    order: &mut Vec<&'a PlanStep>,
) -> Result<(), PlanOrderError> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::InProgress => {
            return Err(PlanOrderError::CircularDependency {
                step: steps[i].id.clone(),
            });
        }
        Mark::Unvisited => {}
    }

    marks[i] = Mark::InProgress;
    let step = &steps[i];
    for dep in &step.dependencies {
        let Some(&j) = index.get(dep) else {
            return Err(PlanOrderError::MissingDependency {
                step: step.id.clone(),
                dependency: dep.clone(),
            });
        };
        visit(j, steps, index, marks, order)?;
    }
    marks[i] = Mark::Done;
    order.push(step);
    Ok(())
}
