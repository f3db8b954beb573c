//! Plan execution progress port.
//!
//! [`PlanProgressNotifier`] is an output port the presentation layer
//! implements to show a run as it happens. Events for one run are delivered
//! in this order:
//!
//! ```text
//! plan_start
//!   step_start ─┬─ step_complete
//!               └─ step_error ─┬─ step_retry ─ (step_complete | step_error)
//!                              └─ (not retryable)
//! plan_complete | plan_error
//! ```
//!
//! All methods have default no-op implementations.

use deskpilot_domain::{ExecutionPlan, ExecutionResult, PlanStep};

pub trait PlanProgressNotifier: Send + Sync {
    fn on_plan_start(&self, _plan: &ExecutionPlan) {}

    /// `index` is 0-based in execution order; `percent` = index / total * 100
    fn on_step_start(&self, _step: &PlanStep, _index: usize, _total: usize, _percent: f64) {}

    fn on_step_complete(&self, _step: &PlanStep, _result: &serde_json::Value) {}

    fn on_step_error(&self, _step: &PlanStep, _error: &str) {}

    fn on_step_retry(&self, _step: &PlanStep) {}

    fn on_plan_complete(&self, _result: &ExecutionResult) {}

    fn on_plan_error(&self, _error: &str) {}
}

/// No-op notifier
pub struct NoPlanProgress;

impl PlanProgressNotifier for NoPlanProgress {}
