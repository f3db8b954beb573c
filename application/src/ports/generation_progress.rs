//! Project generation progress port.

use deskpilot_domain::ProjectAnalysis;

/// Callbacks for the generate-validate-retry loop. All default to no-ops.
pub trait GenerationProgressNotifier: Send + Sync {
    /// `attempt` is 1-based
    fn on_attempt_start(&self, _attempt: usize, _max_attempts: usize) {}

    fn on_attempt_failed(&self, _attempt: usize, _violations: &[String]) {}

    /// Enhancement pass finished; `added_files` are the files it created
    fn on_enhanced(&self, _project: &ProjectAnalysis, _added_files: &[String]) {}

    /// Every attempt failed and the local fallback is being used
    fn on_fallback(&self, _project: &ProjectAnalysis) {}
}

/// No-op notifier
pub struct NoGenerationProgress;

impl GenerationProgressNotifier for NoGenerationProgress {}
