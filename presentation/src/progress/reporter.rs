//! Progress reporting for plan execution and project generation
//!
//! Both reporters write to stderr so `--output json` stays parseable.

use colored::Colorize;
use deskpilot_application::{GenerationProgressNotifier, PlanProgressNotifier};
use deskpilot_domain::{ExecutionPlan, ExecutionResult, PlanStep, ProjectAnalysis};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with indicatif bars
pub struct ProgressReporter {
    plan_bar: Mutex<Option<ProgressBar>>,
    generation_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            plan_bar: Mutex::new(None),
            generation_bar: Mutex::new(None),
        }
    }

    fn plan_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn with_plan_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.plan_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn take_plan_bar(&self) -> Option<ProgressBar> {
        self.plan_bar.lock().ok().and_then(|mut guard| guard.take())
    }

    fn with_generation_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.generation_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }

    fn take_generation_bar(&self) -> Option<ProgressBar> {
        self.generation_bar
            .lock()
            .ok()
            .and_then(|mut guard| guard.take())
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanProgressNotifier for ProgressReporter {
    fn on_plan_start(&self, plan: &ExecutionPlan) {
        let pb = ProgressBar::new(plan.steps.len() as u64);
        pb.set_style(Self::plan_style());
        pb.set_prefix("Plan");
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut guard) = self.plan_bar.lock() {
            *guard = Some(pb);
        }
    }

    fn on_step_start(&self, step: &PlanStep, _index: usize, _total: usize, percent: f64) {
        self.with_plan_bar(|pb| {
            pb.set_message(format!("{:>3.0}% {}", percent, step.description));
        });
    }

    fn on_step_complete(&self, step: &PlanStep, _result: &serde_json::Value) {
        self.with_plan_bar(|pb| {
            pb.set_message(format!("{} {}", "v".green(), step.description));
            pb.inc(1);
        });
    }

    fn on_step_error(&self, step: &PlanStep, error: &str) {
        self.with_plan_bar(|pb| {
            pb.println(format!("  {} step {}: {}", "x".red(), step.id, error));
        });
    }

    fn on_step_retry(&self, step: &PlanStep) {
        self.with_plan_bar(|pb| {
            pb.set_message(format!("{} {}", "retrying".yellow(), step.description));
        });
    }

    fn on_plan_complete(&self, result: &ExecutionResult) {
        if let Some(pb) = self.take_plan_bar() {
            pb.finish_with_message(format!(
                "{} ({} steps)",
                "complete!".green(),
                result.steps_completed
            ));
        }
    }

    fn on_plan_error(&self, error: &str) {
        if let Some(pb) = self.take_plan_bar() {
            pb.abandon_with_message(format!("{} {}", "failed:".red(), error));
        }
    }
}

impl GenerationProgressNotifier for ProgressReporter {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        let message = format!("attempt {}/{}", attempt, max_attempts);
        if let Ok(mut guard) = self.generation_bar.lock() {
            match guard.as_ref() {
                Some(pb) => pb.set_message(message),
                None => {
                    let pb = ProgressBar::new_spinner();
                    pb.set_style(Self::spinner_style());
                    pb.set_prefix("Generating project");
                    pb.set_message(message);
                    pb.enable_steady_tick(Duration::from_millis(120));
                    *guard = Some(pb);
                }
            }
        }
    }

    fn on_attempt_failed(&self, attempt: usize, violations: &[String]) {
        self.with_generation_bar(|pb| {
            pb.println(format!(
                "  {} attempt {} rejected ({} issues)",
                "x".red(),
                attempt,
                violations.len()
            ));
            for violation in violations {
                pb.println(format!("    - {}", violation.dimmed()));
            }
        });
    }

    fn on_enhanced(&self, project: &ProjectAnalysis, added_files: &[String]) {
        if let Some(pb) = self.take_generation_bar() {
            let added = if added_files.is_empty() {
                String::new()
            } else {
                format!(", added {}", added_files.join(", "))
            };
            pb.finish_with_message(format!(
                "{} {} ({} files{})",
                "v".green(),
                project.name,
                project.files.len(),
                added
            ));
        }
    }

    fn on_fallback(&self, project: &ProjectAnalysis) {
        if let Some(pb) = self.take_generation_bar() {
            pb.abandon_with_message(format!(
                "{} using built-in {} scaffold",
                "!".yellow(),
                project.name
            ));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl PlanProgressNotifier for SimpleProgress {
    fn on_plan_start(&self, plan: &ExecutionPlan) {
        eprintln!(
            "{} {} ({} steps)",
            "->".cyan(),
            "Running plan".bold(),
            plan.steps.len()
        );
    }

    fn on_step_start(&self, step: &PlanStep, index: usize, total: usize, _percent: f64) {
        eprintln!("  [{}/{}] {}", index + 1, total, step.description);
    }

    fn on_step_complete(&self, step: &PlanStep, _result: &serde_json::Value) {
        eprintln!("  {} {}", "v".green(), step.id);
    }

    fn on_step_error(&self, step: &PlanStep, error: &str) {
        eprintln!("  {} {} ({})", "x".red(), step.id, error);
    }

    fn on_step_retry(&self, step: &PlanStep) {
        eprintln!("  {} retrying {}", "~".yellow(), step.id);
    }

    fn on_plan_complete(&self, _result: &ExecutionResult) {
        eprintln!();
    }

    fn on_plan_error(&self, error: &str) {
        eprintln!("  {} {}", "plan failed:".red(), error);
    }
}

impl GenerationProgressNotifier for SimpleProgress {
    fn on_attempt_start(&self, attempt: usize, max_attempts: usize) {
        eprintln!(
            "{} {} (attempt {}/{})",
            "->".cyan(),
            "Generating project".bold(),
            attempt,
            max_attempts
        );
    }

    fn on_attempt_failed(&self, attempt: usize, violations: &[String]) {
        eprintln!("  {} attempt {} rejected", "x".red(), attempt);
        for violation in violations {
            eprintln!("    - {}", violation);
        }
    }

    fn on_enhanced(&self, _project: &ProjectAnalysis, added_files: &[String]) {
        if !added_files.is_empty() {
            eprintln!("  {} added {}", "+".green(), added_files.join(", "));
        }
    }

    fn on_fallback(&self, project: &ProjectAnalysis) {
        eprintln!("  {} using built-in {} scaffold", "!".yellow(), project.name);
    }
}
