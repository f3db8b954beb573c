//! Console output formatter for turn results

use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use deskpilot_application::{GeneratedProject, TurnOutcome};
use deskpilot_domain::{ExecutionPlan, ExecutionResult};

/// Formats turn outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete outcome
    pub fn format(outcome: &TurnOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("deskpilot"));
        output.push('\n');

        let intent = &outcome.intent;
        output.push_str(&format!(
            "{} {} ({}, {:.0}% confidence){}\n",
            "Intent:".cyan().bold(),
            intent.intent_type,
            intent.complexity,
            intent.confidence * 100.0,
            if intent.requires_approval {
                format!(" {}", "[needs approval]".yellow())
            } else {
                String::new()
            }
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Task:".cyan().bold(),
            intent.description
        ));

        if let Some(plan) = &outcome.plan {
            output.push_str(&Self::plan_section(plan));
        }

        if let Some(result) = &outcome.result {
            output.push_str(&Self::result_section(result));
        }

        if let Some(project) = &outcome.project {
            output.push_str(&Self::project_section(project));
        }

        output.push_str(&Self::section_header("Response"));
        if outcome.success {
            output.push_str(&format!("\n{}\n", outcome.response));
        } else {
            output.push_str(&format!("\n{} {}\n", "Error:".red().bold(), outcome.response));
        }

        output.push_str(&format!(
            "\n{}\n",
            format!("Completed in {} ms", outcome.duration_ms).dimmed()
        ));
        output.push_str(&Self::footer());

        output
    }

    pub fn format_json(outcome: &TurnOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Response plus a line per artifact
    pub fn format_summary(outcome: &TurnOutcome) -> String {
        let mut output = if outcome.success {
            outcome.response.clone()
        } else {
            format!("{} {}", "Error:".red().bold(), outcome.response)
        };
        output.push('\n');

        let artifacts = outcome
            .result
            .iter()
            .flat_map(|r| r.artifacts.iter())
            .filter_map(|a| a.path.as_deref().map(|p| (a.artifact_type, p)));
        for (artifact_type, path) in artifacts {
            output.push_str(&format!("{} {}\n", format!("[{}]", artifact_type).dimmed(), path));
        }

        output
    }

    fn plan_section(plan: &ExecutionPlan) -> String {
        let mut output = Self::section_header(&format!("Plan ({} steps)", plan.steps.len()));
        for step in &plan.steps {
            let deps = if step.dependencies.is_empty() {
                String::new()
            } else {
                let ids: Vec<&str> = step.dependencies.iter().map(|d| d.as_str()).collect();
                format!(" after {}", ids.join(", "))
            };
            output.push_str(&format!(
                "  {} {} {}{}\n",
                format!("{}.", step.id).bold(),
                format!("[{}]", step.action.kind()).yellow(),
                step.description,
                deps.dimmed()
            ));
        }
        output
    }

    fn result_section(result: &ExecutionResult) -> String {
        let mut output = Self::section_header("Result");
        let status = if result.success {
            "success".green().bold()
        } else {
            "failed".red().bold()
        };
        output.push_str(&format!(
            "  {} {} ({}/{} steps, {} ms)\n",
            "Status:".bold(),
            status,
            result.steps_completed,
            result.total_steps,
            result.duration_ms
        ));
        if let Some(error) = &result.error {
            output.push_str(&format!("  {} {}\n", "Error:".red().bold(), error));
        }
        if !result.artifacts.is_empty() {
            output.push_str(&format!("  {}\n", "Artifacts:".bold()));
            for artifact in &result.artifacts {
                output.push_str(&format!(
                    "    * {} {}\n",
                    format!("[{}]", artifact.artifact_type).yellow(),
                    artifact.path.as_deref().unwrap_or("(inline)")
                ));
            }
        }
        output
    }

    fn project_section(project: &GeneratedProject) -> String {
        let analysis = &project.analysis;
        let mut output = Self::section_header(&format!("Project: {}", analysis.name));
        output.push_str(&format!(
            "  {} ({}, {} files, {} dependencies)\n",
            analysis.description,
            analysis.project_type,
            analysis.files.len(),
            analysis.dependencies.len()
        ));
        let verdict = if project.match_result.matches {
            "matches request".green()
        } else {
            "does not match request".yellow()
        };
        output.push_str(&format!(
            "  {} {} ({:.0}%){}\n",
            "Match:".bold(),
            verdict,
            project.match_result.confidence * 100.0,
            if project.regenerated { ", regenerated" } else { "" }
        ));
        if !analysis.run_command.is_empty() {
            output.push_str(&format!("  {} {}\n", "Run:".bold(), analysis.run_command));
        }
        if let Some(dir) = &project.written_to {
            output.push_str(&format!("  {} {}\n", "Written to:".bold(), dir.display()));
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("{}\n", "=".repeat(60).cyan())
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, outcome: &TurnOutcome) -> String {
        Self::format(outcome)
    }

    fn format_json(&self, outcome: &TurnOutcome) -> String {
        Self::format_json(outcome)
    }

    fn format_summary(&self, outcome: &TurnOutcome) -> String {
        Self::format_summary(outcome)
    }
}
