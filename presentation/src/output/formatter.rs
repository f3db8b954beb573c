//! Output formatter trait

use deskpilot_application::TurnOutcome;
use deskpilot_domain::OutputFormat;

/// Trait for formatting turn outcomes
pub trait OutputFormatter {
    /// Intent, plan, step results, artifacts and project details
    fn format(&self, outcome: &TurnOutcome) -> String;

    fn format_json(&self, outcome: &TurnOutcome) -> String;

    /// Only the response (concise output)
    fn format_summary(&self, outcome: &TurnOutcome) -> String;

    fn render(&self, outcome: &TurnOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Full => self.format(outcome),
            OutputFormat::Summary => self.format_summary(outcome),
            OutputFormat::Json => self.format_json(outcome),
        }
    }
}
