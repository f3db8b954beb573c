//! Output configuration from TOML (`[output]` section)

use deskpilot_domain::{ConfigIssue, ConfigIssueCode, OutputFormat};
use serde::{Deserialize, Serialize};

/// Raw output configuration from TOML
///
/// `format` stays a string so an unknown value is reported as an issue
/// instead of failing the whole load.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Output format: "full", "summary" or "json"
    pub format: Option<String>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

impl FileOutputConfig {
    /// Parse `format`, falling back to the default on unknown values.
    pub fn parse_format(&self) -> (Option<OutputFormat>, Vec<ConfigIssue>) {
        let Some(raw) = &self.format else {
            return (None, Vec::new());
        };
        match raw.parse::<OutputFormat>() {
            Ok(format) => (Some(format), Vec::new()),
            Err(_) => (
                None,
                vec![ConfigIssue::warning(
                    ConfigIssueCode::UnknownOutputFormat,
                    format!(
                        "output.format: unknown value '{}', falling back to '{}'",
                        raw,
                        OutputFormat::default()
                    ),
                )],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_deserialize() {
        let toml_str = r#"
[output]
format = "json"
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.output.parse_format().0, Some(OutputFormat::Json));
    }

    #[test]
    fn test_unknown_format_is_a_warning() {
        let config = FileOutputConfig {
            format: Some("yaml".to_string()),
            color: true,
        };
        let (format, issues) = config.parse_format();
        assert_eq!(format, None);
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
