//! Configuration issues.
//!
//! Produced by the infrastructure config layer when checking a loaded file;
//! the binary prints warnings and refuses to start on errors.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The configuration cannot work.
    Error,
    /// Works, but probably not as intended.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// `generation.max_attempts` is zero
    ZeroAttempts,
    /// A timeout is zero seconds
    ZeroTimeout,
    /// `provider.model` is empty
    EmptyModel,
    /// `output.format` is not a known format
    UnknownOutputFormat,
    /// The API key environment variable is not set
    MissingApiKey,
    /// `provider.temperature` outside 0.0..=2.0
    TemperatureOutOfRange,
}

/// A detected issue in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Whether any issue is fatal
pub fn has_errors(issues: &[ConfigIssue]) -> bool {
    issues.iter().any(ConfigIssue::is_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_errors() {
        let warn = ConfigIssue::warning(ConfigIssueCode::MissingApiKey, "no key");
        let err = ConfigIssue::error(ConfigIssueCode::ZeroAttempts, "zero");
        assert!(!has_errors(&[warn.clone()]));
        assert!(has_errors(&[warn, err]));
        assert!(!has_errors(&[]));
    }
}
