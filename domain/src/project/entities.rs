//! Project generation entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One file of a generated project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub purpose: String,
}

impl ProjectFile {
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        purpose: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            purpose: purpose.into(),
        }
    }

    /// File name without directories, lower-cased
    pub fn file_name(&self) -> String {
        self.path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.path)
            .to_lowercase()
    }

    /// Parent directory, `None` for files at the project root
    pub fn parent_dir(&self) -> Option<&str> {
        let trimmed = self.path.trim_start_matches("./");
        trimmed.rfind('/').map(|i| &trimmed[..i])
    }
}

/// A candidate project produced by the generator (or the fallback).
///
/// Transient: validated, then accepted or discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectAnalysis {
    pub name: String,
    #[serde(rename = "type", default)]
    pub project_type: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub dev_dependencies: BTreeMap<String, String>,
    #[serde(default)]
    pub files: Vec<ProjectFile>,
    #[serde(default)]
    pub folder_structure: Vec<String>,
    #[serde(default)]
    pub setup_commands: Vec<String>,
    #[serde(default)]
    pub run_command: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_needed: Option<u16>,
    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,
}

impl ProjectAnalysis {
    pub fn new(name: impl Into<String>, project_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            project_type: project_type.into(),
            description: String::new(),
            dependencies: BTreeMap::new(),
            dev_dependencies: BTreeMap::new(),
            files: Vec::new(),
            folder_structure: Vec::new(),
            setup_commands: Vec::new(),
            run_command: String::new(),
            port_needed: None,
            environment_variables: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), version.into());
        self
    }

    pub fn with_file(mut self, file: ProjectFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn has_file(&self, file_name: &str) -> bool {
        let wanted = file_name.to_lowercase();
        self.files.iter().any(|f| f.file_name() == wanted)
    }

    pub fn total_bytes(&self) -> usize {
        self.files.iter().map(|f| f.content.len()).sum()
    }
}

/// What the user asked to have built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRequest {
    /// The user's own words
    pub text: String,
    /// Ask the generator to name the project strictly after the request
    #[serde(default)]
    pub strict_name: bool,
}

impl ProjectRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            strict_name: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict_name = true;
        self
    }
}
