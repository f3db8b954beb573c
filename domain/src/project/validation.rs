//! Completeness rules for generated projects.
//!
//! Every rule is checked and every violation reported, so a retry prompt can
//! list all of them at once.

use super::entities::{ProjectAnalysis, ProjectFile};
use thiserror::Error;

pub const MIN_FILES: usize = 10;
pub const MIN_CONTENT_CHARS: usize = 50;
pub const MIN_FOLDER_ENTRIES: usize = 3;

/// Markers that betray an unfinished file. Matched case-sensitively.
pub const PLACEHOLDER_MARKERS: &[&str] = &["TODO", "PLACEHOLDER"];

/// File names that count as a dependency manifest
pub const MANIFEST_FILES: &[&str] = &[
    "package.json",
    "cargo.toml",
    "requirements.txt",
    "pyproject.toml",
    "go.mod",
];

const ENTRY_STEMS: &[&str] = &["main", "index", "app", "server"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Project validation failed: {}", violations.join("; "))]
pub struct ProjectValidationError {
    pub violations: Vec<String>,
}

fn is_entry_file(file: &ProjectFile) -> bool {
    let in_entry_dir = matches!(file.parent_dir(), None | Some("src"));
    let name = file.file_name();
    let has_entry_stem = name
        .split_once('.')
        .is_some_and(|(stem, ext)| ENTRY_STEMS.contains(&stem) && !ext.is_empty());
    in_entry_dir && has_entry_stem
}

fn file_violations(file: &ProjectFile) -> Vec<String> {
    let mut out = Vec::new();
    if let Some(marker) = PLACEHOLDER_MARKERS.iter().find(|m| file.content.contains(*m)) {
        out.push(format!("File '{}' contains placeholder marker '{}'", file.path, marker));
    }
    let chars = file.content.trim().chars().count();
    if chars < MIN_CONTENT_CHARS {
        out.push(format!(
            "File '{}' is nearly empty ({} chars, minimum {})",
            file.path, chars, MIN_CONTENT_CHARS
        ));
    }
    out
}

/// List every violated rule; empty when the project is acceptable.
pub fn project_violations(project: &ProjectAnalysis) -> Vec<String> {
    let mut violations = Vec::new();

    if project.files.len() < MIN_FILES {
        violations.push(format!(
            "Only {} files generated (minimum {})",
            project.files.len(),
            MIN_FILES
        ));
    }

    violations.extend(project.files.iter().flat_map(file_violations));

    if !project
        .files
        .iter()
        .any(|f| MANIFEST_FILES.contains(&f.file_name().as_str()))
    {
        violations.push(format!(
            "Missing manifest file (one of {})",
            MANIFEST_FILES.join(", ")
        ));
    }

    if !project.files.iter().any(is_entry_file) {
        violations.push("Missing main entry file (main.*, index.*, app.* or server.*)".to_string());
    }

    if !project.files.iter().any(|f| f.file_name().starts_with("readme")) {
        violations.push("Missing README".to_string());
    }

    if project.dependencies.is_empty() {
        violations.push("No dependencies declared".to_string());
    }

    if project.folder_structure.len() < MIN_FOLDER_ENTRIES {
        violations.push(format!(
            "Folder structure has {} entries (minimum {})",
            project.folder_structure.len(),
            MIN_FOLDER_ENTRIES
        ));
    }

    violations
}

/// Check all completeness rules.
pub fn validate_project(project: &ProjectAnalysis) -> Result<(), ProjectValidationError> {
    let violations = project_violations(project);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ProjectValidationError { violations })
    }
}
