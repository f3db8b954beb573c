//! Deterministic enhancement of an accepted project.
//!
//! Fills gaps a generator commonly leaves: folder structure, dev
//! dependencies, README, `.gitignore` and `.env.example`. Never removes or
//! overwrites anything the generator produced.

use super::entities::{ProjectAnalysis, ProjectFile};

/// Broad project family, used to pick defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Node,
    Python,
    Rust,
    Go,
    Other,
}

impl ProjectKind {
    pub fn detect(project: &ProjectAnalysis) -> Self {
        let ty = project.project_type.to_lowercase();
        let by_type = match ty.as_str() {
            t if ["node", "express", "react", "vue", "next", "javascript", "typescript", "web"]
                .iter()
                .any(|k| t.contains(k)) =>
            {
                Some(ProjectKind::Node)
            }
            t if ["python", "flask", "django", "fastapi"].iter().any(|k| t.contains(k)) => {
                Some(ProjectKind::Python)
            }
            t if t.contains("rust") => Some(ProjectKind::Rust),
            "go" | "golang" => Some(ProjectKind::Go),
            _ => None,
        };
        if let Some(kind) = by_type {
            return kind;
        }

        if project.has_file("package.json") {
            ProjectKind::Node
        } else if project.has_file("requirements.txt") || project.has_file("pyproject.toml") {
            ProjectKind::Python
        } else if project.has_file("cargo.toml") {
            ProjectKind::Rust
        } else if project.has_file("go.mod") {
            ProjectKind::Go
        } else {
            ProjectKind::Other
        }
    }

    fn default_folders(&self) -> &'static [&'static str] {
        match self {
            ProjectKind::Node => &["src", "public", "tests"],
            ProjectKind::Python => &["app", "tests", "static"],
            ProjectKind::Rust => &["src", "tests", "docs"],
            ProjectKind::Go => &["cmd", "internal", "pkg"],
            ProjectKind::Other => &["src", "tests", "docs"],
        }
    }

    fn default_dev_dependencies(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ProjectKind::Node => &[("nodemon", "^3.0.2"), ("jest", "^29.7.0")],
            ProjectKind::Python => &[("pytest", ">=7.4"), ("black", ">=23.0")],
            _ => &[],
        }
    }

    fn gitignore(&self) -> &'static str {
        match self {
            ProjectKind::Node => concat!(
                "node_modules/\n",
                "npm-debug.log*\n",
                ".env\n",
                ".env.local\n",
                "dist/\n",
                "coverage/\n",
                ".DS_Store\n",
            ),
            ProjectKind::Python => concat!(
                "__pycache__/\n",
                "*.py[cod]\n",
                ".venv/\n",
                "venv/\n",
                ".env\n",
                ".pytest_cache/\n",
                "dist/\n",
                ".DS_Store\n",
            ),
            ProjectKind::Rust => concat!(
                "/target\n",
                "**/*.rs.bk\n",
                ".env\n",
                ".idea/\n",
                ".vscode/\n",
                "*.swp\n",
                ".DS_Store\n",
                "Cargo.lock.bak\n",
            ),
            ProjectKind::Go => concat!(
                "/bin/\n",
                "*.exe\n",
                "*.test\n",
                "*.out\n",
                "vendor/\n",
                ".env\n",
                ".idea/\n",
                ".vscode/\n",
                ".DS_Store\n",
            ),
            ProjectKind::Other => concat!(
                "# Build output\n",
                "build/\n",
                "dist/\n",
                "\n",
                "# Environment\n",
                ".env\n",
                "\n",
                "# Editors\n",
                ".idea/\n",
                ".vscode/\n",
                ".DS_Store\n",
            ),
        }
    }
}

fn render_readme(project: &ProjectAnalysis) -> String {
    let mut readme = format!("# {}\n\n", project.name);
    if project.description.trim().is_empty() {
        readme.push_str(&format!("A {} project.\n", project.project_type));
    } else {
        readme.push_str(project.description.trim());
        readme.push('\n');
    }

    readme.push_str("\n## Getting started\n\n```sh\n");
    for command in &project.setup_commands {
        readme.push_str(command);
        readme.push('\n');
    }
    if !project.run_command.is_empty() {
        readme.push_str(&project.run_command);
        readme.push('\n');
    }
    readme.push_str("```\n");

    if let Some(port) = project.port_needed {
        readme.push_str(&format!("\nThe app listens on http://localhost:{}.\n", port));
    }
    readme
}

fn render_env_example(project: &ProjectAnalysis) -> String {
    let mut env = String::from("# Copy this file to .env and adjust the values for your machine\n");
    if project.environment_variables.is_empty() {
        env.push_str(&format!("PORT={}\n", project.port_needed.unwrap_or(3000)));
    } else {
        for (key, value) in &project.environment_variables {
            env.push_str(&format!("{}={}\n", key, value));
        }
    }
    env
}

fn merge_folders(project: &mut ProjectAnalysis, kind: ProjectKind) {
    let mut folders = std::mem::take(&mut project.folder_structure);

    let mut push = |folder: &str| {
        let folder = folder.trim_matches('/');
        if !folder.is_empty() && !folders.iter().any(|f| f.trim_matches('/') == folder) {
            folders.push(folder.to_string());
        }
    };

    for file in &project.files {
        if let Some(parent) = file.parent_dir() {
            // Include every ancestor: src/routes/api -> src, src/routes, src/routes/api
            let mut acc = String::new();
            for part in parent.split('/') {
                if !acc.is_empty() {
                    acc.push('/');
                }
                acc.push_str(part);
                push(&acc);
            }
        }
    }
    for folder in kind.default_folders() {
        push(folder);
    }

    project.folder_structure = folders;
}

/// Apply the enhancement pass. Returns the paths of files it added.
pub fn enhance_project(project: &mut ProjectAnalysis) -> Vec<String> {
    let kind = ProjectKind::detect(project);

    merge_folders(project, kind);

    for (name, version) in kind.default_dev_dependencies() {
        if !project.dependencies.contains_key(*name) {
            project
                .dev_dependencies
                .entry((*name).to_string())
                .or_insert_with(|| (*version).to_string());
        }
    }

    let mut added = Vec::new();

    if !project.files.iter().any(|f| f.file_name().starts_with("readme")) {
        let readme = render_readme(project);
        project.files.push(ProjectFile::new(
            "README.md",
            readme,
            "Project overview and setup instructions",
        ));
        added.push("README.md".to_string());
    }
    if !project.has_file(".gitignore") {
        project.files.push(ProjectFile::new(
            ".gitignore",
            kind.gitignore(),
            "Files excluded from version control",
        ));
        added.push(".gitignore".to_string());
    }
    if !project.has_file(".env.example") {
        let env = render_env_example(project);
        project.files.push(ProjectFile::new(".env.example", env, "Environment variable template"));
        added.push(".env.example".to_string());
    }

    added
}
