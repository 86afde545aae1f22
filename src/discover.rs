// src/discover.rs

//! Environment discovery: repository root, make root, projects and tool paths.

use std::fs;
use std::path::{Path, PathBuf};

use globset::Glob;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::PathsSection;
use crate::errors::{Result, TestbenchError};

/// Top level of the git repository containing the current directory.
pub async fn repo_root() -> Result<PathBuf> {
    repo_root_in(Path::new(".")).await
}

/// Top level of the git repository containing `dir`.
///
/// Any failure (git missing, not a repository, empty output) is reported as
/// [`TestbenchError::NotInRepository`].
pub async fn repo_root_in(dir: &Path) -> Result<PathBuf> {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--show-toplevel"])
        .output()
        .await
        .map_err(|e| TestbenchError::NotInRepository(format!("running git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TestbenchError::NotInRepository(stderr.trim().to_string()));
    }

    let root = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if root.is_empty() {
        return Err(TestbenchError::NotInRepository(
            "git printed an empty top level".to_string(),
        ));
    }

    debug!(root = %root, "found repository root");
    Ok(PathBuf::from(root))
}

pub fn make_root(repo_root: &Path, paths: &PathsSection) -> PathBuf {
    repo_root.join(&paths.code_dir)
}

/// Names of the directories directly under `make_root` matching `pattern`, sorted.
pub fn list_projects(make_root: &Path, pattern: &str) -> Result<Vec<String>> {
    if !make_root.is_dir() {
        return Err(TestbenchError::MissingMakeRoot(make_root.to_path_buf()));
    }

    let matcher = Glob::new(pattern)
        .map_err(|e| {
            TestbenchError::ConfigError(format!("invalid [paths].project_glob '{pattern}': {e}"))
        })?
        .compile_matcher();

    let mut projects = Vec::new();
    for entry in fs::read_dir(make_root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if matcher.is_match(&name) {
            projects.push(name);
        }
    }
    projects.sort();

    if projects.is_empty() {
        return Err(TestbenchError::NoProjects {
            pattern: pattern.to_string(),
            root: make_root.to_path_buf(),
        });
    }
    Ok(projects)
}

/// Check `requested` against the discovered project names.
pub fn select_project(requested: &str, available: &[String]) -> Result<String> {
    if available.iter().any(|p| p == requested) {
        Ok(requested.to_string())
    } else {
        Err(TestbenchError::UnknownProject {
            name: requested.to_string(),
            available: available.to_vec(),
        })
    }
}

/// Project used when `-p` is not given.
pub const DEFAULT_PROJECT: &str = "kernel";

/// Pick the project for the debugger from the `-p` value and the discovery
/// result, returning it with the discovered names.
///
/// An explicit project must be among the discovered ones. The default is
/// used even when discovery fails or does not list it; that only warns.
pub fn resolve_project(
    requested: Option<&str>,
    discovered: Result<Vec<String>>,
) -> Result<(String, Vec<String>)> {
    match requested {
        Some(name) => {
            let available = discovered?;
            let project = select_project(name, &available)?;
            Ok((project, available))
        }
        None => {
            let available = match discovered {
                Ok(available) => available,
                Err(err) => {
                    warn!(
                        error = %err,
                        project = DEFAULT_PROJECT,
                        "project discovery failed; using default"
                    );
                    Vec::new()
                }
            };
            if !available.is_empty() && !available.iter().any(|p| p == DEFAULT_PROJECT) {
                warn!(
                    project = DEFAULT_PROJECT,
                    available = ?available,
                    "default project not found under make root"
                );
            }
            Ok((DEFAULT_PROJECT.to_string(), available))
        }
    }
}

/// Resolve a configured tool location.
///
/// Absolute paths are kept, paths with a separator are taken relative to the
/// repository root, and bare names are left for `PATH` lookup at spawn time.
pub fn resolve_tool(program: &str, repo_root: &Path) -> PathBuf {
    let path = Path::new(program);
    if path.is_absolute() || path.components().count() <= 1 {
        path.to_path_buf()
    } else {
        repo_root.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_tool_names_stay_bare() {
        let root = Path::new("/work/lab");
        assert_eq!(resolve_tool("ftditerm.py", root), PathBuf::from("ftditerm.py"));
    }

    #[test]
    fn relative_tool_paths_are_repo_relative() {
        let root = Path::new("/work/lab");
        assert_eq!(
            resolve_tool("tools/ftditerm/ftditerm.py", root),
            PathBuf::from("/work/lab/tools/ftditerm/ftditerm.py")
        );
        assert_eq!(
            resolve_tool("/opt/ftditerm.py", root),
            PathBuf::from("/opt/ftditerm.py")
        );
    }

    #[test]
    fn unknown_project_lists_alternatives() {
        let available = vec!["kernel".to_string(), "kernel_lab2".to_string()];
        let err = select_project("kernal", &available).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown project 'kernal' (available: kernel, kernel_lab2)"
        );
        assert_eq!(select_project("kernel_lab2", &available).unwrap(), "kernel_lab2");
    }
}
