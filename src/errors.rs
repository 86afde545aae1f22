// src/errors.rs

//! Crate-wide error type.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::plan::Role;

#[derive(Error, Debug)]
pub enum TestbenchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("not inside a git repository: {0}")]
    NotInRepository(String),

    #[error("make root {0:?} does not exist")]
    MissingMakeRoot(PathBuf),

    #[error("no projects matching '{pattern}' under {root:?}")]
    NoProjects { pattern: String, root: PathBuf },

    #[error("unknown project '{name}' (available: {})", .available.join(", "))]
    UnknownProject { name: String, available: Vec<String> },

    #[error("failed to spawn {role} `{program}`: {source}")]
    Spawn {
        role: Role,
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("debug bridge did not report readiness within {0:?}")]
    ReadyTimeout(Duration),

    #[error("debug bridge closed its output after {lines_seen} lines without reporting readiness")]
    BridgeClosed { lines_seen: usize },

    #[error("interrupted by {0}")]
    Interrupted(&'static str),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TestbenchError>;
