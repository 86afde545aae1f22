// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::model::TestbenchConfig;
use crate::config::validate::validate_config;
use crate::errors::Result;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "TESTBENCH_CONFIG";

/// Config file looked up at the repository top level.
pub const DEFAULT_CONFIG_FILE: &str = "Testbench.toml";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization. Use [`load_and_validate`] to also
/// check the values.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<TestbenchConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let config: TestbenchConfig = toml::from_str(&contents)?;
    Ok(config)
}

pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TestbenchConfig> {
    let config = load_from_path(&path)?;
    validate_config(&config)?;
    Ok(config)
}

/// Pick the config file to use.
///
/// Order: explicit `--config`, then `env_path` (from `TESTBENCH_CONFIG`), then
/// `<repo_root>/Testbench.toml` if it exists. `None` means built-in defaults.
pub fn resolve_config_path(
    cli_path: Option<&Path>,
    env_path: Option<PathBuf>,
    repo_root: &Path,
) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }
    if let Some(path) = env_path.filter(|p| !p.as_os_str().is_empty()) {
        return Some(path);
    }
    let candidate = repo_root.join(DEFAULT_CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}

/// Load the config for a session in `repo_root` without validating it, so
/// CLI overrides can be applied first.
///
/// An explicitly named file that cannot be read is an error.
pub fn load_for_repo(cli_path: Option<&Path>, repo_root: &Path) -> Result<TestbenchConfig> {
    let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    match resolve_config_path(cli_path, env_path, repo_root) {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            load_from_path(&path)
        }
        None => {
            debug!("no config file found; using built-in defaults");
            Ok(TestbenchConfig::default())
        }
    }
}
