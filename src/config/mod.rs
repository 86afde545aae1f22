// src/config/mod.rs

//! Configuration loading and validation for testbench.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Locate and load a config file from disk (`loader.rs`).
//! - Validate values the launch plan depends on (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{load_and_validate, load_for_repo, load_from_path, resolve_config_path};
pub use model::{
    BridgeSection, DebuggerSection, LaunchSection, PathsSection, ReadinessMode, SerialSection,
    TestbenchConfig,
};
pub use validate::validate_config;
