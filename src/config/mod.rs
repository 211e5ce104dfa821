// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration module for loggable.
//!
//! Handles loading, merging, and validation of configuration from multiple sources:
//! - Global config: ~/.loggable/config.json
//! - Workspace config: .loggable.json, .loggable.yaml, or loggable.config.json
//! - Local config: .loggable.local.json (gitignored, for personal overrides)
//! - Environment: `LOGGABLE_DISABLED`
//!
//! Configuration is merged with precedence (env > local > workspace > global > defaults).

mod catalog;
mod loader;
mod merger;
mod types;

pub use catalog::DirectiveCatalog;

pub use loader::{
    get_global_config_dir, get_global_config_path, load_config_file, load_global_config,
    load_local_config, load_workspace_config, save_config_file, CONFIG_FILES, GLOBAL_CONFIG_DIR,
    GLOBAL_CONFIG_FILE, LOCAL_CONFIG_FILE,
};

pub use merger::{merge_config, EnvOptions, DISABLED_ENV_VAR};

pub use types::{ConfigFile, InstrumentationConfig, MethodDirectives, TypeDirectives};

use crate::error::ConfigError;
use std::path::Path;

/// Load, merge and validate all configuration sources for a workspace.
///
/// This is the main entry point for configuration loading.
pub fn load_config(workspace_root: &Path, env: EnvOptions) -> Result<InstrumentationConfig, ConfigError> {
    let global = load_global_config()?;
    let workspace = load_workspace_config(workspace_root)?;
    let local = load_local_config(workspace_root)?;

    let config = merge_config(global, workspace, local, env);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_with_no_files() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), EnvOptions::default());
        assert!(result.is_ok());
    }

    #[test]
    fn test_load_config_local_overrides_workspace() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".loggable.json"), r#"{"disabled": true}"#).unwrap();
        std::fs::write(temp.path().join(LOCAL_CONFIG_FILE), r#"{"disabled": false}"#).unwrap();

        let config = load_config(temp.path(), EnvOptions::default()).unwrap();
        assert!(!config.disabled);
    }

    #[test]
    fn test_load_config_env_override() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(".loggable.json"), r#"{"disabled": false}"#).unwrap();

        let env = EnvOptions {
            disabled: Some(true),
        };
        let config = load_config(temp.path(), env).unwrap();
        assert!(config.disabled); // env wins
    }

    #[test]
    fn test_load_config_rejects_duplicate_thresholds() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join(".loggable.json"),
            r#"{"types": {"Repo": {"timing": [{"threshold": 5}, {"threshold": 5, "severity": "WARNING"}]}}}"#,
        )
        .unwrap();

        let result = load_config(temp.path(), EnvOptions::default());
        assert!(matches!(result, Err(ConfigError::InvalidDirectives { .. })));
    }
}
