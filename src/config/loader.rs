// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration loading from files.
//!
//! Handles loading configuration from JSON and YAML files in various locations.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

use super::types::ConfigFile;

/// Config file names to search for (in order).
pub const CONFIG_FILES: &[&str] = &[
    ".loggable.json",
    ".loggable.yaml",
    ".loggable.yml",
    "loggable.config.json",
];

/// Local config file name (for per-directory overrides).
pub const LOCAL_CONFIG_FILE: &str = ".loggable.local.json";

/// Global config directory name.
pub const GLOBAL_CONFIG_DIR: &str = ".loggable";

/// Global config file name.
pub const GLOBAL_CONFIG_FILE: &str = "config.json";

/// Get the global config directory path.
pub fn get_global_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(GLOBAL_CONFIG_DIR))
}

/// Get the global config file path.
pub fn get_global_config_path() -> Option<PathBuf> {
    get_global_config_dir().map(|dir| dir.join(GLOBAL_CONFIG_FILE))
}

/// Load global configuration from ~/.loggable/config.json.
pub fn load_global_config() -> Result<Option<ConfigFile>, ConfigError> {
    let path = match get_global_config_path() {
        Some(p) => p,
        None => return Ok(None),
    };

    if !path.exists() {
        return Ok(None);
    }

    load_config_file(&path).map(Some)
}

/// Load workspace configuration from the workspace root.
///
/// The first file of [`CONFIG_FILES`] that exists wins.
pub fn load_workspace_config(workspace_root: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    for filename in CONFIG_FILES {
        let path = workspace_root.join(filename);
        if path.exists() {
            tracing::debug!(path = %path.display(), "loading workspace config");
            return load_config_file(&path).map(Some);
        }
    }
    Ok(None)
}

/// Load local configuration from .loggable.local.json.
pub fn load_local_config(workspace_root: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let path = workspace_root.join(LOCAL_CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Load a configuration file (JSON or YAML, by extension).
pub fn load_config_file(path: &Path) -> Result<ConfigFile, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::from_str(&content).map_err(ConfigError::from),
        _ => serde_json::from_str(&content).map_err(ConfigError::from),
    }
}

/// Save a configuration file as pretty JSON.
pub fn save_config_file(path: &Path, config: &ConfigFile) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_config() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(".loggable.json"),
            r#"{"disabled": true, "types": {"app::Repo": {"timing": [{"threshold": 10}]}}}"#,
        )
        .unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.disabled, Some(true));
        assert_eq!(config.types.unwrap()["app::Repo"].timing.len(), 1);
    }

    #[test]
    fn test_load_yaml_config() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".loggable.yaml"), "disabled: false\n").unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.disabled, Some(false));
        assert!(config.types.is_none());
    }

    #[test]
    fn test_search_order() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".loggable.json"), r#"{"disabled": true}"#).unwrap();
        fs::write(temp.path().join("loggable.config.json"), r#"{"disabled": false}"#).unwrap();

        let config = load_workspace_config(temp.path()).unwrap().unwrap();
        assert_eq!(config.disabled, Some(true));
    }

    #[test]
    fn test_missing_configs() {
        let temp = TempDir::new().unwrap();
        assert!(load_workspace_config(temp.path()).unwrap().is_none());
        assert!(load_local_config(temp.path()).unwrap().is_none());
        assert!(matches!(
            load_config_file(&temp.path().join("nope.json")),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(".loggable.json");
        fs::write(&path, r#"{"disabled": "sometimes"}"#).unwrap();
        assert!(matches!(load_config_file(&path), Err(ConfigError::JsonError(_))));

        let yaml = temp.path().join("bad.yaml");
        fs::write(&yaml, "types: [1, 2").unwrap();
        assert!(matches!(load_config_file(&yaml), Err(ConfigError::YamlError(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCAL_CONFIG_FILE);
        let config = ConfigFile {
            disabled: Some(true),
            types: None,
        };
        save_config_file(&path, &config).unwrap();

        let loaded = load_local_config(temp.path()).unwrap().unwrap();
        assert_eq!(loaded.disabled, Some(true));
    }

    #[test]
    fn test_global_config_path() {
        if let Some(path) = get_global_config_path() {
            assert!(path.ends_with(".loggable/config.json"));
        }
    }
}
