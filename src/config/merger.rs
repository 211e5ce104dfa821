// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration merging.
//!
//! Handles merging configurations from different sources with proper precedence.

use crate::error::ConfigError;

use super::types::{ConfigFile, InstrumentationConfig};

/// Environment variable that disables all interception.
pub const DISABLED_ENV_VAR: &str = "LOGGABLE_DISABLED";

/// Environment overrides.
#[derive(Debug, Clone, Default)]
pub struct EnvOptions {
    pub disabled: Option<bool>,
}

impl EnvOptions {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read overrides from an explicit set of variables.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in vars {
            if key.as_ref() == DISABLED_ENV_VAR {
                options.disabled = Some(parse_bool(DISABLED_ENV_VAR, value.as_ref())?);
            }
        }
        Ok(options)
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            message: format!("expected a boolean, got '{}'", other),
        }),
    }
}

/// Merge multiple configurations with precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment
/// 2. Local config (.loggable.local.json)
/// 3. Workspace config (.loggable.json)
/// 4. Global config (~/.loggable/config.json)
/// 5. Default values
///
/// Type entries are replaced whole: a type declared in the local file
/// hides the workspace file's entry for that type.
pub fn merge_config(
    global: Option<ConfigFile>,
    workspace: Option<ConfigFile>,
    local: Option<ConfigFile>,
    env: EnvOptions,
) -> InstrumentationConfig {
    let mut result = InstrumentationConfig::default();

    for config in [global, workspace, local].into_iter().flatten() {
        apply_config_file(&mut result, config);
    }

    if let Some(disabled) = env.disabled {
        result.disabled = disabled;
    }

    result
}

fn apply_config_file(result: &mut InstrumentationConfig, config: ConfigFile) {
    if let Some(disabled) = config.disabled {
        result.disabled = disabled;
    }

    if let Some(types) = config.types {
        result.types.extend(types);
    }
}
