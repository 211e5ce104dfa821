// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration type definitions.
//!
//! Config files are JSON or YAML with camelCase keys:
//!
//! ```yaml
//! disabled: false
//! types:
//!   app::repo::UserRepo:
//!     timing:
//!       - { threshold: 100, severity: INFO }
//!       - { threshold: 500, severity: WARNING, prefix: "slow: " }
//!     error: { severity: SEVERE }
//!     methods:
//!       find_by_email:
//!         error: { severity: WARNING, includeTrace: false }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::directive::{validate_timing_directives, ErrorDirective, TimingDirective};
use crate::error::ConfigError;

/// Directives declared on a single method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDirectives {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timing: Vec<TimingDirective>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDirective>,
}

/// Directives declared on a type, plus per-method overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeDirectives {
    /// Timing directives applying to every method without its own.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timing: Vec<TimingDirective>,

    /// Error directive applying to every method without its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDirective>,

    /// Method-level directives keyed by method name.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub methods: HashMap<String, MethodDirectives>,
}

/// One configuration file as written on disk. Every field is optional so
/// that files can be layered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Disable all interception.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<bool>,

    /// Directives keyed by owning type name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<HashMap<String, TypeDirectives>>,
}

/// Fully merged configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentationConfig {
    /// When true the interceptor runs wrapped calls untouched.
    #[serde(default)]
    pub disabled: bool,

    /// Directives keyed by owning type name.
    #[serde(default)]
    pub types: HashMap<String, TypeDirectives>,
}

impl InstrumentationConfig {
    /// Check whether interception is enabled.
    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    /// Reject timing directive lists that repeat a threshold.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (owner, directives) in &self.types {
            validate_timing_directives(&directives.timing).map_err(|source| {
                ConfigError::InvalidDirectives {
                    owner: owner.clone(),
                    source,
                }
            })?;

            for (method, method_directives) in &directives.methods {
                validate_timing_directives(&method_directives.timing).map_err(|source| {
                    ConfigError::InvalidDirectives {
                        owner: format!("{}::{}", owner, method),
                        source,
                    }
                })?;
            }
        }
        Ok(())
    }
}
