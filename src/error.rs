// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for loggable.
//!
//! The interception core never raises errors of its own: a wrapped call's
//! error is always handed back to the caller untouched. The types here cover
//! the ambient surfaces (configuration loading and directive validation),
//! using `thiserror` for definitions and `anyhow` for host-side propagation.

use thiserror::Error;

use crate::directive::Threshold;

/// Errors that can occur while validating or parsing directives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectiveError {
    #[error("Duplicate timing threshold: {0}")]
    DuplicateThreshold(Threshold),

    #[error("Unknown severity: {0}")]
    UnknownSeverity(String),
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Invalid directives for {owner}: {source}")]
    InvalidDirectives {
        owner: String,
        #[source]
        source: DirectiveError,
    },

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),

    #[error("JSON parsing error: {0}")]
    JsonError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for host-side error handling.
pub type Result<T> = anyhow::Result<T>;
