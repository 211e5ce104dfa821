// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Severity tiers for emitted records.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DirectiveError;

/// Ordered logging-importance level.
///
/// Ordering runs from least to most important: `Finest < Finer < Fine <
/// Config < Info < Warning < Severe`. [`Severity::Off`] is a sentinel that
/// never logs and sorts below every real tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Never log.
    Off,
    Finest,
    Finer,
    Fine,
    Config,
    Info,
    Warning,
    Severe,
}

impl Severity {
    /// All real tiers, most important first.
    pub const TIERS: [Severity; 7] = [
        Self::Severe,
        Self::Warning,
        Self::Info,
        Self::Config,
        Self::Fine,
        Self::Finer,
        Self::Finest,
    ];

    /// Returns the canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Finest => "FINEST",
            Self::Finer => "FINER",
            Self::Fine => "FINE",
            Self::Config => "CONFIG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Severe => "SEVERE",
        }
    }

    /// Check if this is the "never log" sentinel.
    pub fn is_off(&self) -> bool {
        matches!(self, Self::Off)
    }

    /// The `tracing` level a record of this severity is emitted at.
    ///
    /// Returns `None` for [`Severity::Off`].
    pub fn to_level(&self) -> Option<tracing::Level> {
        match self {
            Self::Off => None,
            Self::Severe => Some(tracing::Level::ERROR),
            Self::Warning => Some(tracing::Level::WARN),
            Self::Info | Self::Config => Some(tracing::Level::INFO),
            Self::Fine | Self::Finer => Some(tracing::Level::DEBUG),
            Self::Finest => Some(tracing::Level::TRACE),
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = DirectiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "OFF" | "NONE" => Ok(Self::Off),
            "FINEST" | "TRACE" => Ok(Self::Finest),
            "FINER" => Ok(Self::Finer),
            "FINE" | "DEBUG" => Ok(Self::Fine),
            "CONFIG" => Ok(Self::Config),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "SEVERE" | "ERROR" => Ok(Self::Severe),
            _ => Err(DirectiveError::UnknownSeverity(s.to_string())),
        }
    }
}
