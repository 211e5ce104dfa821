// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Directive records attached to call sites.
//!
//! A directive is declared once (in code or in a config file) and is
//! read-only afterwards. Timing directives are repeatable: a single method
//! may carry several of them, one per threshold tier. Error directives are
//! singular per level.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::DirectiveError;
use crate::severity::Severity;

/// Minimum elapsed time a call must exceed before a timing directive applies.
///
/// `Always` sorts below every `Millis` value, so a concrete threshold that
/// was exceeded always wins over the catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Threshold {
    /// Log every call regardless of duration.
    Always,
    /// Log only calls strictly slower than this many milliseconds.
    Millis(u64),
}

impl Threshold {
    /// Check whether a call of `elapsed_ms` qualifies (strict comparison).
    pub fn is_exceeded_by(&self, elapsed_ms: u64) -> bool {
        match self {
            Self::Always => true,
            Self::Millis(limit) => *limit < elapsed_ms,
        }
    }

    /// The concrete limit, if any.
    pub fn millis(&self) -> Option<u64> {
        match self {
            Self::Always => None,
            Self::Millis(limit) => Some(*limit),
        }
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self::Always
    }
}

impl From<Option<u64>> for Threshold {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Self::Always, Self::Millis)
    }
}

impl From<Threshold> for Option<u64> {
    fn from(value: Threshold) -> Self {
        value.millis()
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Always => f.write_str("always"),
            Self::Millis(limit) => write!(f, "{}ms", limit),
        }
    }
}

/// Execution-time logging directive.
///
/// The default directive (no arguments) logs every call at `Info`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingDirective {
    /// Severity of the emitted record.
    #[serde(default)]
    pub severity: Severity,

    /// Elapsed time that must be exceeded.
    #[serde(default)]
    pub threshold: Threshold,

    /// Text prepended to the record's message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
}

impl TimingDirective {
    /// Create the default directive: always log at `Info`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directive that logs at `severity` once `millis` is exceeded.
    pub fn above(millis: u64, severity: Severity) -> Self {
        Self {
            severity,
            threshold: Threshold::Millis(millis),
            prefix: String::new(),
        }
    }

    /// Set the severity.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Set the threshold.
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the message prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Uncaught-error logging directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDirective {
    /// Severity of the emitted record.
    #[serde(default = "default_error_severity")]
    pub severity: Severity,

    /// Attach the error (and its source chain) to the record.
    #[serde(default = "default_include_trace")]
    pub include_trace: bool,

    /// Text prepended to the record's message.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prefix: String,
}

fn default_error_severity() -> Severity {
    Severity::Severe
}

fn default_include_trace() -> bool {
    true
}

impl Default for ErrorDirective {
    fn default() -> Self {
        Self {
            severity: default_error_severity(),
            include_trace: default_include_trace(),
            prefix: String::new(),
        }
    }
}

impl ErrorDirective {
    /// Create a directive logging at `severity` with the trace attached.
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            ..Self::default()
        }
    }

    /// Attach or omit the error trace.
    pub fn with_trace(mut self, include_trace: bool) -> Self {
        self.include_trace = include_trace;
        self
    }

    /// Set the message prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }
}

/// Reject directive lists that declare the same threshold twice.
///
/// Resolution itself tolerates duplicates (first declared wins), so this is
/// for hosts that want to catch ambiguous declarations up front.
pub fn validate_timing_directives(directives: &[TimingDirective]) -> Result<(), DirectiveError> {
    let mut seen = HashSet::with_capacity(directives.len());
    for directive in directives {
        if !seen.insert(directive.threshold) {
            return Err(DirectiveError::DuplicateThreshold(directive.threshold));
        }
    }
    Ok(())
}
