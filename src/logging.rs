// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Subscriber setup for the records [`TracingSink`](crate::sink::TracingSink)
//! emits.
//!
//! Libraries using loggable should leave subscriber installation to the
//! application; this is a convenience for binaries and tests.

use std::io;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::severity::Severity;

/// Line layout for printed records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per record.
    #[default]
    Compact,
    /// Multi-line output with fields on their own lines.
    Pretty,
}

/// How records are filtered and printed.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Lowest tier printed when neither `filter` nor `RUST_LOG` is set.
    /// Tiers sharing a `tracing` level pass together, so `Config` lets
    /// `Info` through and `Finer` lets `Fine` through.
    pub min_severity: Severity,
    /// `EnvFilter` directive; wins over `RUST_LOG` and `min_severity`.
    pub filter: Option<String>,
    pub format: LogFormat,
    pub ansi: bool,
    /// Print the event target and source location.
    pub show_origin: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            min_severity: Severity::Info,
            filter: None,
            format: LogFormat::Compact,
            ansi: true,
            show_origin: false,
        }
    }
}

impl LoggingConfig {
    /// Down to `Fine`, pretty-printed with origins.
    pub fn verbose() -> Self {
        Self {
            min_severity: Severity::Fine,
            format: LogFormat::Pretty,
            show_origin: true,
            ..Self::default()
        }
    }

    /// `Warning` and `Severe` only, plain compact lines.
    pub fn quiet() -> Self {
        Self {
            min_severity: Severity::Warning,
            ansi: false,
            ..Self::default()
        }
    }

    /// Every tier this crate emits, uncolored.
    pub fn capture() -> Self {
        Self {
            min_severity: Severity::Finest,
            filter: Some("loggable=trace".to_string()),
            ansi: false,
            show_origin: true,
            ..Self::default()
        }
    }

    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_ansi(mut self, ansi: bool) -> Self {
        self.ansi = ansi;
        self
    }

    fn default_directive(&self) -> String {
        match self.min_severity.to_level() {
            Some(level) => level.to_string(),
            None => "off".to_string(),
        }
    }

    fn env_filter(&self) -> EnvFilter {
        let fallback = || EnvFilter::new(self.default_directive());
        match &self.filter {
            Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| fallback()),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback()),
        }
    }
}

/// Install the global subscriber. Errors if one is already installed.
///
/// ```rust,no_run
/// use loggable::logging::{init_logging, LoggingConfig};
///
/// init_logging(&LoggingConfig::verbose()).expect("subscriber already installed");
/// ```
pub fn init_logging(config: &LoggingConfig) -> io::Result<()> {
    let layer = fmt::layer()
        .with_ansi(config.ansi)
        .with_target(config.show_origin)
        .with_file(config.show_origin)
        .with_line_number(config.show_origin);
    let registry = tracing_subscriber::registry().with(config.env_filter());

    let installed = match config.format {
        LogFormat::Compact => registry.with(layer.compact()).try_init(),
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
    };
    installed.map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))
}
