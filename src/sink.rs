// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Log sinks.
//!
//! A sink accepts `(severity, message, optional error)` and records it. One
//! sink exists per owning type (see [`crate::registry::SinkRegistry`]); the
//! sink's name is the owner's fully-qualified type name.
//!
//! - [`TracingSink`] forwards records as `tracing` events (the default)
//! - [`MemorySink`] keeps records in memory for assertions in tests

use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::severity::Severity;

/// Backend that records a severity-tagged message.
///
/// Emission is infallible from the caller's point of view: an
/// implementation that can fail must swallow its own failure rather than
/// disturb the outcome of the call being observed.
pub trait LogSink: Send + Sync {
    /// Record one message, optionally with the error that caused it.
    fn log(&self, severity: Severity, message: &str, error: Option<&(dyn Error + 'static)>);

    /// Sink identity (the owning type's fully-qualified name).
    fn name(&self) -> &str;
}

/// Creates the sink for a newly seen owner.
pub trait SinkFactory: Send + Sync {
    fn create(&self, name: &str) -> Arc<dyn LogSink>;
}

/// Render an error and its `source()` chain, one cause per line.
pub fn format_trace(error: &(dyn Error + 'static)) -> String {
    let mut trace = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        trace.push_str("\n  caused by: ");
        trace.push_str(&cause.to_string());
        source = cause.source();
    }
    trace
}

macro_rules! emit_at {
    ($level:expr, $($args:tt)+) => {
        match $level {
            tracing::Level::ERROR => tracing::error!($($args)+),
            tracing::Level::WARN => tracing::warn!($($args)+),
            tracing::Level::INFO => tracing::info!($($args)+),
            tracing::Level::DEBUG => tracing::debug!($($args)+),
            _ => tracing::trace!($($args)+),
        }
    };
}

/// Sink that emits `tracing` events.
///
/// Events carry the sink name as `sink` and the original tier as
/// `severity`, since several tiers share one `tracing` level.
#[derive(Debug, Clone)]
pub struct TracingSink {
    name: String,
}

impl TracingSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl LogSink for TracingSink {
    fn log(&self, severity: Severity, message: &str, error: Option<&(dyn Error + 'static)>) {
        let Some(level) = severity.to_level() else {
            return;
        };

        match error {
            Some(err) => {
                let trace = format_trace(err);
                emit_at!(
                    level,
                    sink = %self.name,
                    severity = %severity,
                    error = %err,
                    trace = %trace,
                    "{}",
                    message
                );
            }
            None => {
                emit_at!(level, sink = %self.name, severity = %severity, "{}", message);
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Factory producing [`TracingSink`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSinkFactory;

impl SinkFactory for TracingSinkFactory {
    fn create(&self, name: &str) -> Arc<dyn LogSink> {
        Arc::new(TracingSink::new(name))
    }
}

/// A record captured by a [`MemorySink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// Name of the sink that received the record.
    pub sink: String,
    pub severity: Severity,
    pub message: String,
    /// Rendered error trace, if an error was attached.
    pub error: Option<String>,
}

/// In-memory sink; records land in a journal that may be shared between
/// several sinks.
#[derive(Debug)]
pub struct MemorySink {
    name: String,
    journal: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    /// Create a sink with its own journal.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_journal(name, Arc::default())
    }

    /// Create a sink that appends to an existing journal.
    pub fn with_journal(name: impl Into<String>, journal: Arc<Mutex<Vec<LogRecord>>>) -> Self {
        Self {
            name: name.into(),
            journal,
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<LogRecord> {
        lock_journal(&self.journal).clone()
    }
}

impl LogSink for MemorySink {
    fn log(&self, severity: Severity, message: &str, error: Option<&(dyn Error + 'static)>) {
        let record = LogRecord {
            sink: self.name.clone(),
            severity,
            message: message.to_string(),
            error: error.map(format_trace),
        };
        lock_journal(&self.journal).push(record);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Factory producing [`MemorySink`]s that share one journal.
///
/// Also counts how many sinks it created, which makes the registry's
/// one-per-owner guarantee observable.
#[derive(Debug, Default)]
pub struct MemorySinkFactory {
    journal: Arc<Mutex<Vec<LogRecord>>>,
    created: AtomicUsize,
}

impl MemorySinkFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record written through any sink this factory created.
    pub fn records(&self) -> Vec<LogRecord> {
        lock_journal(&self.journal).clone()
    }

    /// Number of sinks created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl SinkFactory for MemorySinkFactory {
    fn create(&self, name: &str) -> Arc<dyn LogSink> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Arc::new(MemorySink::with_journal(name, Arc::clone(&self.journal)))
    }
}

// A panic while holding the journal lock leaves the Vec intact, so keep going.
fn lock_journal(journal: &Mutex<Vec<LogRecord>>) -> std::sync::MutexGuard<'_, Vec<LogRecord>> {
    journal.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
