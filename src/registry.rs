// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-owner sink cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::sink::{LogSink, SinkFactory, TracingSinkFactory};
use crate::site::OwnerType;

/// Thread-safe mapping from owning type to its sink.
///
/// Sinks are created lazily on first use and kept for the registry's
/// lifetime. The look-up and the create-and-insert run under one lock, so
/// concurrent first use of an owner creates exactly one sink.
///
/// The registry is built by the host and shared with interceptors through
/// an `Arc`; there is no process-wide instance.
pub struct SinkRegistry {
    factory: Arc<dyn SinkFactory>,
    sinks: Mutex<HashMap<String, Arc<dyn LogSink>>>,
}

impl SinkRegistry {
    /// Create a registry backed by [`TracingSinkFactory`].
    pub fn new() -> Self {
        Self::with_factory(Arc::new(TracingSinkFactory))
    }

    /// Create a registry backed by a custom factory.
    pub fn with_factory(factory: Arc<dyn SinkFactory>) -> Self {
        Self {
            factory,
            sinks: Mutex::new(HashMap::new()),
        }
    }

    /// Get the sink for `owner`, creating it on first use.
    pub fn get(&self, owner: &OwnerType) -> Arc<dyn LogSink> {
        let mut sinks = self.lock();
        if let Some(sink) = sinks.get(owner.name()) {
            return Arc::clone(sink);
        }

        tracing::trace!(owner = %owner.name(), "creating log sink");
        let sink = self.factory.create(owner.name());
        sinks.insert(owner.name().to_string(), Arc::clone(&sink));
        sink
    }

    /// Check if a sink has been created for `owner`.
    pub fn contains(&self, owner: &OwnerType) -> bool {
        self.lock().contains_key(owner.name())
    }

    /// Number of cached sinks.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if no sink has been created yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Nothing inside the critical section can leave the map half-updated.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Arc<dyn LogSink>>> {
        self.sinks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for SinkRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SinkRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sinks = self.lock();
        let mut owners: Vec<&String> = sinks.keys().collect();
        owners.sort();
        f.debug_struct("SinkRegistry").field("owners", &owners).finish()
    }
}
