// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Composition root tying configuration, sinks and interception together.

use std::path::Path;
use std::sync::Arc;

use crate::config::{load_config, DirectiveCatalog, EnvOptions, InstrumentationConfig};
use crate::error::ConfigError;
use crate::interceptor::Interceptor;
use crate::registry::SinkRegistry;
use crate::sink::{SinkFactory, TracingSinkFactory};
use crate::site::CallSite;

/// Everything a host needs to wrap calls with config-declared directives.
///
/// # Example
///
/// ```rust,no_run
/// use loggable::Instrumentation;
///
/// struct Checkout;
///
/// # fn main() -> loggable::Result<()> {
/// let instrumentation = Instrumentation::from_workspace(std::path::Path::new("."))?;
/// let site = instrumentation.site_for::<Checkout>("submit");
/// let total: Result<u64, std::io::Error> =
///     instrumentation.interceptor().time_and_log(&site, || Ok(42));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Instrumentation {
    config: InstrumentationConfig,
    catalog: DirectiveCatalog,
    interceptor: Interceptor,
}

impl Instrumentation {
    /// Build from an already-merged config, emitting through `tracing`.
    pub fn new(config: InstrumentationConfig) -> Self {
        Self::with_factory(config, Arc::new(TracingSinkFactory))
    }

    /// Build from an already-merged config with a custom sink factory.
    pub fn with_factory(config: InstrumentationConfig, factory: Arc<dyn SinkFactory>) -> Self {
        let registry = Arc::new(SinkRegistry::with_factory(factory));
        let interceptor = Interceptor::new(registry).with_enabled(config.is_enabled());
        let catalog = DirectiveCatalog::from_config(&config);

        tracing::debug!(
            enabled = config.is_enabled(),
            types = catalog.len(),
            "instrumentation ready"
        );

        Self {
            config,
            catalog,
            interceptor,
        }
    }

    /// Load every config source for `workspace_root` plus the environment.
    pub fn from_workspace(workspace_root: &Path) -> Result<Self, ConfigError> {
        let config = load_config(workspace_root, EnvOptions::from_env()?)?;
        Ok(Self::new(config))
    }

    pub fn config(&self) -> &InstrumentationConfig {
        &self.config
    }

    pub fn catalog(&self) -> &DirectiveCatalog {
        &self.catalog
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Config-declared call site for `method` of `T`.
    pub fn site_for<T: ?Sized>(&self, method: &str) -> CallSite {
        self.catalog.site_for::<T>(method)
    }
}
