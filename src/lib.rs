// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! loggable - declarative execution-time and error logging.
//!
//! Wrap a call, describe what should be logged about it, and loggable
//! writes at most one record per call:
//!
//! - **Timing**: how long the call took, at the severity of the highest
//!   threshold it exceeded
//! - **Errors**: the error a call returned (or the panic it raised), with
//!   or without its causal trace
//!
//! The wrapped call's outcome is never altered; errors and panics reach the
//! caller exactly as the call produced them.
//!
//! # Architecture
//!
//! - [`severity`] - Severity tiers and their `tracing` levels
//! - [`directive`] - Timing and error directive records
//! - [`resolver`] - Picks the effective directive for a finished call
//! - [`site`] - Call-site identity and the [`DirectiveSource`] capability
//! - [`sink`] - Log sinks ([`TracingSink`], [`MemorySink`])
//! - [`registry`] - One shared sink per owning type
//! - [`interceptor`] - `time_and_log` / `catch_and_log` entry points
//! - [`config`] - File and environment configuration
//! - [`logging`] - Subscriber setup
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use loggable::{call_site, ErrorDirective, Interceptor, Severity, SinkRegistry, TimingDirective};
//!
//! struct UserRepo;
//!
//! let interceptor = Interceptor::new(Arc::new(SinkRegistry::new()));
//! let site = call_site!(
//!     UserRepo,
//!     "find",
//!     timing = [
//!         TimingDirective::above(100, Severity::Info),
//!         TimingDirective::above(1_000, Severity::Warning),
//!     ],
//!     error = ErrorDirective::new(Severity::Severe),
//! );
//!
//! let user: Result<String, std::io::Error> = interceptor.catch_and_log(&site, || {
//!     interceptor.time_and_log(&site, || Ok("ada".to_string()))
//! });
//! assert_eq!(user.unwrap(), "ada");
//! ```

pub mod clock;
pub mod config;
pub mod directive;
pub mod error;
pub mod instrumentation;
pub mod interceptor;
pub mod logging;
pub mod registry;
pub mod resolver;
pub mod severity;
pub mod sink;
pub mod site;

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use directive::{validate_timing_directives, ErrorDirective, Threshold, TimingDirective};
pub use error::{ConfigError, DirectiveError, Result};
pub use instrumentation::Instrumentation;
pub use interceptor::{Interceptor, PanicError};
pub use registry::SinkRegistry;
pub use resolver::{resolve_error, resolve_timing, ResolvedError, ResolvedTiming};
pub use severity::Severity;
pub use sink::{LogRecord, LogSink, MemorySink, MemorySinkFactory, SinkFactory, TracingSink, TracingSinkFactory};
pub use site::{CallSite, DirectiveSource, OwnerType};

/// loggable version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
