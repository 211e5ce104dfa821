// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Call interception.
//!
//! [`Interceptor`] wraps a single call for one of two concerns:
//!
//! - [`Interceptor::time_and_log`] measures the call and logs its duration
//!   when a timing directive's threshold was exceeded
//! - [`Interceptor::catch_and_log`] logs a failed call's error
//!   ([`Interceptor::catch_and_log_dyn`] for `anyhow::Error` and other
//!   boxed errors)
//!
//! Neither concern changes the call's outcome. Errors come back to the caller
//! as the same value the call returned, and panics resume with their
//! original payload once the record has been written.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use loggable::{call_site, Interceptor, Severity, SinkRegistry, TimingDirective};
//!
//! struct Mailer;
//!
//! let interceptor = Interceptor::new(Arc::new(SinkRegistry::new()));
//! let site = call_site!(Mailer, "send", timing = [TimingDirective::above(250, Severity::Warning)]);
//!
//! let sent: Result<u32, std::io::Error> = interceptor.time_and_log(&site, || Ok(3));
//! assert_eq!(sent.unwrap(), 3);
//! ```

use std::any::Any;
use std::error::Error;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::clock::{elapsed_ms, Clock, SystemClock};
use crate::registry::SinkRegistry;
use crate::resolver::{resolve_error, resolve_timing};
use crate::site::DirectiveSource;

/// Stand-in error attached to the record when a wrapped call panics.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("panicked: {message}")]
pub struct PanicError {
    pub message: String,
}

impl PanicError {
    /// Extract the panic message from a `catch_unwind` payload.
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "Box<dyn Any>".to_string()
        };
        Self { message }
    }
}

/// Wraps calls and writes their timing and error records.
#[derive(Clone)]
pub struct Interceptor {
    registry: Arc<SinkRegistry>,
    clock: Arc<dyn Clock>,
    enabled: bool,
}

impl Interceptor {
    /// Create an enabled interceptor using the system clock.
    pub fn new(registry: Arc<SinkRegistry>) -> Self {
        Self {
            registry,
            clock: Arc::new(SystemClock),
            enabled: true,
        }
    }

    /// Use a different time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Turn interception on or off.
    ///
    /// A disabled interceptor runs wrapped calls directly: no timing, no
    /// resolution, no registry access.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The registry sinks are drawn from.
    pub fn registry(&self) -> &Arc<SinkRegistry> {
        &self.registry
    }

    /// Run `call`, then log its duration if a timing directive applies.
    ///
    /// The duration covers the whole call whether it returned `Ok`, `Err` or
    /// panicked, and the record is written in all three cases.
    pub fn time_and_log<S, T, E, F>(&self, site: &S, call: F) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        F: FnOnce() -> Result<T, E>,
    {
        if !self.enabled {
            return call();
        }

        let start = self.clock.now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(call));
        let elapsed = elapsed_ms(start, self.clock.now());

        let threw = !matches!(outcome, Ok(Ok(_)));
        self.record_timing(site, elapsed, threw);

        match outcome {
            Ok(result) => result,
            Err(payload) => panic::resume_unwind(payload),
        }
    }

    /// Run `call`, logging its error if it fails.
    ///
    /// Nothing is logged on success. On failure the error (or panic) is
    /// logged when an error directive applies and is then handed back
    /// unchanged.
    pub fn catch_and_log<S, T, E, F>(&self, site: &S, call: F) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        E: Error + 'static,
        F: FnOnce() -> Result<T, E>,
    {
        self.catch_with(site, call, as_std_error::<E>)
    }

    /// [`catch_and_log`](Self::catch_and_log) for boxed error types.
    ///
    /// Covers `anyhow::Error` (and so [`crate::Result`]) and
    /// `Box<dyn Error + Send + Sync>`, which do not implement `Error`
    /// themselves.
    pub fn catch_and_log_dyn<S, T, E, F>(&self, site: &S, call: F) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        E: AsRef<dyn Error + Send + Sync + 'static>,
        F: FnOnce() -> Result<T, E>,
    {
        self.catch_with(site, call, as_dyn_error::<E>)
    }

    fn catch_with<S, T, E, F>(
        &self,
        site: &S,
        call: F,
        as_error: fn(&E) -> &(dyn Error + 'static),
    ) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        F: FnOnce() -> Result<T, E>,
    {
        if !self.enabled {
            return call();
        }

        match panic::catch_unwind(AssertUnwindSafe(call)) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => {
                self.record_error(site, as_error(&err));
                Err(err)
            }
            Err(payload) => {
                let panic_error = PanicError::from_payload(&*payload);
                self.record_error(site, &panic_error);
                panic::resume_unwind(payload)
            }
        }
    }

    /// Await `call`, then log its duration if a timing directive applies.
    ///
    /// Timing starts when this future is first polled. A future dropped
    /// before completion writes nothing; panics are not intercepted.
    pub async fn time_and_log_async<S, T, E, Fut>(&self, site: &S, call: Fut) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return call.await;
        }

        let start = self.clock.now();
        let result = call.await;
        let elapsed = elapsed_ms(start, self.clock.now());

        self.record_timing(site, elapsed, result.is_err());
        result
    }

    /// Await `call`, logging its error if it fails.
    pub async fn catch_and_log_async<S, T, E, Fut>(&self, site: &S, call: Fut) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        E: Error + 'static,
        Fut: Future<Output = Result<T, E>>,
    {
        self.catch_with_async(site, call, as_std_error::<E>).await
    }

    /// [`catch_and_log_dyn`](Self::catch_and_log_dyn) for futures.
    pub async fn catch_and_log_dyn_async<S, T, E, Fut>(&self, site: &S, call: Fut) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        E: AsRef<dyn Error + Send + Sync + 'static>,
        Fut: Future<Output = Result<T, E>>,
    {
        self.catch_with_async(site, call, as_dyn_error::<E>).await
    }

    async fn catch_with_async<S, T, E, Fut>(
        &self,
        site: &S,
        call: Fut,
        as_error: fn(&E) -> &(dyn Error + 'static),
    ) -> Result<T, E>
    where
        S: DirectiveSource + ?Sized,
        Fut: Future<Output = Result<T, E>>,
    {
        if !self.enabled {
            return call.await;
        }

        let result = call.await;
        if let Err(err) = &result {
            self.record_error(site, as_error(err));
        }
        result
    }

    /// Resolve and write the timing record for a finished call.
    ///
    /// Returns `true` if a record was written. Exposed for hosts that
    /// measure calls themselves.
    pub fn record_timing<S>(&self, site: &S, elapsed_ms: u64, threw: bool) -> bool
    where
        S: DirectiveSource + ?Sized,
    {
        let Some(resolved) = resolve_timing(site.method_timing(), site.type_timing(), elapsed_ms)
        else {
            return false;
        };

        let message = format!(
            "{}{}:{} took {} ms. Exception:{}",
            resolved.prefix,
            site.owner().simple_name(),
            site.method_name(),
            elapsed_ms,
            threw
        );
        self.registry
            .get(site.owner())
            .log(resolved.severity, &message, None);
        true
    }

    /// Resolve and write the error record for a failed call.
    ///
    /// Returns `true` if a record was written.
    pub fn record_error<S>(&self, site: &S, error: &(dyn Error + 'static)) -> bool
    where
        S: DirectiveSource + ?Sized,
    {
        let Some(resolved) = resolve_error(site.method_error(), site.type_error()) else {
            return false;
        };

        let message = format!(
            "{}{}:{}",
            resolved.prefix,
            site.owner().simple_name(),
            site.method_name()
        );
        let attached = if resolved.include_trace { Some(error) } else { None };
        self.registry
            .get(site.owner())
            .log(resolved.severity, &message, attached);
        true
    }
}

fn as_std_error<E: Error + 'static>(err: &E) -> &(dyn Error + 'static) {
    err
}

fn as_dyn_error<E: AsRef<dyn Error + Send + Sync + 'static>>(err: &E) -> &(dyn Error + 'static) {
    err.as_ref()
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("registry", &self.registry)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::directive::{ErrorDirective, TimingDirective};
    use crate::severity::Severity;
    use crate::sink::MemorySinkFactory;
    use crate::site::{CallSite, OwnerType};

    #[derive(Debug, PartialEq, Eq)]
    struct Failure(u32);

    impl fmt::Display for Failure {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "failure #{}", self.0)
        }
    }

    impl Error for Failure {}

    struct OrderService;

    fn setup() -> (Interceptor, Arc<MemorySinkFactory>, Arc<ManualClock>) {
        let factory = Arc::new(MemorySinkFactory::new());
        let clock = Arc::new(ManualClock::new());
        let registry = Arc::new(SinkRegistry::with_factory(factory.clone()));
        let interceptor = Interceptor::new(registry).with_clock(clock.clone());
        (interceptor, factory, clock)
    }

    fn tiered_site() -> CallSite {
        CallSite::new(OwnerType::of::<OrderService>(), "place").with_method_timing([
            TimingDirective::above(10, Severity::Fine),
            TimingDirective::above(100, Severity::Info),
            TimingDirective::above(200, Severity::Warning),
        ])
    }

    #[test]
    fn test_time_and_log_selects_tier() {
        let (interceptor, factory, clock) = setup();
        let result: Result<&str, Failure> = interceptor.time_and_log(&tiered_site(), || {
            clock.advance_ms(120);
            Ok("placed")
        });

        assert_eq!(result, Ok("placed"));
        let records = factory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Info);
        assert_eq!(records[0].message, "OrderService:place took 120 ms. Exception:false");
        assert_eq!(records[0].error, None);
    }

    #[test]
    fn test_time_and_log_fast_call_writes_nothing() {
        let (interceptor, factory, clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_timing([TimingDirective::above(100, Severity::Info)]);

        let result: Result<(), Failure> = interceptor.time_and_log(&site, || {
            clock.advance_ms(10);
            Ok(())
        });

        assert!(result.is_ok());
        assert!(factory.records().is_empty());
        assert!(interceptor.registry().is_empty());
    }

    #[test]
    fn test_time_and_log_records_failure_and_returns_error() {
        let (interceptor, factory, clock) = setup();
        let site = tiered_site();
        let result: Result<(), Failure> = interceptor.time_and_log(&site, || {
            clock.advance_ms(250);
            Err(Failure(7))
        });

        assert_eq!(result, Err(Failure(7)));
        let records = factory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert!(records[0].message.ends_with("took 250 ms. Exception:true"));
    }

    #[test]
    fn test_time_and_log_applies_prefix() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "cancel")
            .with_type_timing([TimingDirective::new().with_prefix("[perf] ")]);

        let _: Result<(), Failure> = interceptor.time_and_log(&site, || Ok(()));
        assert_eq!(
            factory.records()[0].message,
            "[perf] OrderService:cancel took 0 ms. Exception:false"
        );
    }

    #[test]
    fn test_time_and_log_panic_is_logged_and_resumed() {
        let (interceptor, factory, clock) = setup();
        let site = tiered_site();

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), Failure> = interceptor.time_and_log(&site, || {
                clock.advance_ms(15);
                panic!("inventory unavailable");
            });
        }));

        let payload = caught.unwrap_err();
        assert_eq!(payload.downcast_ref::<&str>(), Some(&"inventory unavailable"));
        let records = factory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Fine);
        assert!(records[0].message.ends_with("Exception:true"));
    }

    #[test]
    fn test_catch_and_log_success_is_silent() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::default());

        let result: Result<u32, Failure> = interceptor.catch_and_log(&site, || Ok(5));
        assert_eq!(result, Ok(5));
        assert!(factory.records().is_empty());
    }

    #[test]
    fn test_catch_and_log_without_trace() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::new(Severity::Warning).with_trace(false));

        let result: Result<(), Failure> = interceptor.catch_and_log(&site, || Err(Failure(3)));
        assert_eq!(result, Err(Failure(3)));

        let records = factory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Warning);
        assert_eq!(records[0].message, "OrderService:place");
        assert_eq!(records[0].error, None);
    }

    #[test]
    fn test_catch_and_log_with_trace_and_type_directive() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "refund")
            .with_type_error(ErrorDirective::default().with_prefix("failed: "));

        let result: Result<(), Failure> = interceptor.catch_and_log(&site, || Err(Failure(9)));
        assert!(result.is_err());

        let records = factory.records();
        assert_eq!(records[0].severity, Severity::Severe);
        assert_eq!(records[0].message, "failed: OrderService:refund");
        assert_eq!(records[0].error.as_deref(), Some("failure #9"));
    }

    #[test]
    fn test_catch_and_log_without_directive_just_propagates() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place");

        let result: Result<(), Failure> = interceptor.catch_and_log(&site, || Err(Failure(1)));
        assert_eq!(result, Err(Failure(1)));
        assert!(factory.records().is_empty());
    }

    #[test]
    fn test_catch_and_log_panic_attaches_message() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::default());

        let caught = panic::catch_unwind(AssertUnwindSafe(|| {
            let _: Result<(), Failure> = interceptor.catch_and_log(&site, || {
                let n = std::hint::black_box(3);
                panic!("{n} items")
            });
        }));

        assert_eq!(caught.unwrap_err().downcast_ref::<String>().map(String::as_str), Some("3 items"));
        assert_eq!(factory.records()[0].error.as_deref(), Some("panicked: 3 items"));
    }

    #[test]
    fn test_catch_and_log_dyn_wraps_anyhow_error() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::default());

        let result: crate::error::Result<()> =
            interceptor.catch_and_log_dyn(&site, || Err(anyhow::anyhow!("db down")));

        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "db down");
        let records = factory.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].severity, Severity::Severe);
        assert_eq!(records[0].message, "OrderService:place");
        assert_eq!(records[0].error.as_deref(), Some("db down"));
    }

    #[test]
    fn test_catch_and_log_dyn_keeps_anyhow_context_chain() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::default());

        let result: crate::error::Result<()> = interceptor.catch_and_log_dyn(&site, || {
            Err(anyhow::Error::new(Failure(9)).context("placing order"))
        });

        assert_eq!(result.unwrap_err().root_cause().to_string(), "failure #9");
        assert_eq!(
            factory.records()[0].error.as_deref(),
            Some("placing order\n  caused by: failure #9")
        );
    }

    #[test]
    fn test_catch_and_log_dyn_wraps_boxed_error() {
        let (interceptor, factory, _clock) = setup();
        let site = CallSite::new(OwnerType::of::<OrderService>(), "place")
            .with_method_error(ErrorDirective::new(Severity::Warning).with_trace(false));

        let result: Result<(), Box<dyn Error + Send + Sync>> =
            interceptor.catch_and_log_dyn(&site, || Err(Failure(5).into()));

        assert_eq!(result.unwrap_err().to_string(), "failure #5");
        let records = factory.records();
        assert_eq!(records[0].severity, Severity::Warning);
        assert!(records[0].error.is_none());
    }

    #[test]
    fn test_disabled_interceptor_bypasses_everything() {
        let (interceptor, factory, clock) = setup();
        let interceptor = interceptor.with_enabled(false);
        let site = tiered_site().with_method_error(ErrorDirective::default());

        let timed: Result<(), Failure> = interceptor.time_and_log(&site, || {
            clock.advance_ms(1_000);
            Err(Failure(2))
        });
        let caught: Result<(), Failure> = interceptor.catch_and_log(&site, || Err(Failure(2)));

        assert!(timed.is_err() && caught.is_err());
        assert!(factory.records().is_empty());
        assert!(interceptor.registry().is_empty());
    }

    #[test]
    fn test_panic_error_from_payload() {
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(PanicError::from_payload(&*boxed).message, "Box<dyn Any>");
    }

    #[tokio::test]
    async fn test_async_variants() {
        let (interceptor, factory, clock) = setup();
        let site = tiered_site().with_method_error(ErrorDirective::new(Severity::Severe));

        let timed: Result<u8, Failure> = interceptor
            .time_and_log_async(&site, async {
                clock.advance_ms(300);
                Ok(1)
            })
            .await;
        assert_eq!(timed, Ok(1));

        let caught: Result<u8, Failure> = interceptor
            .catch_and_log_async(&site, async { Err(Failure(4)) })
            .await;
        assert_eq!(caught, Err(Failure(4)));

        let boxed: crate::error::Result<u8> = interceptor
            .catch_and_log_dyn_async(&site, async { Err(anyhow::anyhow!("queue full")) })
            .await;
        assert_eq!(boxed.unwrap_err().to_string(), "queue full");

        let records = factory.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].severity, Severity::Warning);
        assert_eq!(records[1].error.as_deref(), Some("failure #4"));
        assert_eq!(records[2].error.as_deref(), Some("queue full"));
    }
}
