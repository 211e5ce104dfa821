// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Call-site metadata.
//!
//! The interceptor does not discover directives itself. Whatever knows about
//! a call site (hand-written [`CallSite`]s, the [`call_site!`](crate::call_site)
//! macro, or a [`DirectiveCatalog`](crate::config::DirectiveCatalog) loaded
//! from config) hands it over through [`DirectiveSource`].

use std::fmt;

use crate::directive::{ErrorDirective, TimingDirective};

/// Identity of the type that owns an intercepted method.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OwnerType {
    name: String,
}

impl OwnerType {
    /// Owner identity for `T`, using its fully-qualified type name.
    pub fn of<T: ?Sized>() -> Self {
        Self::named(std::any::type_name::<T>())
    }

    /// Owner identity from an explicit fully-qualified name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Fully-qualified name, e.g. `app::repo::UserRepo`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Last path segment without generic arguments, e.g. `UserRepo`.
    pub fn simple_name(&self) -> &str {
        let base = match self.name.find('<') {
            Some(idx) => &self.name[..idx],
            None => &self.name,
        };
        match base.rfind("::") {
            Some(idx) => &base[idx + 2..],
            None => base,
        }
    }
}

impl fmt::Display for OwnerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Capability that yields the directives attached to one call site.
pub trait DirectiveSource {
    /// The type owning the method.
    fn owner(&self) -> &OwnerType;

    /// The intercepted method's name.
    fn method_name(&self) -> &str;

    /// Timing directives declared on the method, in declaration order.
    fn method_timing(&self) -> &[TimingDirective];

    /// Timing directives declared on the owning type, in declaration order.
    fn type_timing(&self) -> &[TimingDirective];

    /// Error directive declared on the method.
    fn method_error(&self) -> Option<&ErrorDirective>;

    /// Error directive declared on the owning type.
    fn type_error(&self) -> Option<&ErrorDirective>;
}

/// Directives and identity of one intercepted method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    owner: OwnerType,
    method: String,
    method_timing: Vec<TimingDirective>,
    type_timing: Vec<TimingDirective>,
    method_error: Option<ErrorDirective>,
    type_error: Option<ErrorDirective>,
}

impl CallSite {
    /// Create a call site with no directives attached.
    pub fn new(owner: OwnerType, method: impl Into<String>) -> Self {
        Self {
            owner,
            method: method.into(),
            method_timing: Vec::new(),
            type_timing: Vec::new(),
            method_error: None,
            type_error: None,
        }
    }

    /// Append method-level timing directives.
    pub fn with_method_timing(mut self, directives: impl IntoIterator<Item = TimingDirective>) -> Self {
        self.method_timing.extend(directives);
        self
    }

    /// Append type-level timing directives.
    pub fn with_type_timing(mut self, directives: impl IntoIterator<Item = TimingDirective>) -> Self {
        self.type_timing.extend(directives);
        self
    }

    /// Set the method-level error directive.
    pub fn with_method_error(mut self, directive: ErrorDirective) -> Self {
        self.method_error = Some(directive);
        self
    }

    /// Set the type-level error directive.
    pub fn with_type_error(mut self, directive: ErrorDirective) -> Self {
        self.type_error = Some(directive);
        self
    }
}

impl DirectiveSource for CallSite {
    fn owner(&self) -> &OwnerType {
        &self.owner
    }

    fn method_name(&self) -> &str {
        &self.method
    }

    fn method_timing(&self) -> &[TimingDirective] {
        &self.method_timing
    }

    fn type_timing(&self) -> &[TimingDirective] {
        &self.type_timing
    }

    fn method_error(&self) -> Option<&ErrorDirective> {
        self.method_error.as_ref()
    }

    fn type_error(&self) -> Option<&ErrorDirective> {
        self.type_error.as_ref()
    }
}

/// Build a [`CallSite`](crate::site::CallSite) for a method of `Type`.
///
/// # Example
///
/// ```rust
/// use loggable::{call_site, Severity, TimingDirective, ErrorDirective};
///
/// struct UserRepo;
///
/// let site = call_site!(
///     UserRepo,
///     "find_by_email",
///     timing = [
///         TimingDirective::above(100, Severity::Info),
///         TimingDirective::above(500, Severity::Warning),
///     ],
///     error = ErrorDirective::new(Severity::Severe),
/// );
/// ```
///
/// Keys: `timing`, `type_timing` (iterables of timing directives) and
/// `error`, `type_error` (single error directives).
#[macro_export]
macro_rules! call_site {
    (@apply $site:ident, timing, $value:expr) => {
        $site.with_method_timing($value)
    };
    (@apply $site:ident, type_timing, $value:expr) => {
        $site.with_type_timing($value)
    };
    (@apply $site:ident, error, $value:expr) => {
        $site.with_method_error($value)
    };
    (@apply $site:ident, type_error, $value:expr) => {
        $site.with_type_error($value)
    };
    ($owner:ty, $method:expr $(, $key:ident = $value:expr)* $(,)?) => {{
        let site = $crate::site::CallSite::new($crate::site::OwnerType::of::<$owner>(), $method);
        $( let site = $crate::call_site!(@apply site, $key, $value); )*
        site
    }};
}
