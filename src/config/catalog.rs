// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Config-driven directive lookup.

use std::collections::HashMap;

use crate::site::{CallSite, OwnerType};

use super::types::{InstrumentationConfig, TypeDirectives};

/// Directives declared in configuration, looked up per call site.
///
/// Types are matched by fully-qualified name first, then by simple name,
/// so config files may use either `app::repo::UserRepo` or `UserRepo`.
#[derive(Debug, Clone, Default)]
pub struct DirectiveCatalog {
    types: HashMap<String, TypeDirectives>,
}

impl DirectiveCatalog {
    pub fn new(types: HashMap<String, TypeDirectives>) -> Self {
        Self { types }
    }

    pub fn from_config(config: &InstrumentationConfig) -> Self {
        Self::new(config.types.clone())
    }

    /// Directives declared for `owner`, if any.
    pub fn type_directives(&self, owner: &OwnerType) -> Option<&TypeDirectives> {
        self.types
            .get(owner.name())
            .or_else(|| self.types.get(owner.simple_name()))
    }

    /// Build the call site for `method` of `owner`.
    ///
    /// Unknown owners and methods yield a site with no directives, which
    /// never logs.
    pub fn site(&self, owner: OwnerType, method: &str) -> CallSite {
        let Some(directives) = self.type_directives(&owner) else {
            return CallSite::new(owner, method);
        };

        let mut site =
            CallSite::new(owner, method).with_type_timing(directives.timing.iter().cloned());
        if let Some(error) = &directives.error {
            site = site.with_type_error(error.clone());
        }

        if let Some(method_directives) = directives.methods.get(method) {
            site = site.with_method_timing(method_directives.timing.iter().cloned());
            if let Some(error) = &method_directives.error {
                site = site.with_method_error(error.clone());
            }
        }
        site
    }

    /// Build the call site for `method` of `T`.
    pub fn site_for<T: ?Sized>(&self, method: &str) -> CallSite {
        self.site(OwnerType::of::<T>(), method)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
