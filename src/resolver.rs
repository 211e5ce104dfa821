// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Directive resolution.
//!
//! Picks at most one effective configuration for a finished call. Both
//! paths are pure: no clock, no sink, no shared state.
//!
//! # Precedence
//!
//! Method-level directives shadow type-level ones completely. If a method
//! declares any timing directive, the type's timing directives are not
//! consulted, even when none of the method's thresholds were exceeded.

use crate::directive::{ErrorDirective, Threshold, TimingDirective};
use crate::severity::Severity;

/// Timing configuration selected for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTiming {
    pub severity: Severity,
    pub prefix: String,
    /// The threshold of the directive that won.
    pub threshold: Threshold,
}

/// Error configuration selected for one failed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedError {
    pub severity: Severity,
    pub include_trace: bool,
    pub prefix: String,
}

/// Select the timing directive for a call that took `elapsed_ms`.
///
/// Among the directives whose threshold is strictly below `elapsed_ms`, the
/// one with the highest threshold wins; equal thresholds resolve to the one
/// declared first. Returns `None` when no directive exists, no threshold
/// was exceeded, or the winner's severity is [`Severity::Off`].
pub fn resolve_timing(
    method: &[TimingDirective],
    owner: &[TimingDirective],
    elapsed_ms: u64,
) -> Option<ResolvedTiming> {
    let directives = if !method.is_empty() { method } else { owner };

    let mut selected: Option<&TimingDirective> = None;
    for directive in directives {
        if !directive.threshold.is_exceeded_by(elapsed_ms) {
            continue;
        }
        match selected {
            Some(current) if current.threshold >= directive.threshold => {}
            _ => selected = Some(directive),
        }
    }

    let directive = selected?;
    if directive.severity.is_off() {
        return None;
    }

    Some(ResolvedTiming {
        severity: directive.severity,
        prefix: directive.prefix.clone(),
        threshold: directive.threshold,
    })
}

/// Select the error directive for a failed call.
///
/// The method's directive wins over the type's. Returns `None` when neither
/// exists or the chosen one is [`Severity::Off`].
pub fn resolve_error(
    method: Option<&ErrorDirective>,
    owner: Option<&ErrorDirective>,
) -> Option<ResolvedError> {
    let directive = method.or(owner)?;
    if directive.severity.is_off() {
        return None;
    }

    Some(ResolvedError {
        severity: directive.severity,
        include_trace: directive.include_trace,
        prefix: directive.prefix.clone(),
    })
}
