// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Diagnostic hooks invoked after every lookup.

use tracing::{debug, info};

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome<'a> {
    /// The named source produced the first non-empty value.
    Source(&'a str),
    /// No source had a usable value.
    Default,
}

/// One completed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupEvent<'a> {
    pub variable: &'a str,
    pub outcome: LookupOutcome<'a>,
    pub value: &'a str,
    /// Sources that held the variable but with an empty value.
    pub empty_in: &'a [&'a str],
    pub sensitive: bool,
}

/// Receives lookup events. Implementations must not panic; the gatherer
/// ignores whatever they do.
pub trait LookupObserver: Send + Sync {
    fn observe(&self, event: &LookupEvent<'_>);
}

/// Default observer: one `tracing` event per lookup.
///
/// Sensitive values are reported by length only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl LookupObserver for TracingObserver {
    fn observe(&self, event: &LookupEvent<'_>) {
        let shown = if event.sensitive { "<redacted>" } else { event.value };

        if !event.empty_in.is_empty() {
            debug!(
                variable = event.variable,
                sources = ?event.empty_in,
                "Variable set but empty, falling through"
            );
        }

        match event.outcome {
            LookupOutcome::Source(source) => info!(
                variable = event.variable,
                source,
                value = shown,
                len = event.value.len(),
                "Resolved variable"
            ),
            LookupOutcome::Default => info!(
                variable = event.variable,
                value = shown,
                len = event.value.len(),
                "No source set variable, using default"
            ),
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl LookupObserver for NoopObserver {
    fn observe(&self, _event: &LookupEvent<'_>) {}
}
