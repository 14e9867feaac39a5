// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Credential Gatherer
//!
//! Resolves named variables through an ordered chain of [`Source`]s:
//!
//! 1. the live process environment
//! 2. an environment snapshot taken at startup
//! 3. request/context variables
//! 4. the literal default
//!
//! The first **non-empty** value wins. A variable explicitly set to `""` is
//! treated exactly like an unset one and falls through to the next source,
//! so an empty value can never be configured on purpose.
//!
//! Every lookup re-queries the sources and reports its outcome to a
//! [`LookupObserver`]; the observer cannot influence the result.

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;

pub mod observer;
pub mod source;
pub mod table;

pub use observer::{LookupEvent, LookupObserver, LookupOutcome, NoopObserver, TracingObserver};
pub use source::{ContextVars, EnvSnapshot, ProcessEnv, Source};
pub use table::{is_secret_key, variable_table, VariableSpec, INSTALLER_VARS};

/// What one source returned for a variable, without fallthrough applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SourceAnswer {
    pub source: String,
    pub value: Option<String>,
}

pub struct CredentialGatherer {
    sources: Vec<Box<dyn Source>>,
    observer: Arc<dyn LookupObserver>,
}

impl std::fmt::Debug for CredentialGatherer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("CredentialGatherer")
            .field("sources", &names)
            .finish_non_exhaustive()
    }
}

impl CredentialGatherer {
    /// Gatherer over `sources`, queried in order, logging through `tracing`.
    pub fn new(sources: Vec<Box<dyn Source>>) -> Self {
        Self {
            sources,
            observer: Arc::new(TracingObserver),
        }
    }

    /// The standard chain: live environment, a snapshot of it taken now, and
    /// the given context.
    pub fn from_process(context: ContextVars) -> Self {
        Self::new(vec![
            Box::new(ProcessEnv),
            Box::new(EnvSnapshot::capture()),
            Box::new(context),
        ])
    }

    pub fn with_observer(mut self, observer: Arc<dyn LookupObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Names of the configured sources, in query order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// First non-empty value for `name`, or `default`.
    pub fn resolve(&self, name: &str, default: &str) -> String {
        self.resolve_inner(name, default, false).0
    }

    /// Like [`resolve`](Self::resolve) with the value kept out of diagnostics.
    pub fn resolve_sensitive(&self, name: &str, default: &str) -> String {
        self.resolve_inner(name, default, true).0
    }

    pub fn resolve_spec(&self, spec: &VariableSpec) -> String {
        self.resolve_with_source(spec).0
    }

    /// Resolve `spec` and also name the source that supplied the value;
    /// `None` means the default was used.
    pub fn resolve_with_source(&self, spec: &VariableSpec) -> (String, Option<&str>) {
        self.resolve_inner(spec.name, spec.default, spec.sensitive)
    }

    /// Ask every source for `name` and report the raw answers.
    pub fn probe(&self, name: &str) -> Vec<SourceAnswer> {
        self.sources
            .iter()
            .map(|source| SourceAnswer {
                source: source.name().to_string(),
                value: source.lookup(name),
            })
            .collect()
    }

    fn resolve_inner(
        &self,
        name: &str,
        default: &str,
        sensitive: bool,
    ) -> (String, Option<&str>) {
        let mut empty_in = Vec::new();
        let mut found = None;

        for source in &self.sources {
            match source.lookup(name) {
                Some(value) if !value.is_empty() => {
                    found = Some((source.name(), value));
                    break;
                }
                Some(_) => empty_in.push(source.name()),
                None => {}
            }
        }

        let (winner, value) = match found {
            Some((source, value)) => (Some(source), value),
            None => (None, default.to_string()),
        };

        self.observer.observe(&LookupEvent {
            variable: name,
            outcome: winner.map_or(LookupOutcome::Default, LookupOutcome::Source),
            value: &value,
            empty_in: &empty_in,
            sensitive,
        });

        (value, winner)
    }
}
