// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lookup sources consulted by the credential gatherer.

use std::collections::HashMap;

use axum::http::HeaderMap;

/// A read-only place a named variable can be looked up in.
pub trait Source: Send + Sync {
    /// Short label reported in diagnostics (`process_env`, `env_snapshot`, ...).
    fn name(&self) -> &str;

    /// Raw value for `key`, if the source knows it. Empty strings are returned
    /// as-is; the gatherer decides what counts as a usable value.
    fn lookup(&self, key: &str) -> Option<String>;
}

/// The live process environment, re-read on every lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Source for ProcessEnv {
    fn name(&self) -> &str {
        "process_env"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A frozen copy of an environment, taken once.
#[derive(Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl std::fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("len", &self.vars.len())
            .finish_non_exhaustive()
    }
}

impl EnvSnapshot {
    /// Snapshot the current process environment. Variables whose name or
    /// value is not valid unicode are skipped.
    pub fn capture() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// All captured variables, sorted by name.
    pub fn sorted_pairs(&self) -> Vec<(&str, &str)> {
        sorted_pairs(&self.vars)
    }
}

impl Source for EnvSnapshot {
    fn name(&self) -> &str {
        "env_snapshot"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// Request or host context variables.
///
/// Hosts embedding the resolver pass whatever per-context map they carry.
/// [`ContextVars::from_headers`] exposes request headers under CGI-style
/// names (`X-Forwarded-Proto` becomes `HTTP_X_FORWARDED_PROTO`).
#[derive(Clone, Default)]
pub struct ContextVars {
    vars: HashMap<String, String>,
}

impl ContextVars {
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        let vars = headers
            .iter()
            .filter_map(|(name, value)| {
                let value = value.to_str().ok()?;
                let key = format!("HTTP_{}", name.as_str().to_ascii_uppercase().replace('-', "_"));
                Some((key, value.to_string()))
            })
            .collect();
        Self { vars }
    }

    /// All context variables, sorted by name.
    pub fn sorted_pairs(&self) -> Vec<(&str, &str)> {
        sorted_pairs(&self.vars)
    }
}

impl std::fmt::Debug for ContextVars {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<_> = self.vars.keys().collect();
        keys.sort();
        f.debug_struct("ContextVars").field("keys", &keys).finish()
    }
}

impl Source for ContextVars {
    fn name(&self) -> &str {
        "context"
    }

    fn lookup(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

fn sorted_pairs(vars: &HashMap<String, String>) -> Vec<(&str, &str)> {
    let mut pairs: Vec<_> = vars.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    pairs.sort_unstable();
    pairs
}
