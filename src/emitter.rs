// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Constant Emitter
//!
//! Turns a [`ResolvedConfig`] into the named bindings WordPress expects:
//! `define()`d constants plus the `$table_prefix` global.
//!
//! Emission fails only for structural problems:
//! - `DB_HOST` is empty
//! - a binding name is already bound (either preset by the host or emitted
//!   twice)
//!
//! `ABSPATH` is the one binding that yields to an existing definition.

use tracing::debug;

use crate::error::BootstrapError;
use crate::models::ResolvedConfig;

/// Value of a binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingValue {
    Str(String),
    Bool(bool),
}

impl BindingValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BindingValue::Str(s) => Some(s),
            BindingValue::Bool(_) => None,
        }
    }

    fn to_env(&self) -> String {
        match self {
            BindingValue::Str(s) => s.clone(),
            BindingValue::Bool(b) => b.to_string(),
        }
    }

    fn to_php(&self) -> String {
        match self {
            BindingValue::Str(s) => php_quote(s),
            BindingValue::Bool(b) => b.to_string(),
        }
    }
}

impl From<&str> for BindingValue {
    fn from(value: &str) -> Self {
        BindingValue::Str(value.to_string())
    }
}

impl From<String> for BindingValue {
    fn from(value: String) -> Self {
        BindingValue::Str(value)
    }
}

impl From<bool> for BindingValue {
    fn from(value: bool) -> Self {
        BindingValue::Bool(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `define('NAME', value)`
    Constant,
    /// `$name = value;`
    Global,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Binding {
    pub name: String,
    pub value: BindingValue,
    pub kind: BindingKind,
    /// Defined before emission; not rendered again.
    pub preset: bool,
}

impl std::fmt::Debug for Binding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Values may be credentials.
        f.debug_struct("Binding")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("preset", &self.preset)
            .finish_non_exhaustive()
    }
}

/// Ordered set of bindings with unique names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    entries: Vec<Binding>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from constants the host already defines.
    pub fn with_preset<N, V>(preset: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<BindingValue>,
    {
        let mut bindings = Self::new();
        for (name, value) in preset {
            let name = name.into();
            if bindings.contains(&name) {
                continue;
            }
            bindings.entries.push(Binding {
                name,
                value: value.into(),
                kind: BindingKind::Constant,
                preset: true,
            });
        }
        bindings
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|b| b.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&BindingValue> {
        self.entries.iter().find(|b| b.name == name).map(|b| &b.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Bind a constant; fails if the name is taken.
    pub fn define(
        &mut self,
        name: &str,
        value: impl Into<BindingValue>,
    ) -> Result<(), BootstrapError> {
        self.push(name, value.into(), BindingKind::Constant)
    }

    /// Bind a global variable; fails if the name is taken.
    pub fn set_global(
        &mut self,
        name: &str,
        value: impl Into<BindingValue>,
    ) -> Result<(), BootstrapError> {
        self.push(name, value.into(), BindingKind::Global)
    }

    /// Bind a constant unless already bound. Returns whether it was bound.
    pub fn define_if_absent(&mut self, name: &str, value: impl Into<BindingValue>) -> bool {
        if self.contains(name) {
            return false;
        }
        self.entries.push(Binding {
            name: name.to_string(),
            value: value.into(),
            kind: BindingKind::Constant,
            preset: false,
        });
        true
    }

    fn push(
        &mut self,
        name: &str,
        value: BindingValue,
        kind: BindingKind,
    ) -> Result<(), BootstrapError> {
        if self.contains(name) {
            return Err(BootstrapError::Collision(name.to_string()));
        }
        self.entries.push(Binding {
            name: name.to_string(),
            value,
            kind,
            preset: false,
        });
        Ok(())
    }

    /// Emitted bindings as `(NAME, value)` environment pairs.
    ///
    /// Booleans become `true`/`false`; preset bindings are skipped.
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|b| !b.preset)
            .map(|b| (b.name.clone(), b.value.to_env()))
            .collect()
    }

    /// Render as a `wp-config.php` body ending in the hand-off to
    /// `wp-settings.php`.
    pub fn render_php(&self) -> String {
        let mut out = String::from("<?php\n// Generated by wp-bootstrap. Do not edit.\n\n");
        for binding in self.entries.iter().filter(|b| !b.preset) {
            let value = binding.value.to_php();
            let line = match binding.kind {
                BindingKind::Global => format!("${} = {};\n", binding.name, value),
                BindingKind::Constant if binding.name == ABSPATH => format!(
                    "if ( ! defined( 'ABSPATH' ) ) {{\n    define( 'ABSPATH', {value} );\n}}\n"
                ),
                BindingKind::Constant => {
                    format!("define( {}, {} );\n", php_quote(&binding.name), value)
                }
            };
            out.push_str(&line);
        }
        out.push_str("\nrequire_once ABSPATH . 'wp-settings.php';\n");
        out
    }
}

const ABSPATH: &str = "ABSPATH";

/// Single-quoted PHP string literal.
fn php_quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Emit `cfg` into a fresh binding set.
pub fn emit(cfg: &ResolvedConfig) -> Result<Bindings, BootstrapError> {
    emit_into(Bindings::new(), cfg)
}

/// Emit `cfg` on top of bindings the host already defines.
pub fn emit_into(
    mut bindings: Bindings,
    cfg: &ResolvedConfig,
) -> Result<Bindings, BootstrapError> {
    if cfg.db_host.trim().is_empty() {
        return Err(BootstrapError::MissingRequired("DB_HOST"));
    }

    bindings.define("DB_NAME", cfg.db_name.as_str())?;
    bindings.define("DB_USER", cfg.db_user.as_str())?;
    bindings.define("DB_PASSWORD", cfg.db_password.as_str())?;
    bindings.define("DB_HOST", cfg.db_host.as_str())?;
    bindings.define("DB_CHARSET", cfg.db_charset.as_str())?;
    bindings.define("DB_COLLATE", cfg.db_collate.as_str())?;

    for (name, value) in cfg.auth.bindings() {
        bindings.define(name, value)?;
    }

    bindings.set_global("table_prefix", cfg.table_prefix.as_str())?;

    bindings.define("WP_DEBUG", cfg.debug)?;
    bindings.define("WP_DEBUG_LOG", cfg.debug_log)?;
    bindings.define("WP_DEBUG_DISPLAY", cfg.debug_display)?;
    bindings.define("WP_SITEURL", cfg.site_url.as_str())?;
    bindings.define("WP_HOME", cfg.home_url.as_str())?;
    bindings.define("WP_MEMORY_LIMIT", cfg.memory_limit.as_str())?;
    bindings.define("AUTOMATIC_UPDATER_DISABLED", cfg.auto_updates_disabled)?;

    if !bindings.define_if_absent(ABSPATH, cfg.abspath.as_str()) {
        debug!("ABSPATH already defined, keeping existing value");
    }

    Ok(bindings)
}
