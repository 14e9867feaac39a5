// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Resolved Configuration
//!
//! The immutable record produced by one bootstrap pass and handed to the
//! emitter. It is built once and never mutated; `Debug` output redacts the
//! database password and every auth key and salt.

use serde::Serialize;

use crate::config::{DB_CHARSET, DB_COLLATE, DB_HOST, MEMORY_LIMIT, TABLE_PREFIX};

const REDACTED: &str = "<redacted>";

// =============================================================================
// Auth Secrets
// =============================================================================

/// The eight keys and salts WordPress uses to sign cookies and nonces.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthSecrets {
    pub auth_key: String,
    pub secure_auth_key: String,
    pub logged_in_key: String,
    pub nonce_key: String,
    pub auth_salt: String,
    pub secure_auth_salt: String,
    pub logged_in_salt: String,
    pub nonce_salt: String,
}

impl AuthSecrets {
    /// Build from values in WordPress declaration order.
    pub fn from_ordered(values: [String; 8]) -> Self {
        let [
            auth_key,
            secure_auth_key,
            logged_in_key,
            nonce_key,
            auth_salt,
            secure_auth_salt,
            logged_in_salt,
            nonce_salt,
        ] = values;
        Self {
            auth_key,
            secure_auth_key,
            logged_in_key,
            nonce_key,
            auth_salt,
            secure_auth_salt,
            logged_in_salt,
            nonce_salt,
        }
    }

    /// `(constant name, value)` pairs in declaration order.
    pub fn bindings(&self) -> [(&'static str, &str); 8] {
        [
            ("AUTH_KEY", self.auth_key.as_str()),
            ("SECURE_AUTH_KEY", self.secure_auth_key.as_str()),
            ("LOGGED_IN_KEY", self.logged_in_key.as_str()),
            ("NONCE_KEY", self.nonce_key.as_str()),
            ("AUTH_SALT", self.auth_salt.as_str()),
            ("SECURE_AUTH_SALT", self.secure_auth_salt.as_str()),
            ("LOGGED_IN_SALT", self.logged_in_salt.as_str()),
            ("NONCE_SALT", self.nonce_salt.as_str()),
        ]
    }
}

impl std::fmt::Debug for AuthSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("AuthSecrets");
        for (name, _) in self.bindings() {
            s.field(name, &REDACTED);
        }
        s.finish()
    }
}

// =============================================================================
// Resolved Config
// =============================================================================

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedConfig {
    pub db_name: String,
    pub db_user: String,
    #[serde(skip_serializing)]
    pub db_password: String,
    pub db_host: String,
    pub db_charset: String,
    pub db_collate: String,
    pub domain: String,
    pub site_url: String,
    pub home_url: String,
    pub table_prefix: String,
    #[serde(skip_serializing)]
    pub auth: AuthSecrets,
    pub debug: bool,
    pub debug_log: bool,
    pub debug_display: bool,
    pub memory_limit: String,
    pub auto_updates_disabled: bool,
    /// Install directory, bound as `ABSPATH` unless already defined.
    pub abspath: String,
}

/// Values gathered from sources; everything else in [`ResolvedConfig`] is fixed.
#[derive(Debug, Clone)]
pub struct GatheredValues {
    pub db_name: String,
    pub db_user: String,
    pub db_password: String,
    pub domain: String,
    pub auth: AuthSecrets,
    pub abspath: String,
}

impl ResolvedConfig {
    /// Combine gathered values with the fixed settings and derived URLs.
    pub fn assemble(values: GatheredValues, site_url: String) -> Self {
        Self {
            db_name: values.db_name,
            db_user: values.db_user,
            db_password: values.db_password,
            db_host: DB_HOST.to_string(),
            db_charset: DB_CHARSET.to_string(),
            db_collate: DB_COLLATE.to_string(),
            domain: values.domain,
            home_url: site_url.clone(),
            site_url,
            table_prefix: TABLE_PREFIX.to_string(),
            auth: values.auth,
            debug: true,
            debug_log: true,
            debug_display: false,
            memory_limit: MEMORY_LIMIT.to_string(),
            auto_updates_disabled: true,
            abspath: values.abspath,
        }
    }
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &REDACTED)
            .field("db_host", &self.db_host)
            .field("db_charset", &self.db_charset)
            .field("db_collate", &self.db_collate)
            .field("domain", &self.domain)
            .field("site_url", &self.site_url)
            .field("home_url", &self.home_url)
            .field("table_prefix", &self.table_prefix)
            .field("auth", &self.auth)
            .field("debug", &self.debug)
            .field("debug_log", &self.debug_log)
            .field("debug_display", &self.debug_display)
            .field("memory_limit", &self.memory_limit)
            .field("auto_updates_disabled", &self.auto_updates_disabled)
            .field("abspath", &self.abspath)
            .finish()
    }
}
