// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Declarative table of every variable the bootstrap gathers.

use crate::config::*;

/// A gathered variable and its fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableSpec {
    pub name: &'static str,
    pub default: &'static str,
    /// Logged and displayed by length only.
    pub sensitive: bool,
}

impl VariableSpec {
    const fn plain(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            sensitive: false,
        }
    }

    const fn secret(name: &'static str, default: &'static str) -> Self {
        Self {
            name,
            default,
            sensitive: true,
        }
    }
}

pub const DB_NAME_VAR: VariableSpec = VariableSpec::plain(MYSQL_DATABASE_ENV, DEFAULT_DB_NAME);
pub const DB_USER_VAR: VariableSpec = VariableSpec::plain(MYSQL_USER_ENV, DEFAULT_DB_USER);
pub const DOMAIN_VAR: VariableSpec = VariableSpec::plain(DOMAIN_NAME_ENV, DEFAULT_DOMAIN);
pub const WORDPRESS_PATH_VAR: VariableSpec =
    VariableSpec::plain(WORDPRESS_PATH_ENV, DEFAULT_WORDPRESS_PATH);

/// Auth keys and salts, in the order WordPress declares them.
pub const AUTH_SECRET_VARS: [VariableSpec; 8] = [
    VariableSpec::secret(AUTH_KEY_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(SECURE_AUTH_KEY_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(LOGGED_IN_KEY_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(NONCE_KEY_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(AUTH_SALT_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(SECURE_AUTH_SALT_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(LOGGED_IN_SALT_ENV, DEFAULT_AUTH_PHRASE),
    VariableSpec::secret(NONCE_SALT_ENV, DEFAULT_AUTH_PHRASE),
];

/// Installer settings that are reported by diagnostics but never bound.
pub const INSTALLER_VARS: [VariableSpec; 2] = [
    VariableSpec::plain(WP_TITLE_ENV, ""),
    VariableSpec::plain(WP_URL_ENV, ""),
];

/// Name fragments that mark an arbitrary variable as secret.
const SECRET_MARKERS: [&str; 7] = [
    "PASSWORD",
    "SECRET",
    "TOKEN",
    "KEY",
    "SALT",
    "AUTHORIZATION",
    "COOKIE",
];

/// Whether a variable outside the table should be shown by length only.
///
/// Sensitive table entries always are; other names are matched
/// case-insensitively against common secret markers.
pub fn is_secret_key(name: &str) -> bool {
    if variable_table().iter().any(|v| v.sensitive && v.name == name) {
        return true;
    }
    let upper = name.to_ascii_uppercase();
    SECRET_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Everything resolved through the source chain, for diagnostics.
pub fn variable_table() -> Vec<VariableSpec> {
    let mut table = vec![DB_NAME_VAR, DB_USER_VAR, DOMAIN_VAR, WORDPRESS_PATH_VAR];
    table.extend(AUTH_SECRET_VARS);
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_are_unique() {
        let table = variable_table();
        let mut names: Vec<_> = table.iter().map(|v| v.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), table.len());
    }

    #[test]
    fn every_default_is_non_empty() {
        assert!(variable_table().iter().all(|v| !v.default.is_empty()));
    }

    #[test]
    fn secret_keys_are_recognized_by_name() {
        assert!(is_secret_key(AUTH_KEY_ENV));
        assert!(is_secret_key("DB_ROOT_PASSWORD"));
        assert!(is_secret_key("HTTP_AUTHORIZATION"));
        assert!(is_secret_key("github_token"));
        assert!(!is_secret_key(MYSQL_USER_ENV));
        assert!(!is_secret_key(WP_TITLE_ENV));
        assert!(!is_secret_key("HTTP_X_FORWARDED_PROTO"));
    }

    #[test]
    fn installer_vars_are_plain() {
        assert!(INSTALLER_VARS.iter().all(|v| !v.sensitive));
        assert!(!variable_table().contains(&INSTALLER_VARS[0]));
    }

    #[test]
    fn only_auth_secrets_are_sensitive() {
        let sensitive: Vec<_> = variable_table()
            .into_iter()
            .filter(|v| v.sensitive)
            .map(|v| v.name)
            .collect();
        assert_eq!(sensitive.len(), 8);
        assert!(sensitive.iter().all(|n| n.starts_with("WORDPRESS_") && *n != WORDPRESS_PATH_ENV));
    }
}
