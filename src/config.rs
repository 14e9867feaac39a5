// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! This module defines environment variable names, fixed paths and default
//! values used by the bootstrap. Values are resolved once at startup through
//! the [`crate::resolver`] source chain.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `MYSQL_DATABASE` | Database name | `wordpress` |
//! | `MYSQL_USER` | Database user | `wordpress` |
//! | `DOMAIN_NAME` | Public domain used for site and home URLs | `localhost` |
//! | `WORDPRESS_AUTH_KEY` .. `WORDPRESS_NONCE_SALT` | Auth keys and salts | placeholder |
//! | `WORDPRESS_PATH` | Install directory bound as `ABSPATH` | `/var/www/html/` |
//! | `WP_CONFIG_OUTPUT` | Where to write the rendered PHP bindings | not written |
//! | `HOST` | Diagnostics server bind address | `0.0.0.0` |
//! | `PORT` | Diagnostics server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info` |
//!
//! The database password never comes from the environment; it is read from
//! [`DB_PASSWORD_SECRET_PATH`].

use std::net::SocketAddr;

/// Environment variable holding the database name.
pub const MYSQL_DATABASE_ENV: &str = "MYSQL_DATABASE";

/// Environment variable holding the database user.
pub const MYSQL_USER_ENV: &str = "MYSQL_USER";

/// Environment variable holding the public domain name.
pub const DOMAIN_NAME_ENV: &str = "DOMAIN_NAME";

/// Environment variable overriding the `ABSPATH` binding.
pub const WORDPRESS_PATH_ENV: &str = "WORDPRESS_PATH";

/// Environment variable naming a file to receive the rendered PHP bindings.
pub const WP_CONFIG_OUTPUT_ENV: &str = "WP_CONFIG_OUTPUT";

/// Site title handed to the installer. Reported by `/debug/env` only.
pub const WP_TITLE_ENV: &str = "WP_TITLE";

/// Site URL handed to the installer. Reported by `/debug/env` only.
pub const WP_URL_ENV: &str = "WP_URL";

pub const AUTH_KEY_ENV: &str = "WORDPRESS_AUTH_KEY";
pub const SECURE_AUTH_KEY_ENV: &str = "WORDPRESS_SECURE_AUTH_KEY";
pub const LOGGED_IN_KEY_ENV: &str = "WORDPRESS_LOGGED_IN_KEY";
pub const NONCE_KEY_ENV: &str = "WORDPRESS_NONCE_KEY";
pub const AUTH_SALT_ENV: &str = "WORDPRESS_AUTH_SALT";
pub const SECURE_AUTH_SALT_ENV: &str = "WORDPRESS_SECURE_AUTH_SALT";
pub const LOGGED_IN_SALT_ENV: &str = "WORDPRESS_LOGGED_IN_SALT";
pub const NONCE_SALT_ENV: &str = "WORDPRESS_NONCE_SALT";

/// Diagnostics server bind address.
pub const HOST_ENV: &str = "HOST";

/// Diagnostics server bind port.
pub const PORT_ENV: &str = "PORT";

/// Log output format selector.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Mounted secret holding the database password.
///
/// Docker/Compose secrets land under `/run/secrets`; the file is plain text
/// and usually newline-terminated.
pub const DB_PASSWORD_SECRET_PATH: &str = "/run/secrets/db_password";

pub const DEFAULT_DB_NAME: &str = "wordpress";
pub const DEFAULT_DB_USER: &str = "wordpress";

/// Password used when the secret file is missing, empty or unreadable.
pub const DEFAULT_DB_PASSWORD: &str = "wordpress";

pub const DEFAULT_DOMAIN: &str = "localhost";

/// Placeholder WordPress ships in `wp-config-sample.php`.
pub const DEFAULT_AUTH_PHRASE: &str = "put your unique phrase here";

pub const DEFAULT_WORDPRESS_PATH: &str = "/var/www/html/";

/// Database host; the compose service name of the database container.
pub const DB_HOST: &str = "mariadb";
pub const DB_CHARSET: &str = "utf8";
pub const DB_COLLATE: &str = "";
pub const TABLE_PREFIX: &str = "wp_";
pub const MEMORY_LIMIT: &str = "256M";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Bind configuration for the diagnostics server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Read `HOST` and `PORT`, falling back to `0.0.0.0:8080`.
    ///
    /// An unparsable port is ignored rather than rejected.
    pub fn from_env() -> Self {
        let host = std::env::var(HOST_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = std::env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self { host, port }
    }

    /// Socket address to bind, if `host:port` parses.
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        format!("{}:{}", self.host, self.port).parse().ok()
    }
}
