// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Bootstrap Pass
//!
//! One linear pass per process:
//!
//! ```text
//! Start -> GatherCredentials -> LoadSecret -> BuildUrls -> Emit -> Delegate
//! ```
//!
//! Stages only move forward. A secret that cannot be read moves on with its
//! fallback; the only way to stop is a fatal [`BootstrapError`] from `Emit`
//! (or from the delegate itself). A [`Bootstrap`] runs its pass once; asking
//! it to go through the stages again is [`BootstrapError::StageReentry`].

use std::fs;
use std::path::PathBuf;

use tracing::{info, warn};
use url::Url;

use crate::config::{DB_PASSWORD_SECRET_PATH, DEFAULT_DB_PASSWORD};
use crate::delegate::Delegate;
use crate::emitter::{emit_into, Bindings};
use crate::error::BootstrapError;
use crate::models::{AuthSecrets, GatheredValues, ResolvedConfig};
use crate::resolver::table::{
    AUTH_SECRET_VARS, DB_NAME_VAR, DB_USER_VAR, DOMAIN_VAR, WORDPRESS_PATH_VAR,
};
use crate::resolver::CredentialGatherer;
use crate::secrets::{load_secret_reporting, SecretMiss};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Start,
    GatherCredentials,
    LoadSecret,
    BuildUrls,
    Emit,
    Delegate,
}

/// Output of a successful pass, ready for hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prepared {
    pub config: ResolvedConfig,
    pub bindings: Bindings,
    /// Set when the password fell back to its default.
    pub secret_miss: Option<SecretMiss>,
}

#[derive(Debug)]
pub struct Bootstrap {
    gatherer: CredentialGatherer,
    secret_path: PathBuf,
    preset: Bindings,
    config_output: Option<PathBuf>,
    stage: Stage,
}

impl Bootstrap {
    pub fn new(gatherer: CredentialGatherer) -> Self {
        Self {
            gatherer,
            secret_path: PathBuf::from(DB_PASSWORD_SECRET_PATH),
            preset: Bindings::new(),
            config_output: None,
            stage: Stage::Start,
        }
    }

    pub fn with_secret_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.secret_path = path.into();
        self
    }

    /// Bindings the host defined before the bootstrap ran.
    pub fn with_preset(mut self, preset: Bindings) -> Self {
        self.preset = preset;
        self
    }

    /// Also write the rendered PHP bindings to `path` during `Emit`.
    pub fn with_config_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_output = Some(path.into());
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) -> Result<(), BootstrapError> {
        if next <= self.stage {
            return Err(BootstrapError::StageReentry {
                from: self.stage,
                to: next,
            });
        }
        info!(from = ?self.stage, to = ?next, "Bootstrap stage");
        self.stage = next;
        Ok(())
    }

    /// Run every stage up to and including `Emit`.
    ///
    /// Fails with [`BootstrapError::StageReentry`] if the pass already ran.
    pub fn prepare(&mut self) -> Result<Prepared, BootstrapError> {
        self.advance(Stage::GatherCredentials)?;
        let db_name = self.gatherer.resolve_spec(&DB_NAME_VAR);
        let db_user = self.gatherer.resolve_spec(&DB_USER_VAR);
        let domain = self.gatherer.resolve_spec(&DOMAIN_VAR);
        let abspath = self.gatherer.resolve_spec(&WORDPRESS_PATH_VAR);
        let auth = AuthSecrets::from_ordered(
            AUTH_SECRET_VARS.map(|spec| self.gatherer.resolve_spec(&spec)),
        );

        self.advance(Stage::LoadSecret)?;
        let secret = load_secret_reporting(&self.secret_path, DEFAULT_DB_PASSWORD);

        self.advance(Stage::BuildUrls)?;
        let site_url = build_site_url(&domain);

        let config = ResolvedConfig::assemble(
            GatheredValues {
                db_name,
                db_user,
                db_password: secret.value,
                domain,
                auth,
                abspath,
            },
            site_url,
        );

        self.advance(Stage::Emit)?;
        let bindings = emit_into(self.preset.clone(), &config)?;
        if let Some(path) = &self.config_output {
            fs::write(path, bindings.render_php()).map_err(|source| {
                BootstrapError::WriteBindings {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(path = %path.display(), count = bindings.len(), "Wrote PHP bindings");
        }

        info!(
            db_name = %config.db_name,
            db_user = %config.db_user,
            db_host = %config.db_host,
            site_url = %config.site_url,
            bindings = bindings.len(),
            "Configuration resolved"
        );

        Ok(Prepared {
            config,
            bindings,
            secret_miss: secret.miss,
        })
    }

    /// Prepare and hand control to `delegate`.
    ///
    /// Returns only if the delegate finishes or something failed.
    pub fn run<D: Delegate>(mut self, delegate: &D) -> Result<(), BootstrapError> {
        let prepared = self.prepare()?;
        self.advance(Stage::Delegate)?;
        delegate.hand_off(prepared)
    }
}

/// `https://<domain>`. The URL is checked but never rejected.
pub fn build_site_url(domain: &str) -> String {
    let url = format!("https://{domain}");
    if let Err(e) = Url::parse(&url) {
        warn!(domain, error = %e, "Site URL does not parse, using it anyway");
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::sync::Arc;

    use crate::resolver::{ContextVars, EnvSnapshot, NoopObserver};

    fn gatherer(env: &[(&str, &str)]) -> CredentialGatherer {
        CredentialGatherer::new(vec![
            Box::new(EnvSnapshot::from_pairs(env.iter().copied())),
            Box::new(ContextVars::default()),
        ])
        .with_observer(Arc::new(NoopObserver))
    }

    fn secret(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_scenario_resolves_every_field() {
        let file = secret("s3cr3t\n");
        let mut bootstrap = Bootstrap::new(gatherer(&[
            ("MYSQL_DATABASE", "wpdb"),
            ("MYSQL_USER", "wpuser"),
            ("DOMAIN_NAME", "example.com"),
        ]))
        .with_secret_path(file.path());

        let prepared = bootstrap.prepare().unwrap();
        let cfg = &prepared.config;
        assert_eq!(cfg.db_name, "wpdb");
        assert_eq!(cfg.db_user, "wpuser");
        assert_eq!(cfg.db_password, "s3cr3t");
        assert_eq!(cfg.site_url, "https://example.com");
        assert_eq!(cfg.home_url, "https://example.com");
        assert!(prepared.secret_miss.is_none());
        assert_eq!(bootstrap.stage(), Stage::Emit);
    }

    #[test]
    fn no_sources_uses_documented_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut bootstrap =
            Bootstrap::new(gatherer(&[])).with_secret_path(dir.path().join("db_password"));

        let prepared = bootstrap.prepare().unwrap();
        let cfg = &prepared.config;
        assert_eq!(cfg.db_name, "wordpress");
        assert_eq!(cfg.db_user, "wordpress");
        assert_eq!(cfg.db_password, DEFAULT_DB_PASSWORD);
        assert_eq!(cfg.domain, "localhost");
        assert_eq!(cfg.site_url, "https://localhost");
        assert_eq!(cfg.abspath, "/var/www/html/");
        assert_eq!(cfg.auth.auth_key, "put your unique phrase here");
        assert_eq!(prepared.secret_miss, Some(SecretMiss::NotFound));
    }

    #[test]
    fn empty_secret_file_uses_fallback() {
        let file = secret("");
        let mut bootstrap = Bootstrap::new(gatherer(&[])).with_secret_path(file.path());
        let prepared = bootstrap.prepare().unwrap();
        assert_eq!(prepared.config.db_password, DEFAULT_DB_PASSWORD);
        assert!(!prepared.config.db_password.is_empty());
    }

    #[test]
    fn auth_secrets_come_from_sources() {
        let dir = tempfile::tempdir().unwrap();
        let mut bootstrap = Bootstrap::new(gatherer(&[
            ("WORDPRESS_AUTH_KEY", "ak"),
            ("WORDPRESS_NONCE_SALT", "ns"),
        ]))
        .with_secret_path(dir.path().join("missing"));

        let cfg = bootstrap.prepare().unwrap().config;
        assert_eq!(cfg.auth.auth_key, "ak");
        assert_eq!(cfg.auth.nonce_salt, "ns");
        assert_eq!(cfg.auth.secure_auth_key, "put your unique phrase here");
    }

    #[test]
    fn identical_inputs_give_identical_results() {
        let file = secret("s3cr3t\n");
        let env = [("MYSQL_DATABASE", "wpdb"), ("DOMAIN_NAME", "example.com")];

        let first = Bootstrap::new(gatherer(&env))
            .with_secret_path(file.path())
            .prepare()
            .unwrap();
        let second = Bootstrap::new(gatherer(&env))
            .with_secret_path(file.path())
            .prepare()
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn second_prepare_does_not_rerun_the_pass() {
        let file = secret("s3cr3t\n");
        let mut bootstrap =
            Bootstrap::new(gatherer(&[("MYSQL_DATABASE", "wpdb")])).with_secret_path(file.path());

        bootstrap.prepare().unwrap();
        let err = bootstrap.prepare().unwrap_err();
        assert!(matches!(
            err,
            BootstrapError::StageReentry {
                from: Stage::Emit,
                to: Stage::GatherCredentials
            }
        ));
        assert_eq!(bootstrap.stage(), Stage::Emit);
    }

    #[test]
    fn writes_php_bindings_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("wp-config.php");
        Bootstrap::new(gatherer(&[("MYSQL_DATABASE", "wpdb")]))
            .with_secret_path(dir.path().join("missing"))
            .with_config_output(&out)
            .prepare()
            .unwrap();

        let php = fs::read_to_string(&out).unwrap();
        assert!(php.contains("define( 'DB_NAME', 'wpdb' );"));
    }

    #[test]
    fn unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = Bootstrap::new(gatherer(&[]))
            .with_secret_path(dir.path().join("missing"))
            .with_config_output(dir.path().join("no/such/dir/wp-config.php"))
            .prepare()
            .unwrap_err();
        assert!(matches!(err, BootstrapError::WriteBindings { .. }));
    }

    #[test]
    fn preset_collision_stops_before_delegate() {
        struct Recording(RefCell<bool>);
        impl Delegate for Recording {
            fn hand_off(&self, _prepared: Prepared) -> Result<(), BootstrapError> {
                *self.0.borrow_mut() = true;
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let delegate = Recording(RefCell::new(false));
        let result = Bootstrap::new(gatherer(&[]))
            .with_secret_path(dir.path().join("missing"))
            .with_preset(Bindings::with_preset([("WP_HOME", "https://other")]))
            .run(&delegate);

        assert!(matches!(result, Err(BootstrapError::Collision(ref n)) if n == "WP_HOME"));
        assert!(!*delegate.0.borrow());
    }

    #[test]
    fn missing_secret_still_reaches_delegate() {
        struct Capture(RefCell<Option<Prepared>>);
        impl Delegate for Capture {
            fn hand_off(&self, prepared: Prepared) -> Result<(), BootstrapError> {
                *self.0.borrow_mut() = Some(prepared);
                Ok(())
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let delegate = Capture(RefCell::new(None));
        Bootstrap::new(gatherer(&[]))
            .with_secret_path(dir.path().join("missing"))
            .run(&delegate)
            .unwrap();

        let prepared = delegate.0.borrow_mut().take().unwrap();
        assert_eq!(
            prepared.bindings.get("DB_PASSWORD").and_then(|v| v.as_str()),
            Some(DEFAULT_DB_PASSWORD)
        );
    }

    #[test]
    fn odd_domains_still_build_a_url() {
        assert_eq!(build_site_url("example.com:8443"), "https://example.com:8443");
        assert_eq!(build_site_url(""), "https://");
    }
}
