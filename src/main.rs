// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use tracing::error;

use wp_bootstrap::bootstrap::Bootstrap;
use wp_bootstrap::config::{ServerConfig, WP_CONFIG_OUTPUT_ENV};
use wp_bootstrap::delegate::{ExecDelegate, ServeDelegate};
use wp_bootstrap::resolver::{ContextVars, CredentialGatherer, EnvSnapshot};
use wp_bootstrap::telemetry::{init_tracing, LogFormat};

fn main() -> ExitCode {
    init_tracing(LogFormat::from_env());

    let gatherer = CredentialGatherer::from_process(ContextVars::default());
    let mut bootstrap = Bootstrap::new(gatherer);
    if let Some(path) = std::env::var_os(WP_CONFIG_OUTPUT_ENV).filter(|p| !p.is_empty()) {
        bootstrap = bootstrap.with_config_output(path);
    }

    // Trailing arguments name the downstream command, e.g. `php-fpm -F`.
    let result = match ExecDelegate::from_command_line(std::env::args_os().skip(1)) {
        Some(exec) => bootstrap.run(&exec),
        None => bootstrap.run(&ServeDelegate::new(
            ServerConfig::from_env(),
            EnvSnapshot::capture(),
        )),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.binding() {
                Some(binding) => error!(binding, error = %e, "Bootstrap failed"),
                None => error!(error = %e, "Bootstrap failed"),
            }
            ExitCode::FAILURE
        }
    }
}
