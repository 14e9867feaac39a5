// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hand-off to the downstream entry point.
//!
//! - [`ExecDelegate`] replaces this process with the downstream command
//!   (typically `php-fpm -F`), passing the emitted bindings in its
//!   environment.
//! - [`ServeDelegate`] runs the built-in diagnostics server when there is no
//!   downstream command.

use std::ffi::{OsStr, OsString};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::api::router;
use crate::bootstrap::Prepared;
use crate::config::ServerConfig;
use crate::error::BootstrapError;
use crate::resolver::EnvSnapshot;
use crate::state::AppState;

/// Downstream entry point that receives control after emission.
pub trait Delegate {
    /// Take over the process. Returns `Ok` only if the downstream finished on
    /// its own; a successful exec never returns.
    fn hand_off(&self, prepared: Prepared) -> Result<(), BootstrapError>;
}

/// Exec a downstream command with the bindings in its environment.
///
/// Program and arguments are kept as [`OsString`]s and passed through
/// untouched, whether or not they are valid UTF-8.
#[derive(Debug, Clone)]
pub struct ExecDelegate {
    program: OsString,
    args: Vec<OsString>,
}

impl ExecDelegate {
    pub fn new<A>(program: impl Into<OsString>, args: impl IntoIterator<Item = A>) -> Self
    where
        A: Into<OsString>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// From `argv`-style input; `None` when empty.
    pub fn from_command_line(mut argv: impl Iterator<Item = OsString>) -> Option<Self> {
        let program = argv.next()?;
        Some(Self::new(program, argv))
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    fn exec_error(&self, source: std::io::Error) -> BootstrapError {
        BootstrapError::Exec {
            program: self.program.to_string_lossy().into_owned(),
            source,
        }
    }

    fn command(&self, prepared: &Prepared) -> std::process::Command {
        let mut command = std::process::Command::new(&self.program);
        command.args(&self.args).envs(prepared.bindings.env_pairs());
        command
    }
}

impl Delegate for ExecDelegate {
    #[cfg(unix)]
    fn hand_off(&self, prepared: Prepared) -> Result<(), BootstrapError> {
        use std::os::unix::process::CommandExt;

        info!(program = ?self.program, args = ?self.args, "Handing off to downstream command");
        // exec only returns on failure.
        let source = self.command(&prepared).exec();
        Err(self.exec_error(source))
    }

    #[cfg(not(unix))]
    fn hand_off(&self, prepared: Prepared) -> Result<(), BootstrapError> {
        info!(program = ?self.program, args = ?self.args, "Handing off to downstream command");
        let status = self
            .command(&prepared)
            .status()
            .map_err(|source| self.exec_error(source))?;
        std::process::exit(status.code().unwrap_or(1));
    }
}

/// Serve the diagnostics router until a shutdown signal.
#[derive(Debug, Clone)]
pub struct ServeDelegate {
    server: ServerConfig,
    snapshot: Arc<EnvSnapshot>,
}

impl ServeDelegate {
    pub fn new(server: ServerConfig, snapshot: EnvSnapshot) -> Self {
        Self {
            server,
            snapshot: Arc::new(snapshot),
        }
    }
}

impl Delegate for ServeDelegate {
    fn hand_off(&self, prepared: Prepared) -> Result<(), BootstrapError> {
        let addr = self.server.socket_addr().ok_or_else(|| {
            BootstrapError::InvalidBindAddress(format!("{}:{}", self.server.host, self.server.port))
        })?;
        let state = AppState::new(prepared, self.snapshot.clone());

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(BootstrapError::Server)?;

        runtime.block_on(async move {
            let shutdown = CancellationToken::new();
            tokio::spawn(cancel_on_signal(shutdown.clone()));

            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .map_err(BootstrapError::Server)?;
            info!(%addr, "Diagnostics server listening (no downstream command given)");

            axum::serve(listener, router(state))
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
                .map_err(BootstrapError::Server)?;

            info!("Diagnostics server shut down");
            Ok::<(), BootstrapError>(())
        })
    }
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
    shutdown.cancel();
}
