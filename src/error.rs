// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fatal bootstrap errors.
//!
//! Missing environment variables and missing secrets are never errors; they
//! resolve to defaults. Only the cases below stop the process before the
//! downstream application receives control.

use std::io;
use std::path::PathBuf;

use crate::bootstrap::Stage;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    /// A structurally required binding resolved to nothing.
    #[error("required binding {0} is empty")]
    MissingRequired(&'static str),

    /// The binding was already defined before emission.
    #[error("binding {0} is already defined")]
    Collision(String),

    /// The pass was asked to revisit a stage it already left.
    #[error("bootstrap cannot move from {from:?} back to {to:?}")]
    StageReentry { from: Stage, to: Stage },

    #[error("failed to write bindings to {}: {source}", path.display())]
    WriteBindings {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to exec downstream command {program}: {source}")]
    Exec {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),

    #[error("diagnostics server failed: {0}")]
    Server(#[source] io::Error),
}

impl BootstrapError {
    /// Name of the binding at fault, when the failure concerns one.
    pub fn binding(&self) -> Option<&str> {
        match self {
            BootstrapError::MissingRequired(name) => Some(name),
            BootstrapError::Collision(name) => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binding_errors_name_the_binding() {
        let missing = BootstrapError::MissingRequired("DB_HOST");
        assert_eq!(missing.binding(), Some("DB_HOST"));
        assert_eq!(missing.to_string(), "required binding DB_HOST is empty");

        let collision = BootstrapError::Collision("DB_NAME".to_string());
        assert_eq!(collision.binding(), Some("DB_NAME"));
        assert_eq!(collision.to_string(), "binding DB_NAME is already defined");
    }

    #[test]
    fn stage_reentry_names_both_stages() {
        let err = BootstrapError::StageReentry {
            from: Stage::Emit,
            to: Stage::GatherCredentials,
        };
        assert!(err.binding().is_none());
        assert_eq!(
            err.to_string(),
            "bootstrap cannot move from Emit back to GatherCredentials"
        );
    }

    #[test]
    fn io_errors_carry_no_binding() {
        let err = BootstrapError::Server(io::Error::new(io::ErrorKind::AddrInUse, "busy"));
        assert!(err.binding().is_none());
    }
}
