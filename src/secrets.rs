// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Secret loading from mounted files.
//!
//! Secrets such as the database password are provisioned as files (Docker or
//! Compose secrets under `/run/secrets`) rather than environment variables.
//! A missing secret is never fatal: first-time local setups run before any
//! secret exists, so every failure collapses to the caller's fallback.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};
use utoipa::ToSchema;

/// Why a secret file could not be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SecretMiss {
    NotFound,
    Empty,
    Unreadable,
}

/// Result of one secret load: the value to use and, if the fallback was
/// taken, why.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretLoad {
    pub value: String,
    pub miss: Option<SecretMiss>,
}

impl std::fmt::Debug for SecretLoad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretLoad")
            .field("len", &self.value.len())
            .field("miss", &self.miss)
            .finish()
    }
}

/// Read `path` once and return its trimmed contents.
///
/// Returns `fallback` when the file is missing, unreadable, or contains only
/// whitespace.
pub fn load_secret(path: impl AsRef<Path>, fallback: &str) -> String {
    load_secret_reporting(path, fallback).value
}

/// [`load_secret`], keeping the reason a fallback was used.
pub fn load_secret_reporting(path: impl AsRef<Path>, fallback: &str) -> SecretLoad {
    let path = path.as_ref();
    match read_secret(path) {
        Ok(value) => {
            info!(path = %path.display(), len = value.len(), "Loaded secret file");
            SecretLoad { value, miss: None }
        }
        Err(miss) => {
            warn!(
                path = %path.display(),
                reason = ?miss,
                fallback_len = fallback.len(),
                "Secret file unusable, using fallback"
            );
            SecretLoad {
                value: fallback.to_string(),
                miss: Some(miss),
            }
        }
    }
}

/// Single read-and-trim, with every failure classified.
pub fn read_secret(path: &Path) -> Result<String, SecretMiss> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => SecretMiss::NotFound,
        _ => SecretMiss::Unreadable,
    })?;

    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SecretMiss::Empty);
    }
    Ok(trimmed.to_string())
}
