// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::bootstrap::Prepared;
use crate::models::ResolvedConfig;
use crate::resolver::EnvSnapshot;
use crate::secrets::SecretMiss;

/// Shared, read-only state for the diagnostics router.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ResolvedConfig>,
    pub secret_miss: Option<SecretMiss>,
    pub binding_names: Arc<Vec<String>>,
    /// Environment as captured at startup.
    pub snapshot: Arc<EnvSnapshot>,
}

impl AppState {
    pub fn new(prepared: Prepared, snapshot: Arc<EnvSnapshot>) -> Self {
        let binding_names = prepared
            .bindings
            .iter()
            .map(|b| b.name.clone())
            .collect();
        Self {
            config: Arc::new(prepared.config),
            secret_miss: prepared.secret_miss,
            binding_names: Arc::new(binding_names),
            snapshot,
        }
    }
}
