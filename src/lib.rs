// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! wp-bootstrap - WordPress Configuration Bootstrap
//!
//! Resolves database credentials, the public domain and auth secrets from
//! the container environment and mounted secret files, emits them as the
//! configuration bindings WordPress expects, then hands control to the
//! downstream process.
//!
//! ## Modules
//!
//! - `resolver` - Credential gatherer and its lookup sources
//! - `secrets` - Secret file loading
//! - `proxy` - Per-request `X-Forwarded-Proto` normalization
//! - `emitter` - Named configuration bindings and their rendering
//! - `bootstrap` - The startup pass tying the stages together
//! - `delegate` - Hand-off to the downstream command or diagnostics server
//! - `api` - Diagnostics HTTP handlers (Axum)

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod delegate;
pub mod emitter;
pub mod error;
pub mod models;
pub mod proxy;
pub mod resolver;
pub mod secrets;
pub mod state;
pub mod telemetry;
