// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Debug endpoints showing how configuration was resolved.
//!
//! Sensitive values (auth keys and salts, the database password, anything
//! whose name looks like a secret) are never returned; only their length is.

use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::proxy::{ConnectionSecurity, FORWARDED_PROTO_HEADER};
use crate::resolver::{
    is_secret_key, variable_table, ContextVars, CredentialGatherer, NoopObserver, ProcessEnv,
    Source, VariableSpec, INSTALLER_VARS,
};
use crate::secrets::SecretMiss;
use crate::state::AppState;

/// One source's answer for a variable.
#[derive(Debug, Serialize, ToSchema)]
pub struct SourceReport {
    pub source: String,
    /// `unset`, `empty` or `set`.
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub len: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VariableReport {
    pub name: String,
    pub sensitive: bool,
    pub sources: Vec<SourceReport>,
    /// Source that would satisfy a lookup now; absent means the default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,
    pub resolved_len: usize,
}

/// One variable held by a source, from the full listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct EnvEntry {
    pub source: String,
    pub name: String,
    pub sensitive: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub len: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EnvReport {
    /// Sources in lookup order.
    pub sources: Vec<String>,
    pub variables: Vec<VariableReport>,
    /// Every variable in the startup snapshot, then every request context
    /// variable, each sorted by name.
    pub all: Vec<EnvEntry>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigReport {
    pub db_name: String,
    pub db_user: String,
    pub db_host: String,
    pub domain: String,
    pub site_url: String,
    pub home_url: String,
    pub table_prefix: String,
    pub abspath: String,
    /// `secret_file` or `fallback`.
    pub password_source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_miss: Option<SecretMiss>,
    pub bindings: Vec<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RequestReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarded_proto: Option<String>,
    pub security: ConnectionSecurity,
    pub scheme: String,
    /// Base URL for this request's scheme and the configured domain.
    pub base_url: String,
}

fn report_variable(gatherer: &CredentialGatherer, spec: &VariableSpec) -> VariableReport {
    let answers = gatherer.probe(spec.name);
    let (resolved_value, resolved_from) = gatherer.resolve_with_source(spec);

    let sources = answers
        .iter()
        .map(|answer| {
            let (state, len) = match answer.value.as_deref() {
                None => ("unset", 0),
                Some("") => ("empty", 0),
                Some(v) => ("set", v.len()),
            };
            SourceReport {
                source: answer.source.clone(),
                state: state.to_string(),
                value: answer.value.clone().filter(|_| !spec.sensitive),
                len,
            }
        })
        .collect();

    VariableReport {
        name: spec.name.to_string(),
        sensitive: spec.sensitive,
        sources,
        resolved_from: resolved_from.map(str::to_string),
        resolved_len: resolved_value.len(),
        resolved: (!spec.sensitive).then_some(resolved_value),
    }
}

fn list_entries(source: &str, pairs: Vec<(&str, &str)>) -> Vec<EnvEntry> {
    pairs
        .into_iter()
        .map(|(name, value)| {
            let sensitive = is_secret_key(name);
            EnvEntry {
                source: source.to_string(),
                name: name.to_string(),
                sensitive,
                value: (!sensitive).then(|| value.to_string()),
                len: value.len(),
            }
        })
        .collect()
}

/// Per-source view of every gathered variable, plus a full listing of the
/// snapshot and request context.
///
/// Request headers are exposed as context variables (`HTTP_*`).
#[utoipa::path(
    get,
    path = "/debug/env",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Per-source variable report", body = EnvReport)
    )
)]
pub async fn env_report(State(state): State<AppState>, headers: HeaderMap) -> Json<EnvReport> {
    let snapshot = (*state.snapshot).clone();
    let context = ContextVars::from_headers(&headers);

    let mut all = list_entries(snapshot.name(), snapshot.sorted_pairs());
    all.extend(list_entries(context.name(), context.sorted_pairs()));

    let gatherer = CredentialGatherer::new(vec![
        Box::new(ProcessEnv),
        Box::new(snapshot),
        Box::new(context),
    ])
    .with_observer(std::sync::Arc::new(NoopObserver));

    let variables = variable_table()
        .iter()
        .chain(INSTALLER_VARS.iter())
        .map(|spec| report_variable(&gatherer, spec))
        .collect();

    Json(EnvReport {
        sources: gatherer
            .source_names()
            .into_iter()
            .map(str::to_string)
            .collect(),
        variables,
        all,
    })
}

/// The configuration resolved at startup, without secrets.
#[utoipa::path(
    get,
    path = "/debug/config",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Resolved configuration", body = ConfigReport)
    )
)]
pub async fn config_report(State(state): State<AppState>) -> Json<ConfigReport> {
    let cfg = &state.config;
    Json(ConfigReport {
        db_name: cfg.db_name.clone(),
        db_user: cfg.db_user.clone(),
        db_host: cfg.db_host.clone(),
        domain: cfg.domain.clone(),
        site_url: cfg.site_url.clone(),
        home_url: cfg.home_url.clone(),
        table_prefix: cfg.table_prefix.clone(),
        abspath: cfg.abspath.clone(),
        password_source: if state.secret_miss.is_some() {
            "fallback"
        } else {
            "secret_file"
        }
        .to_string(),
        secret_miss: state.secret_miss,
        bindings: state.binding_names.as_ref().clone(),
    })
}

/// How this request's connection security was normalized.
#[utoipa::path(
    get,
    path = "/debug/request",
    tag = "Diagnostics",
    responses(
        (status = 200, description = "Request security report", body = RequestReport)
    )
)]
pub async fn request_report(
    State(state): State<AppState>,
    security: ConnectionSecurity,
    headers: HeaderMap,
) -> Json<RequestReport> {
    let forwarded_proto = headers
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    Json(RequestReport {
        forwarded_proto,
        security,
        scheme: security.scheme().to_string(),
        base_url: format!("{}://{}", security.scheme(), state.config.domain),
    })
}
