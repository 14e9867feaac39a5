// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{middleware, routing::get, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{proxy::forwarded_proto_middleware, state::AppState};

pub mod diagnostics;
pub mod health;

pub fn router(state: AppState) -> Router {
    let debug_routes = Router::new()
        .route("/env", get(diagnostics::env_report))
        .route("/config", get(diagnostics::config_report))
        .route("/request", get(diagnostics::request_report))
        .with_state(state);

    Router::new()
        .route("/health/live", get(health::liveness))
        .route("/api-doc/openapi.json", get(openapi))
        .nest("/debug", debug_routes)
        .layer(middleware::from_fn(forwarded_proto_middleware))
        .layer(TraceLayer::new_for_http())
}

async fn openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::liveness,
        diagnostics::env_report,
        diagnostics::config_report,
        diagnostics::request_report
    ),
    components(
        schemas(
            health::HealthResponse,
            diagnostics::EnvReport,
            diagnostics::EnvEntry,
            diagnostics::VariableReport,
            diagnostics::SourceReport,
            diagnostics::ConfigReport,
            diagnostics::RequestReport
        )
    ),
    tags(
        (name = "Health", description = "Liveness"),
        (name = "Diagnostics", description = "Configuration resolution diagnostics")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::bootstrap::Bootstrap;
    use crate::resolver::{ContextVars, CredentialGatherer, EnvSnapshot, NoopObserver};

    fn state() -> AppState {
        let snapshot = EnvSnapshot::from_pairs([
            ("MYSQL_DATABASE", "wpdb"),
            ("MYSQL_USER", ""),
            ("WORDPRESS_AUTH_KEY", "super-secret-key"),
            ("DOMAIN_NAME", "example.com"),
            ("WP_TITLE", "My Blog"),
            ("DB_ROOT_PASSWORD", "hunter2"),
        ]);
        let gatherer = CredentialGatherer::new(vec![
            Box::new(snapshot.clone()),
            Box::new(ContextVars::default()),
        ])
        .with_observer(Arc::new(NoopObserver));
        let prepared = Bootstrap::new(gatherer)
            .with_secret_path("/nonexistent/wp-bootstrap/db_password")
            .prepare()
            .unwrap();
        AppState::new(prepared, Arc::new(snapshot))
    }

    async fn get_json(uri: &str, proto: Option<&str>) -> (StatusCode, Value) {
        match proto {
            Some(proto) => get_json_with(uri, &[("x-forwarded-proto", proto)]).await,
            None => get_json_with(uri, &[]).await,
        }
    }

    async fn get_json_with(uri: &str, headers: &[(&str, &str)]) -> (StatusCode, Value) {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let response = router(state())
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn variable<'a>(report: &'a Value, name: &str) -> &'a Value {
        report["variables"]
            .as_array()
            .unwrap()
            .iter()
            .find(|v| v["name"] == name)
            .unwrap()
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let (status, body) = get_json("/health/live", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn env_report_shows_sources_and_redacts_secrets() {
        let (status, body) = get_json("/debug/env", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["sources"][0], "process_env");
        assert_eq!(body["sources"][2], "context");

        let db = variable(&body, "MYSQL_DATABASE");
        assert_eq!(db["sources"][1]["state"], "set");
        assert_eq!(db["sources"][1]["value"], "wpdb");

        let user = variable(&body, "MYSQL_USER");
        assert_eq!(user["sources"][1]["state"], "empty");

        let key = variable(&body, "WORDPRESS_AUTH_KEY");
        assert_eq!(key["sensitive"], true);
        assert_eq!(key["sources"][1]["len"], 16);
        assert!(key["resolved"].is_null());

        assert!(!body.to_string().contains("super-secret-key"));
    }

    fn entry<'a>(report: &'a Value, source: &str, name: &str) -> &'a Value {
        report["all"]
            .as_array()
            .unwrap()
            .iter()
            .find(|e| e["source"] == source && e["name"] == name)
            .unwrap()
    }

    #[tokio::test]
    async fn env_report_includes_installer_settings() {
        let (_, body) = get_json("/debug/env", None).await;

        let title = variable(&body, "WP_TITLE");
        assert_eq!(title["sensitive"], false);
        assert_eq!(title["resolved"], "My Blog");
        assert_eq!(title["resolved_from"], "env_snapshot");

        let url = variable(&body, "WP_URL");
        assert!(url["resolved_from"].is_null());
        assert_eq!(url["resolved"], "");
    }

    #[tokio::test]
    async fn env_report_lists_every_snapshot_and_context_variable() {
        let (_, body) = get_json_with(
            "/debug/env",
            &[
                ("x-forwarded-proto", "https"),
                ("authorization", "Bearer abc123"),
            ],
        )
        .await;

        let db = entry(&body, "env_snapshot", "MYSQL_DATABASE");
        assert_eq!(db["value"], "wpdb");
        assert_eq!(db["sensitive"], false);

        let root = entry(&body, "env_snapshot", "DB_ROOT_PASSWORD");
        assert_eq!(root["sensitive"], true);
        assert_eq!(root["len"], 7);
        assert!(root["value"].is_null());

        let proto = entry(&body, "context", "HTTP_X_FORWARDED_PROTO");
        assert_eq!(proto["value"], "https");

        let auth = entry(&body, "context", "HTTP_AUTHORIZATION");
        assert!(auth["value"].is_null());
        assert_eq!(auth["len"], 13);

        let listing = body["all"].to_string();
        assert!(!listing.contains("hunter2"));
        assert!(!listing.contains("abc123"));
        assert!(!listing.contains("super-secret-key"));
    }

    #[tokio::test]
    async fn config_report_reports_fallback_password() {
        let (_, body) = get_json("/debug/config", None).await;
        assert_eq!(body["db_name"], "wpdb");
        assert_eq!(body["site_url"], "https://example.com");
        assert_eq!(body["password_source"], "fallback");
        assert_eq!(body["secret_miss"], "not_found");
        assert!(body.get("db_password").is_none());
        assert!(body["bindings"]
            .as_array()
            .unwrap()
            .iter()
            .any(|b| b == "DB_PASSWORD"));
    }

    #[tokio::test]
    async fn request_report_follows_forwarded_proto() {
        let (_, secure) = get_json("/debug/request", Some("https")).await;
        assert_eq!(secure["security"], "secure");
        assert_eq!(secure["base_url"], "https://example.com");

        let (_, upper) = get_json("/debug/request", Some("HTTPS")).await;
        assert_eq!(upper["security"], "insecure");
        assert_eq!(upper["forwarded_proto"], "HTTPS");

        let (_, direct) = get_json("/debug/request", None).await;
        assert_eq!(direct["scheme"], "http");
        assert!(direct.get("forwarded_proto").is_none());
    }

    #[tokio::test]
    async fn openapi_document_lists_diagnostics() {
        let (status, body) = get_json("/api-doc/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/debug/env"].is_object());
    }
}
