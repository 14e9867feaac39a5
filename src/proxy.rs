// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Forwarded-protocol normalization.
//!
//! Behind a TLS-terminating reverse proxy every connection reaching the
//! application is plain HTTP; the proxy reports the client-facing protocol in
//! `X-Forwarded-Proto`. The secure flag is derived per request from that
//! header alone and is never cached, since one process serves both direct and
//! proxied traffic.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(axum::middleware::from_fn(forwarded_proto_middleware));
//!
//! async fn handler(security: ConnectionSecurity) -> String {
//!     format!("{}://example.com/", security.scheme())
//! }
//! ```

use std::convert::Infallible;

use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use utoipa::ToSchema;

pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// `true` only when the header value is exactly `https`.
///
/// The comparison is case-sensitive and whole-value: `HTTPS`, ` https` and
/// `https,http` are all insecure.
pub fn normalize_tls(forwarded_proto: Option<&str>) -> bool {
    forwarded_proto == Some("https")
}

/// Request-scoped security of the client-facing connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionSecurity {
    Secure,
    Insecure,
}

impl ConnectionSecurity {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        // Non-visible-ASCII values fail to_str and count as absent.
        let proto = headers
            .get(FORWARDED_PROTO_HEADER)
            .and_then(|v| v.to_str().ok());
        if normalize_tls(proto) {
            ConnectionSecurity::Secure
        } else {
            ConnectionSecurity::Insecure
        }
    }

    pub fn is_secure(self) -> bool {
        self == ConnectionSecurity::Secure
    }

    /// URL scheme to use when building links for this request.
    pub fn scheme(self) -> &'static str {
        match self {
            ConnectionSecurity::Secure => "https",
            ConnectionSecurity::Insecure => "http",
        }
    }
}

/// Middleware storing the request's [`ConnectionSecurity`] in its extensions.
pub async fn forwarded_proto_middleware(mut request: Request, next: Next) -> Response {
    let security = ConnectionSecurity::from_headers(request.headers());
    request.extensions_mut().insert(security);
    next.run(request).await
}

impl<S> FromRequestParts<S> for ConnectionSecurity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Prefer what the middleware computed; otherwise derive it here.
        if let Some(security) = parts.extensions.get::<ConnectionSecurity>() {
            return Ok(*security);
        }
        Ok(ConnectionSecurity::from_headers(&parts.headers))
    }
}
