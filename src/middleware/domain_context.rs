//! Request-scoped domain context
//!
//! Resolves the request host (and development overrides from the query
//! string) once per request and stores the result in the request extensions,
//! where handlers read it through the `ResolvedContext` extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;

use crate::domain::DomainContext;
use crate::error::AppError;
use crate::server::AppState;

/// Domain context of the current request
#[derive(Debug, Clone)]
pub struct ResolvedContext(pub DomainContext);

pub async fn resolve_domain_context(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let host = request_host(
        request.headers(),
        request.uri(),
        state.config.gate.trust_forwarded_host,
    );
    let overrides = query_overrides(request.uri().query());
    let context = state.resolver.resolve(&host, &overrides);

    metrics::counter!(
        "portal_gate_contexts_resolved_total",
        "class" => context.class().to_string(),
        "trusted" => if context.is_trusted() { "true" } else { "false" }
    )
    .increment(1);

    request.extensions_mut().insert(ResolvedContext(context));
    next.run(request).await
}

/// Host the request was addressed to.
///
/// `X-Forwarded-Host` is only honored when the deployment sits behind a proxy
/// that sets it; otherwise any client could pick its own host.
pub fn request_host(headers: &HeaderMap, uri: &Uri, trust_forwarded_host: bool) -> String {
    let header_value = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(',').next().unwrap_or_default().trim().to_string())
            .filter(|v| !v.is_empty())
    };

    if trust_forwarded_host {
        if let Some(host) = header_value("x-forwarded-host") {
            return host;
        }
    }

    header_value("host")
        .or_else(|| uri.authority().map(|a| a.as_str().to_string()))
        .unwrap_or_default()
}

/// Query parameters as override candidates. The first occurrence of a key
/// wins. Whether they are honored is up to the resolver.
pub fn query_overrides(query: Option<&str>) -> HashMap<String, String> {
    let mut overrides = HashMap::new();
    if let Some(query) = query {
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            overrides
                .entry(key.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    overrides
}

impl<S> FromRequestParts<S> for ResolvedContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ResolvedContext>()
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "domain context middleware is not installed"
                ))
            })
    }
}
