//! Request span maker for the HTTP trace layer.
//!
//! Spans carry the host the request was addressed to, which is what the gate
//! decides on, and a URI whose credential-like query values are redacted.

use axum::http::{header::HOST, Request};
use tower_http::trace::MakeSpan;
use tracing::Span;

/// Query parameter names whose values never reach the logs
const REDACTED_PARAMS: &[&str] = &["access_token", "token", "id_token_hint", "code"];

#[derive(Clone, Debug, Default)]
pub struct GateMakeSpan;

impl<B> MakeSpan<B> for GateMakeSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let host = request
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            host = %host,
            uri = %redacted_uri(request.uri()),
        )
    }
}

fn redacted_uri(uri: &axum::http::Uri) -> String {
    let Some(query) = uri.query() else {
        return uri.path().to_string();
    };

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let redact = REDACTED_PARAMS
            .iter()
            .any(|p| key.eq_ignore_ascii_case(p));
        serializer.append_pair(&key, if redact { "[REDACTED]" } else { &*value });
    }

    format!("{}?{}", uri.path(), serializer.finish())
}
