//! Shared test infrastructure
//!
//! Builds the production router with a fixed role provider and offers small
//! helpers for issuing requests against it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use portal_gate::config::{Config, GateConfig, RoleProviderConfig, TelemetryConfig};
use portal_gate::domain::CallerRole;
use portal_gate::error::RoleProviderError;
use portal_gate::role_provider::{CallerCredentials, RoleProvider};
use portal_gate::server::{build_router, AppState};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

pub const BASE_DOMAIN: &str = "example.org";

// ============================================================================
// Test Configuration
// ============================================================================

pub fn test_config() -> Config {
    Config {
        http_host: "127.0.0.1".to_string(),
        http_port: 0,
        gate: GateConfig::for_base_domain(BASE_DOMAIN),
        role_provider: RoleProviderConfig::default(),
        telemetry: TelemetryConfig::default(),
    }
}

// ============================================================================
// Role Providers
// ============================================================================

/// Answers with the same role for every authenticated caller.
/// Callers without a bearer token are anonymous.
pub struct FixedRoleProvider {
    role: Option<CallerRole>,
}

impl FixedRoleProvider {
    pub fn new(role: Option<CallerRole>) -> Self {
        Self { role }
    }
}

#[async_trait]
impl RoleProvider for FixedRoleProvider {
    async fn caller_role(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<Option<CallerRole>, RoleProviderError> {
        match credentials.bearer_token {
            Some(_) => Ok(self.role),
            None => Ok(None),
        }
    }
}

/// Always fails, like an unreachable user service
pub struct FailingRoleProvider;

#[async_trait]
impl RoleProvider for FailingRoleProvider {
    async fn caller_role(
        &self,
        _credentials: &CallerCredentials,
    ) -> Result<Option<CallerRole>, RoleProviderError> {
        Err(RoleProviderError::Status(503))
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn test_router(role: Option<CallerRole>) -> Router {
    router_with_provider(test_config(), Arc::new(FixedRoleProvider::new(role)))
}

pub fn router_with_provider(config: Config, provider: Arc<dyn RoleProvider>) -> Router {
    build_router(AppState::new(config, provider))
}

// ============================================================================
// Requests
// ============================================================================

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> &Value {
        self.body.as_ref().expect("response has a JSON body")
    }
}

/// GET `path` addressed to `host`, authenticated when `token` is given
pub async fn get(app: &Router, host: &str, path: &str, token: Option<&str>) -> TestResponse {
    let mut builder = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(header::HOST, host);

    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap_or_default();

    let body = if body_bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&body_bytes).ok()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
