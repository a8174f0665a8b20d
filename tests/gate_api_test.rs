//! Gate entry point and context API integration tests

use crate::common::{get, router_with_provider, test_config, test_router, FailingRoleProvider};
use axum::http::StatusCode;
use portal_gate::domain::CallerRole;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

mod common;

const TOKEN: &str = "test-token";

#[tokio::test]
async fn test_health_check() {
    let app = test_router(None);
    let response = get(&app, "example.org", "/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_metrics_disabled_returns_404() {
    let app = test_router(None);
    let response = get(&app, "example.org", "/metrics", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Gate entry point
// ============================================================================

#[tokio::test]
async fn test_operator_renders_control_center() {
    let app = test_router(Some(CallerRole::Operator));
    let response = get(&app, "dash.example.org", "/", Some(TOKEN)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        &json!({ "outcome": "render", "surface": { "surface": "control_center" } })
    );
}

#[tokio::test]
async fn test_staff_on_control_center_is_denied_with_login() {
    let app = test_router(Some(CallerRole::Staff));
    let response = get(&app, "dash.example.org", "/settings", Some(TOKEN)).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let body = response.json();
    assert_eq!(body["outcome"], "denied");
    assert_eq!(
        body["reason"],
        "Only operators can access the UrbanByte Control Center"
    );
    assert_eq!(body["login_url"], "/auth");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("UrbanByte Control Center"));
}

#[tokio::test]
async fn test_operator_on_city_portal_is_redirected_home() {
    let app = test_router(Some(CallerRole::Operator));
    let response = get(&app, "acme.example.org", "/", Some(TOKEN)).await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.location(), Some("https://dash.example.org"));
}

#[tokio::test]
async fn test_denied_session_is_cleared() {
    let app = test_router(Some(CallerRole::Staff));

    let response = get(&app, "dash.example.org", "/", Some(TOKEN)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["sign_out"], true);
    assert_eq!(
        response.headers.get("clear-site-data").unwrap(),
        "\"cookies\", \"storage\""
    );

    let response = get(&app, "acme.example.org", "/", Some(TOKEN)).await;
    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert!(response.headers.contains_key("clear-site-data"));
}

#[tokio::test]
async fn test_anonymous_denial_keeps_site_data() {
    let app = test_router(None);
    let response = get(&app, "dash.example.org", "/", None).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["sign_out"], false);
    assert!(!response.headers.contains_key("clear-site-data"));
}

#[tokio::test]
async fn test_allowed_caller_keeps_site_data() {
    let app = test_router(Some(CallerRole::Operator));
    let response = get(&app, "dash.example.org", "/", Some(TOKEN)).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(!response.headers.contains_key("clear-site-data"));
}

#[tokio::test]
async fn test_anonymous_on_city_portal_renders_tenant() {
    let app = test_router(Some(CallerRole::Operator));
    let response = get(&app, "acme.example.org", "/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        &json!({
            "outcome": "render",
            "surface": { "surface": "tenant_portal", "tenant_key": "acme" }
        })
    );
}

#[tokio::test]
async fn test_marketing_site_is_public() {
    let app = test_router(None);
    for host in ["example.org", "www.example.org"] {
        let response = get(&app, host, "/", None).await;
        assert_eq!(response.status, StatusCode::OK, "{}", host);
        assert_eq!(response.json()["surface"]["surface"], "marketing");
    }
}

#[tokio::test]
async fn test_login_path_bypasses_guard() {
    let app = test_router(None);
    let response = get(&app, "dash.example.org", "/auth/login", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["surface"]["surface"], "control_center");
}

#[tokio::test]
async fn test_login_url_keeps_development_overrides() {
    let app = test_router(None);
    let response = get(&app, "localhost:5173", "/?mode=dash", None).await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(response.json()["login_url"], "/auth?mode=dash");
}

#[tokio::test]
async fn test_role_lookup_failure_fails_closed() {
    let app = router_with_provider(test_config(), Arc::new(FailingRoleProvider));

    let response = get(&app, "dash.example.org", "/", Some(TOKEN)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    // Nothing to protect on a city portal: the caller is just anonymous
    let response = get(&app, "acme.example.org", "/", Some(TOKEN)).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_development_redirect_stays_on_origin() {
    let app = test_router(Some(CallerRole::Staff));
    let response = get(
        &app,
        "localhost:5173",
        "/?mode=city&subdomain=acme",
        Some(TOKEN),
    )
    .await;

    assert_eq!(response.status, StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(
        response.location(),
        Some("http://localhost:5173/?mode=colaborador")
    );
}

// ============================================================================
// Context API
// ============================================================================

#[tokio::test]
async fn test_context_for_city_portal() {
    let app = test_router(None);
    let response = get(&app, "acme.example.org", "/api/v1/context", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        &json!({
            "context": {
                "class": "tenant",
                "tenant_key": "acme",
                "host": "acme.example.org",
                "is_trusted": true
            },
            "display_name": "Portal da Cidade",
            "surface": { "surface": "tenant_portal", "tenant_key": "acme" },
            "session_scope": "citizen"
        })
    );
}

#[tokio::test]
async fn test_mode_override_honored_on_development_host() {
    let app = test_router(None);
    let response = get(&app, "localhost", "/api/v1/context?mode=dash", None).await;

    let context = &response.json()["context"];
    assert_eq!(context["class"], "operator");
    assert_eq!(context["tenant_key"], serde_json::Value::Null);
    assert_eq!(context["is_trusted"], false);
}

#[tokio::test]
async fn test_mode_override_ignored_on_production_host() {
    let app = test_router(None);
    let response = get(&app, "acme.example.org", "/api/v1/context?mode=dash", None).await;

    let context = &response.json()["context"];
    assert_eq!(context["class"], "tenant");
    assert_eq!(context["tenant_key"], "acme");
    assert_eq!(context["is_trusted"], true);
}

#[tokio::test]
async fn test_plain_development_host_opens_default_city() {
    let app = test_router(None);
    let response = get(&app, "127.0.0.1:8080", "/api/v1/context", None).await;

    let body = response.json();
    assert_eq!(body["context"]["class"], "tenant");
    assert_eq!(body["context"]["tenant_key"], "afogados");
    assert_eq!(body["context"]["is_trusted"], false);
}

#[tokio::test]
async fn test_foreign_host_resolves_to_unknown_tenant() {
    let app = test_router(None);
    let response = get(&app, "other.net", "/api/v1/context", None).await;

    assert_eq!(response.json()["context"]["tenant_key"], "unknown");
}

#[tokio::test]
async fn test_forwarded_host_ignored_unless_trusted() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let request = || {
        Request::builder()
            .uri("/api/v1/context")
            .header("host", "internal:8080")
            .header("x-forwarded-host", "dash.example.org")
            .body(Body::empty())
            .unwrap()
    };

    let app = test_router(None);
    let response = app.oneshot(request()).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["context"]["tenant_key"], "unknown");

    let mut config = test_config();
    config.gate.trust_forwarded_host = true;
    let app = router_with_provider(
        config,
        Arc::new(common::FixedRoleProvider::new(None)),
    );
    let response = app.oneshot(request()).await.unwrap();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["context"]["class"], "operator");
}

// ============================================================================
// Access API
// ============================================================================

#[tokio::test]
async fn test_access_reports_decision_and_outcome() {
    let app = test_router(Some(CallerRole::Reseller));
    let response = get(&app, "acme.example.org", "/api/v1/access", Some(TOKEN)).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["decision"]["allowed"], false);
    assert_eq!(
        body["decision"]["redirect_target"],
        "https://parceiro.example.org"
    );
    assert_eq!(
        body["outcome"],
        json!({
            "outcome": "redirect",
            "target": "https://parceiro.example.org",
            "sign_out": true
        })
    );
}

#[tokio::test]
async fn test_access_allows_operator_everywhere_but_cities() {
    let app = test_router(Some(CallerRole::Operator));
    for host in ["dash.example.org", "colaborador.example.org", "parceiro.example.org"] {
        let response = get(&app, host, "/api/v1/access", Some(TOKEN)).await;
        assert_eq!(response.json()["decision"]["allowed"], true, "{}", host);
    }
}

// ============================================================================
// Surfaces API
// ============================================================================

#[tokio::test]
async fn test_surface_by_name() {
    let app = test_router(None);

    let response = get(&app, "example.org", "/api/v1/surfaces/reseller", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), &json!({ "surface": "reseller_panel" }));

    let response = get(
        &app,
        "example.org",
        "/api/v1/surfaces/tenant?tenant_key=Acme",
        None,
    )
    .await;
    assert_eq!(
        response.json(),
        &json!({ "surface": "tenant_portal", "tenant_key": "acme" })
    );
}

#[tokio::test]
async fn test_unrecognized_surface_is_not_found() {
    let app = test_router(None);
    let response = get(&app, "example.org", "/api/v1/surfaces/admin", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "not_found");
}
