//! Gate endpoints: context inspection, access checks and the guarded entry point

use crate::dispatch::{dispatch, dispatch_named, session_scope, SessionScope, SurfaceIdentifier};
use crate::domain::{AccessDecision, DomainContext};
use crate::error::{AppError, Result};
use crate::guard::{DomainGuard, GuardOutcome, GuardState};
use crate::middleware::ResolvedContext;
use crate::role_provider::CallerCredentials;
use crate::server::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName, HeaderValue, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

pub const CLEAR_SITE_DATA: HeaderName = HeaderName::from_static("clear-site-data");
const CLEAR_SESSION_DATA: &str = "\"cookies\", \"storage\"";

#[derive(Debug, Serialize)]
pub struct ContextResponse {
    pub context: DomainContext,
    pub display_name: &'static str,
    pub surface: SurfaceIdentifier,
    pub session_scope: SessionScope,
}

/// Resolved context of the current host, without any access check
pub async fn context(ResolvedContext(context): ResolvedContext) -> Json<ContextResponse> {
    Json(ContextResponse {
        display_name: context.class().display_name(),
        surface: dispatch(&context),
        session_scope: session_scope(&context),
        context,
    })
}

#[derive(Debug, Serialize)]
pub struct AccessResponse {
    pub context: DomainContext,
    pub decision: AccessDecision,
    pub outcome: GuardOutcome,
}

/// Access decision for the calling user on the current host
pub async fn access(
    State(state): State<AppState>,
    ResolvedContext(context): ResolvedContext,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Json<AccessResponse>> {
    let login_url = login_url(&state, &uri);
    let mut guard = DomainGuard::new(&state.validator, context, login_url);
    let outcome = run_guard(&state, &mut guard, &headers).await;

    let decision = match guard.state() {
        GuardState::Decided(decision) => decision.clone(),
        GuardState::Loading => {
            return Err(AppError::Internal(anyhow::anyhow!(
                "guard did not decide after role lookup"
            )))
        }
    };

    Ok(Json(AccessResponse {
        context: guard.context().clone(),
        decision,
        outcome,
    }))
}

#[derive(Debug, Deserialize)]
pub struct SurfaceQuery {
    pub tenant_key: Option<String>,
}

/// Surface for a stored class name, for callers that persisted a class
pub async fn surface_by_name(
    Path(class): Path<String>,
    Query(query): Query<SurfaceQuery>,
) -> Result<Json<SurfaceIdentifier>> {
    match dispatch_named(&class, query.tenant_key.as_deref()) {
        SurfaceIdentifier::Unrecognized { class } => Err(AppError::NotFound(format!(
            "Unrecognized surface class: {}",
            class
        ))),
        surface => Ok(Json(surface)),
    }
}

/// Guarded entry point for every page of the portal.
///
/// Pages under the login path skip the guard so that a denied caller can
/// always reach the login form.
pub async fn gate_entry(
    State(state): State<AppState>,
    ResolvedContext(context): ResolvedContext,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if is_login_path(&state.config.gate.login_path, uri.path()) {
        let outcome = GuardOutcome::Render {
            surface: dispatch(&context),
        };
        return (StatusCode::OK, Json(outcome)).into_response();
    }

    let login_url = login_url(&state, &uri);
    let mut guard = DomainGuard::new(&state.validator, context, login_url);

    match run_guard(&state, &mut guard, &headers).await {
        outcome @ GuardOutcome::Render { .. } => (StatusCode::OK, Json(outcome)).into_response(),
        GuardOutcome::Redirect { target, sign_out } => {
            with_sign_out(sign_out, Redirect::temporary(&target).into_response())
        }
        outcome @ GuardOutcome::Denied { sign_out, .. } => with_sign_out(
            sign_out,
            (StatusCode::FORBIDDEN, Json(outcome)).into_response(),
        ),
        outcome @ GuardOutcome::Loading => {
            (StatusCode::SERVICE_UNAVAILABLE, Json(outcome)).into_response()
        }
    }
}

/// Ask the browser to drop the session it holds for this origin
fn with_sign_out(sign_out: bool, mut response: Response) -> Response {
    if sign_out {
        response
            .headers_mut()
            .insert(CLEAR_SITE_DATA, HeaderValue::from_static(CLEAR_SESSION_DATA));
    }
    response
}

async fn run_guard(
    state: &AppState,
    guard: &mut DomainGuard<'_>,
    headers: &HeaderMap,
) -> GuardOutcome {
    let credentials = CallerCredentials::from_authorization_header(
        headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()),
    );

    let started = Instant::now();
    let outcome = guard.run(state.role_provider.as_ref(), &credentials).await;
    metrics::histogram!("portal_gate_role_lookup_duration_seconds")
        .record(started.elapsed().as_secs_f64());

    outcome
}

fn is_login_path(login_path: &str, path: &str) -> bool {
    let login_path = login_path.trim_end_matches('/');
    !login_path.is_empty()
        && (path == login_path
            || path
                .strip_prefix(login_path)
                .is_some_and(|rest| rest.starts_with('/')))
}

fn login_url(state: &AppState, uri: &Uri) -> String {
    preserve_query(&state.config.gate.login_path, uri.query())
}

/// Carry the current query string (development overrides included) over to a
/// same-origin target. Absolute targets and targets with their own query are
/// left untouched.
pub fn preserve_query(target: &str, query: Option<&str>) -> String {
    let absolute = target.starts_with("http://") || target.starts_with("https://");
    match query.filter(|q| !q.is_empty()) {
        Some(query) if !absolute && !target.contains('?') => format!("{}?{}", target, query),
        _ => target.to_string(),
    }
}
