//! Server initialization and routing

use crate::api;
use crate::config::Config;
use crate::middleware::{resolve_domain_context, GateMakeSpan};
use crate::policy::AccessValidator;
use crate::resolver::DomainContextResolver;
use crate::role_provider::{AnonymousRoleProvider, HttpRoleProvider, RoleProvider};
use anyhow::Result;
use axum::{http::Method, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<DomainContextResolver>,
    pub validator: Arc<AccessValidator>,
    pub role_provider: Arc<dyn RoleProvider>,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: Config, role_provider: Arc<dyn RoleProvider>) -> Self {
        Self {
            resolver: Arc::new(DomainContextResolver::new(&config.gate)),
            validator: Arc::new(AccessValidator::new(&config.gate)),
            config: Arc::new(config),
            role_provider,
            metrics_handle: None,
        }
    }

    pub fn with_metrics(mut self, handle: Option<PrometheusHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }
}

/// Role provider for the configured deployment
pub fn create_role_provider(config: &Config) -> Result<Arc<dyn RoleProvider>> {
    match &config.role_provider.url {
        Some(url) => {
            info!("Using platform user service at {}", url);
            Ok(Arc::new(HttpRoleProvider::new(url.clone(), &config.role_provider)?))
        }
        None => {
            warn!("ROLE_PROVIDER_URL not set, every caller is anonymous");
            Ok(Arc::new(AnonymousRoleProvider))
        }
    }
}

pub async fn run(config: Config, metrics_handle: Option<PrometheusHandle>) -> Result<()> {
    let role_provider = create_role_provider(&config)?;

    if config.gate.dev_mode || cfg!(feature = "dev-mode") {
        warn!("Development mode is on: ?mode= overrides are honored on every host");
    }

    let http_addr = config.http_addr();
    let state = AppState::new(config, role_provider).with_metrics(metrics_handle);
    let app = build_router(state);

    let listener = TcpListener::bind(&http_addr).await?;
    info!("HTTP server started on {}", http_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the HTTP router
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::health::health))
        .route("/metrics", get(api::health::metrics))
        .route("/api/v1/context", get(api::gate::context))
        .route("/api/v1/access", get(api::gate::access))
        .route("/api/v1/surfaces/{class}", get(api::gate::surface_by_name))
        .fallback(api::gate::gate_entry)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            resolve_domain_context,
        ))
        .layer(TraceLayer::new_for_http().make_span_with(GateMakeSpan))
        .layer(cors)
        .with_state(state)
}
