//! Configuration management for Portal Gate

use crate::domain::TenantKey;
use anyhow::{Context, Result};
use std::env;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub http_host: String,
    /// HTTP server port
    pub http_port: u16,
    /// Domain resolution and redirect configuration
    pub gate: GateConfig,
    /// Role provider configuration
    pub role_provider: RoleProviderConfig,
    /// Logging and metrics configuration
    pub telemetry: TelemetryConfig,
}

/// Settings consumed by the resolver, validator and guard.
///
/// Everything here is fixed at deploy time; nothing in a request can change it.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Production base domain, e.g. `urbanbyte.com.br`
    pub base_domain: String,
    /// Scheme used for production redirect targets
    pub scheme: String,
    /// Deploy-time development flag. When set, every host accepts `?mode=`
    /// overrides.
    pub dev_mode: bool,
    /// Tenant opened by development hosts when no override names one
    pub default_dev_tenant: TenantKey,
    /// Path of the login page shown on denial
    pub login_path: String,
    /// Read the host from `X-Forwarded-Host` (only behind a trusted proxy)
    pub trust_forwarded_host: bool,
}

impl GateConfig {
    /// Production settings for a base domain, mostly useful in tests
    pub fn for_base_domain(base_domain: impl Into<String>) -> Self {
        Self {
            base_domain: base_domain.into(),
            ..Self::default()
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            base_domain: "urbanbyte.com.br".to_string(),
            scheme: "https".to_string(),
            dev_mode: false,
            default_dev_tenant: TenantKey::parse(DEFAULT_DEV_TENANT)
                .expect("default development tenant is a valid key"),
            login_path: "/auth".to_string(),
            trust_forwarded_host: false,
        }
    }
}

const DEFAULT_DEV_TENANT: &str = "afogados";

#[derive(Debug, Clone)]
pub struct RoleProviderConfig {
    /// Base URL of the platform user service. Without it every caller is
    /// anonymous.
    pub url: Option<String>,
    pub timeout_ms: u64,
}

impl Default for RoleProviderConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_ms: 3000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// "text" or "json"
    pub log_format: String,
    pub metrics_enabled: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
            metrics_enabled: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let default_dev_tenant = env::var("PORTAL_DEFAULT_DEV_TENANT")
            .unwrap_or_else(|_| DEFAULT_DEV_TENANT.to_string());

        Ok(Self {
            http_host: env::var("HTTP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            http_port: env::var("HTTP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid HTTP_PORT")?,
            gate: GateConfig {
                base_domain: env::var("PORTAL_BASE_DOMAIN")
                    .unwrap_or_else(|_| "urbanbyte.com.br".to_string())
                    .trim()
                    .trim_matches('.')
                    .to_lowercase(),
                scheme: env::var("PORTAL_SCHEME").unwrap_or_else(|_| "https".to_string()),
                dev_mode: env::var("PORTAL_DEV_MODE")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
                default_dev_tenant: TenantKey::parse(&default_dev_tenant)
                    .context("Invalid PORTAL_DEFAULT_DEV_TENANT")?,
                login_path: env::var("PORTAL_LOGIN_PATH").unwrap_or_else(|_| "/auth".to_string()),
                trust_forwarded_host: env::var("PORTAL_TRUST_FORWARDED_HOST")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
            role_provider: RoleProviderConfig {
                url: env::var("ROLE_PROVIDER_URL")
                    .ok()
                    .map(|s| s.trim_end_matches('/').to_string())
                    .filter(|s| !s.is_empty()),
                timeout_ms: env::var("ROLE_PROVIDER_TIMEOUT_MS")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(3000),
            },
            telemetry: TelemetryConfig {
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
                metrics_enabled: env::var("METRICS_ENABLED")
                    .map(|s| s.to_lowercase() == "true")
                    .unwrap_or(false),
            },
        })
    }

    /// Get HTTP server address
    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}
