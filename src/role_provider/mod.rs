//! Role provider: who the caller is on the platform.
//!
//! Authentication itself lives elsewhere. The gate only asks the platform
//! user service for the caller's role, forwarding the caller's bearer token.

use crate::config::RoleProviderConfig;
use crate::domain::CallerRole;
use crate::error::RoleProviderError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Credentials presented by the caller, passed through untouched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerCredentials {
    pub bearer_token: Option<String>,
}

impl CallerCredentials {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    /// Parse an `Authorization` header value; anything but a non-empty
    /// Bearer token is anonymous.
    pub fn from_authorization_header(value: Option<&str>) -> Self {
        let token = value
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty());

        match token {
            Some(token) => Self::bearer(token),
            None => Self::anonymous(),
        }
    }
}

/// Supplies the caller's platform role.
///
/// `Ok(None)` means "no platform role" (anonymous or a city end-user).
/// Errors are reported as-is; the guard decides how to treat them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn caller_role(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<Option<CallerRole>, RoleProviderError>;
}

/// Provider for deployments without a platform user service
#[derive(Debug, Clone, Default)]
pub struct AnonymousRoleProvider;

#[async_trait]
impl RoleProvider for AnonymousRoleProvider {
    async fn caller_role(
        &self,
        _credentials: &CallerCredentials,
    ) -> Result<Option<CallerRole>, RoleProviderError> {
        Ok(None)
    }
}

/// Platform user record returned by the user service
#[derive(Debug, Deserialize)]
struct PlatformUserResponse {
    role: Option<String>,
    #[serde(default = "default_active")]
    is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Looks up the caller's role over HTTP
#[derive(Clone)]
pub struct HttpRoleProvider {
    base_url: String,
    http_client: Client,
}

impl HttpRoleProvider {
    pub fn new(base_url: impl Into<String>, config: &RoleProviderConfig) -> Result<Self, RoleProviderError> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client,
        })
    }
}

#[async_trait]
impl RoleProvider for HttpRoleProvider {
    async fn caller_role(
        &self,
        credentials: &CallerCredentials,
    ) -> Result<Option<CallerRole>, RoleProviderError> {
        let Some(token) = credentials.bearer_token.as_deref() else {
            return Ok(None);
        };

        let url = format!("{}/api/v1/platform-user", self.base_url);
        let response = self.http_client.get(&url).bearer_auth(token).send().await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND => {
                debug!(status = %response.status(), "Caller has no platform user");
                return Ok(None);
            }
            status if !status.is_success() => {
                return Err(RoleProviderError::Status(status.as_u16()));
            }
            _ => {}
        }

        let user: PlatformUserResponse = response.json().await?;

        if !user.is_active {
            debug!("Platform user is inactive");
            return Ok(None);
        }

        match user.role.as_deref() {
            None => Ok(None),
            Some(name) => match name.parse::<CallerRole>() {
                Ok(role) => Ok(Some(role)),
                Err(e) => {
                    warn!(error = %e, "Role provider returned an unknown role");
                    Ok(None)
                }
            },
        }
    }
}
