//! Access decision produced by the access validator

use serde::Serialize;

/// Outcome of checking a caller against a domain context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    /// Human-readable reason, present only when denied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Better destination for a denied caller, when one is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_target: Option<String>,
}

impl AccessDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            redirect_target: None,
        }
    }

    /// Deny and send the caller to the generic login
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            redirect_target: None,
        }
    }

    /// Deny and send the caller to the surface they belong on
    pub fn redirect(reason: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            redirect_target: Some(target.into()),
        }
    }

    /// Short label for logs and metrics
    pub fn outcome(&self) -> &'static str {
        match (self.allowed, self.redirect_target.is_some()) {
            (true, _) => "allowed",
            (false, true) => "redirected",
            (false, false) => "denied",
        }
    }
}
