//! Access validation for domain contexts.
//!
//! Decides whether a caller with a given platform role may use the surface a
//! host resolved to. The rules form a total function over
//! `TenantClass × Option<CallerRole>`; every pair is matched explicitly so a
//! new class or role does not compile until it is given a rule here.

mod surface_url;

pub use surface_url::SurfaceUrls;

use crate::config::GateConfig;
use crate::domain::{AccessDecision, CallerRole, DomainContext, TenantClass};

/// Computes access decisions. Holds only deploy-time settings, so a single
/// instance is shared across all requests.
#[derive(Debug, Clone)]
pub struct AccessValidator {
    urls: SurfaceUrls,
}

impl AccessValidator {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            urls: SurfaceUrls::new(config),
        }
    }

    pub fn urls(&self) -> &SurfaceUrls {
        &self.urls
    }

    /// Decide access for `role` on `context`. Pure: same inputs, same decision.
    pub fn validate(&self, context: &DomainContext, role: Option<CallerRole>) -> AccessDecision {
        use CallerRole::{Operator, Reseller, Staff};

        match (context.class(), role) {
            // Public marketing site
            (TenantClass::Root, _) => AccessDecision::allow(),

            // Platform users have dedicated panels and must not act inside a
            // city portal; everyone else is scoped by the city's own auth.
            (TenantClass::Tenant, Some(role @ (Operator | Staff | Reseller))) => {
                AccessDecision::redirect(
                    "Platform users should use their dedicated panels",
                    self.urls.surface_url(role.home_class(), context),
                )
            }
            (TenantClass::Tenant, None) => AccessDecision::allow(),

            (TenantClass::Operator, Some(Operator)) => AccessDecision::allow(),
            (TenantClass::Operator, Some(Staff | Reseller) | None) => AccessDecision::deny(
                "Only operators can access the UrbanByte Control Center",
            ),

            (TenantClass::Staff, Some(Staff | Operator)) => AccessDecision::allow(),
            (TenantClass::Staff, Some(Reseller) | None) => {
                AccessDecision::deny("Only team members can access the Collaborator Panel")
            }

            (TenantClass::Reseller, Some(Reseller | Operator)) => AccessDecision::allow(),
            (TenantClass::Reseller, Some(Staff) | None) => {
                AccessDecision::deny("Only partners can access the Partner Panel")
            }
        }
    }
}
