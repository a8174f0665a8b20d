//! Domain context resolution
//!
//! Maps an inbound host to the application it targets:
//! - `urbanbyte.com.br`, `www.urbanbyte.com.br` → root site
//! - `dash.urbanbyte.com.br` → control center
//! - `colaborador.urbanbyte.com.br` → staff panel
//! - `parceiro.urbanbyte.com.br` → reseller panel
//! - `{city}.urbanbyte.com.br` → city portal for `{city}`
//!
//! On development hosts only, `?mode=` (and `?subdomain=`/`?tenant=` for city
//! portals) picks the application instead.

pub mod environment;

pub use environment::{is_development_host, normalize_host, EnvironmentClassifier};

use crate::config::GateConfig;
use crate::domain::{class_for_mode, class_for_reserved_label, DomainContext, TenantClass, TenantKey};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Override key selecting the application in development
pub const MODE_PARAM: &str = "mode";
/// Override keys naming the city portal in development
pub const TENANT_PARAMS: &[&str] = &["subdomain", "tenant"];

/// Resolves hosts (and development overrides) into domain contexts
#[derive(Debug, Clone)]
pub struct DomainContextResolver {
    base_domain: String,
    default_dev_tenant: TenantKey,
    environment: EnvironmentClassifier,
}

impl DomainContextResolver {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            base_domain: normalize_host(&config.base_domain),
            default_dev_tenant: config.default_dev_tenant.clone(),
            environment: EnvironmentClassifier::new(config.dev_mode),
        }
    }

    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn environment(&self) -> &EnvironmentClassifier {
        &self.environment
    }

    /// Resolve the context for a request. Never fails: hosts that fit no
    /// pattern become the "unknown" tenant so the lookup downstream reports
    /// it as not found.
    ///
    /// Overrides only apply when `mode` is present. In a development build a
    /// production hostname without `mode` keeps its own class, so
    /// `dash.{base}` is still the control center (trusted, as the host says).
    pub fn resolve(&self, host: &str, overrides: &HashMap<String, String>) -> DomainContext {
        let context = self.resolve_inner(host, overrides);
        debug!(
            host = %context.host(),
            class = %context.class(),
            tenant_key = ?context.tenant_key().map(TenantKey::as_str),
            trusted = context.is_trusted(),
            "Resolved domain context"
        );
        context
    }

    fn resolve_inner(&self, host: &str, overrides: &HashMap<String, String>) -> DomainContext {
        let is_dev = self.environment.is_development(host);

        if is_dev {
            if let Some(mode) = overrides
                .get(MODE_PARAM)
                .map(|m| m.trim())
                .filter(|m| !m.is_empty())
            {
                return self.override_context(host, mode, overrides);
            }
        }

        let normalized = normalize_host(host);
        if let Some(context) = self.production_context(host, &normalized) {
            return context;
        }

        // The plain local app opens the default city portal
        if is_dev {
            return DomainContext::tenant(self.default_dev_tenant.clone(), host, false);
        }

        warn!(host = %host, "Unexpected host, resolving to unknown tenant");
        DomainContext::tenant(TenantKey::unknown(), host, true)
    }

    fn override_context(
        &self,
        host: &str,
        mode: &str,
        overrides: &HashMap<String, String>,
    ) -> DomainContext {
        let class = match class_for_mode(mode) {
            Some(class) => class,
            None => {
                warn!(mode = %mode, "Unknown mode override, defaulting to city portal");
                return DomainContext::tenant(self.default_dev_tenant.clone(), host, false);
            }
        };

        match class {
            TenantClass::Tenant => {
                DomainContext::tenant(self.override_tenant_key(overrides), host, false)
            }
            TenantClass::Root | TenantClass::Operator | TenantClass::Staff | TenantClass::Reseller => {
                DomainContext::keyless(class, host, false)
                    .unwrap_or_else(|| DomainContext::tenant(self.default_dev_tenant.clone(), host, false))
            }
        }
    }

    fn override_tenant_key(&self, overrides: &HashMap<String, String>) -> TenantKey {
        let requested = TENANT_PARAMS
            .iter()
            .filter_map(|param| overrides.get(*param))
            .map(|value| value.trim())
            .find(|value| !value.is_empty());

        match requested {
            None => self.default_dev_tenant.clone(),
            Some(value) => TenantKey::parse(value).unwrap_or_else(|e| {
                warn!(error = %e, "Invalid tenant override, using default development tenant");
                self.default_dev_tenant.clone()
            }),
        }
    }

    /// Context for hosts under the base domain, or `None` for anything else
    fn production_context(&self, host: &str, normalized: &str) -> Option<DomainContext> {
        if normalized == self.base_domain {
            return DomainContext::keyless(TenantClass::Root, host, true);
        }

        let prefix = normalized
            .strip_suffix(self.base_domain.as_str())?
            .strip_suffix('.')?;

        // Nested subdomains fit no known pattern
        if prefix.contains('.') {
            return Some(self.unknown_host(host));
        }

        if prefix == crate::domain::tenant_class::WWW_LABEL {
            return DomainContext::keyless(TenantClass::Root, host, true);
        }

        if let Some(class) = class_for_reserved_label(prefix) {
            return DomainContext::keyless(class, host, true);
        }

        match TenantKey::parse(prefix) {
            Ok(key) => Some(DomainContext::tenant(key, host, true)),
            Err(_) => Some(self.unknown_host(host)),
        }
    }

    fn unknown_host(&self, host: &str) -> DomainContext {
        warn!(host = %host, "Unexpected hostname format, resolving to unknown tenant");
        DomainContext::tenant(TenantKey::unknown(), host, true)
    }
}
