//! URLs of each surface, used as redirect targets.
//!
//! Production targets are `{scheme}://{label}.{base_domain}`; development
//! targets stay on the current origin and select the surface with `?mode=`.
//! Both come from the same label table the resolver reads, so following a
//! redirect always resolves to the class it was built for.

use crate::config::GateConfig;
use crate::domain::{DomainContext, TenantClass, TenantKey};
use crate::resolver::environment::is_loopback_host;

#[derive(Debug, Clone)]
pub struct SurfaceUrls {
    scheme: String,
    base_domain: String,
}

impl SurfaceUrls {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            scheme: config.scheme.clone(),
            base_domain: config.base_domain.trim_matches('.').to_lowercase(),
        }
    }

    /// URL of the surface for `class`, as seen from the current context.
    ///
    /// Contexts built from development overrides get development URLs on the
    /// same origin; trusted contexts get canonical production URLs. A tenant
    /// target reuses the current context's key, or the apex without one.
    pub fn surface_url(&self, class: TenantClass, current: &DomainContext) -> String {
        if class == TenantClass::Tenant {
            if let Some(key) = current.tenant_key() {
                return self.tenant_url(key, current);
            }
            return self.surface_url(TenantClass::Root, current);
        }

        let labels = class.labels();
        if current.is_trusted() {
            match labels.subdomain {
                Some(label) => format!("{}://{}.{}", self.scheme, label, self.base_domain),
                None => format!("{}://{}", self.scheme, self.base_domain),
            }
        } else {
            format!("{}/?mode={}", origin(current), labels.mode)
        }
    }

    /// URL of a city portal
    pub fn tenant_url(&self, key: &TenantKey, current: &DomainContext) -> String {
        if current.is_trusted() {
            format!("{}://{}.{}", self.scheme, key, self.base_domain)
        } else {
            format!(
                "{}/?mode={}&subdomain={}",
                origin(current),
                TenantClass::Tenant.labels().mode,
                urlencoding::encode(key.as_str())
            )
        }
    }
}

/// Origin of a development context. Loopback servers speak plain HTTP;
/// hosted development instances are served over TLS.
fn origin(current: &DomainContext) -> String {
    let host = current.host().trim();
    let scheme = if is_loopback_host(host) { "http" } else { "https" };
    format!("{}://{}", scheme, host)
}
