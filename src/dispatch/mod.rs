//! Shell dispatch: which top-level application to mount for a context

use crate::domain::{DomainContext, TenantClass, TenantKey};
use serde::Serialize;

/// Top-level application surface, consumed by the surrounding application
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum SurfaceIdentifier {
    /// Institutional site
    Marketing,
    /// UrbanByte Control Center
    ControlCenter,
    StaffPanel,
    ResellerPanel,
    /// City portal; the key lets it load tenant-scoped data
    TenantPortal { tenant_key: TenantKey },
    /// A class name that is not part of the enumeration
    Unrecognized { class: String },
}

/// Isolated authentication session the surface runs under. Platform panels
/// never share a session with each other or with city portals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionScope {
    Operator,
    Staff,
    Reseller,
    Citizen,
}

/// Select the surface for a validated context
pub fn dispatch(context: &DomainContext) -> SurfaceIdentifier {
    match (context.class(), context.tenant_key()) {
        (TenantClass::Root, _) => SurfaceIdentifier::Marketing,
        (TenantClass::Operator, _) => SurfaceIdentifier::ControlCenter,
        (TenantClass::Staff, _) => SurfaceIdentifier::StaffPanel,
        (TenantClass::Reseller, _) => SurfaceIdentifier::ResellerPanel,
        (TenantClass::Tenant, Some(key)) => SurfaceIdentifier::TenantPortal {
            tenant_key: key.clone(),
        },
        // Unreachable through `DomainContext`'s constructors
        (TenantClass::Tenant, None) => {
            tracing::error!(host = %context.host(), "Tenant context without a tenant key");
            SurfaceIdentifier::Unrecognized {
                class: TenantClass::Tenant.to_string(),
            }
        }
    }
}

/// Select a surface from a stored class name and optional tenant key.
///
/// Names outside the enumeration, and tenant classes without a valid key,
/// map to `Unrecognized` instead of being guessed at.
pub fn dispatch_named(class: &str, tenant_key: Option<&str>) -> SurfaceIdentifier {
    let unrecognized = || SurfaceIdentifier::Unrecognized {
        class: class.to_string(),
    };

    let Ok(class) = class.parse::<TenantClass>() else {
        return unrecognized();
    };

    let key = match (class, tenant_key) {
        (TenantClass::Tenant, Some(key)) => match TenantKey::parse(key) {
            Ok(key) => Some(key),
            Err(_) => return unrecognized(),
        },
        (TenantClass::Tenant, None) => return unrecognized(),
        _ => None,
    };

    match DomainContext::new(class, key, String::new(), true) {
        Ok(context) => dispatch(&context),
        Err(_) => unrecognized(),
    }
}

/// Authentication session used on the surface of `context`
pub fn session_scope(context: &DomainContext) -> SessionScope {
    match context.class() {
        TenantClass::Operator => SessionScope::Operator,
        TenantClass::Staff => SessionScope::Staff,
        TenantClass::Reseller => SessionScope::Reseller,
        TenantClass::Tenant | TenantClass::Root => SessionScope::Citizen,
    }
}
