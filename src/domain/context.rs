//! Domain context: what a host resolved to

use super::tenant_class::{is_reserved_label, TenantClass};
use crate::error::GateError;
use serde::{Deserialize, Serialize};

/// Maximum length of a DNS label
const MAX_TENANT_KEY_LEN: usize = 63;

/// Key used when a host cannot be attributed to any known tenant
pub const UNKNOWN_TENANT_KEY: &str = "unknown";

// DNS label syntax: letters, digits and hyphens, no hyphen at either end.
// Punycode labels (`xn--...`) are valid keys.
lazy_static::lazy_static! {
    pub static ref TENANT_KEY_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap();
}

/// Subdomain label identifying a city portal
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantKey(String);

impl TenantKey {
    /// Validate a label as a tenant key.
    ///
    /// Reserved platform labels are rejected: an organization named "dash"
    /// can never own the `dash` subdomain.
    pub fn parse(value: &str) -> Result<Self, GateError> {
        let key = value.trim().to_lowercase();
        if key.is_empty() || key.len() > MAX_TENANT_KEY_LEN || !TENANT_KEY_REGEX.is_match(&key) {
            return Err(GateError::InvalidTenantKey(value.to_string()));
        }
        if is_reserved_label(&key) {
            return Err(GateError::InvalidTenantKey(format!(
                "{} is a reserved label",
                value
            )));
        }
        Ok(Self(key))
    }

    /// Sentinel key for unrecognized hosts, reported downstream as "not found"
    pub fn unknown() -> Self {
        Self(UNKNOWN_TENANT_KEY.to_string())
    }

    pub fn is_unknown(&self) -> bool {
        self.0 == UNKNOWN_TENANT_KEY
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TenantKey {
    type Error = GateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantKey> for String {
    fn from(key: TenantKey) -> Self {
        key.0
    }
}

impl std::fmt::Display for TenantKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The application a request targets, resolved once per request.
///
/// Fields are private so that a `Tenant` context always carries a key and no
/// other class ever does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DomainContext {
    class: TenantClass,
    tenant_key: Option<TenantKey>,
    host: String,
    is_trusted: bool,
}

impl DomainContext {
    /// Checked constructor for callers that hold a class and key separately.
    ///
    /// An inconsistent pair is a programming error: it trips a debug
    /// assertion in development builds and is rejected in release builds.
    pub fn new(
        class: TenantClass,
        tenant_key: Option<TenantKey>,
        host: impl Into<String>,
        is_trusted: bool,
    ) -> Result<Self, GateError> {
        let consistent = (class == TenantClass::Tenant) == tenant_key.is_some();
        debug_assert!(
            consistent,
            "inconsistent domain context: {:?} with key {:?}",
            class, tenant_key
        );
        if !consistent {
            return Err(GateError::InvalidContext(match tenant_key {
                Some(key) => format!("{} context cannot carry tenant key {}", class, key),
                None => "tenant context requires a tenant key".to_string(),
            }));
        }

        Ok(Self {
            class,
            tenant_key,
            host: host.into(),
            is_trusted,
        })
    }

    /// Context for a city portal
    pub fn tenant(key: TenantKey, host: impl Into<String>, is_trusted: bool) -> Self {
        Self {
            class: TenantClass::Tenant,
            tenant_key: Some(key),
            host: host.into(),
            is_trusted,
        }
    }

    /// Context for the apex site or a platform panel.
    ///
    /// Returns `None` for `TenantClass::Tenant`, which needs a key.
    pub fn keyless(class: TenantClass, host: impl Into<String>, is_trusted: bool) -> Option<Self> {
        match class {
            TenantClass::Tenant => None,
            TenantClass::Root | TenantClass::Operator | TenantClass::Staff | TenantClass::Reseller => {
                Some(Self {
                    class,
                    tenant_key: None,
                    host: host.into(),
                    is_trusted,
                })
            }
        }
    }

    pub fn class(&self) -> TenantClass {
        self.class
    }

    pub fn tenant_key(&self) -> Option<&TenantKey> {
        self.tenant_key.as_ref()
    }

    /// Raw host that produced this context, for diagnostics only
    pub fn host(&self) -> &str {
        &self.host
    }

    /// False for contexts chosen through development overrides
    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }
}
