//! Platform roles supplied by the role provider

use super::tenant_class::TenantClass;
use crate::error::GateError;
use serde::{Deserialize, Serialize};

/// Platform role of an authenticated caller.
///
/// Anonymous visitors and tenant end-users have no platform role and are
/// represented as `None` wherever an `Option<CallerRole>` is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerRole {
    Operator,
    Staff,
    Reseller,
}

impl CallerRole {
    pub const ALL: [CallerRole; 3] = [CallerRole::Operator, CallerRole::Staff, CallerRole::Reseller];

    /// The surface this role is sent to when it lands somewhere it does not belong
    pub fn home_class(self) -> TenantClass {
        match self {
            CallerRole::Operator => TenantClass::Operator,
            CallerRole::Staff => TenantClass::Staff,
            CallerRole::Reseller => TenantClass::Reseller,
        }
    }
}

impl std::str::FromStr for CallerRole {
    type Err = GateError;

    /// Accepts both the gate's names and the role names stored by the
    /// platform user service (`MASTER`, `TEAM`, `PARTNER`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "operator" | "master" => Ok(CallerRole::Operator),
            "staff" | "team" => Ok(CallerRole::Staff),
            "reseller" | "partner" => Ok(CallerRole::Reseller),
            _ => Err(GateError::UnknownRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for CallerRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallerRole::Operator => write!(f, "operator"),
            CallerRole::Staff => write!(f, "staff"),
            CallerRole::Reseller => write!(f, "reseller"),
        }
    }
}

/// Check if the caller is a platform user (operator, staff or reseller)
pub fn is_platform_user(role: Option<CallerRole>) -> bool {
    role.is_some()
}

/// Check if the caller has operator privileges
pub fn is_operator(role: Option<CallerRole>) -> bool {
    role == Some(CallerRole::Operator)
}
