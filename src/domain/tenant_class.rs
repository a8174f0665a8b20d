//! Tenant classes and the label table that names them

use crate::error::GateError;
use serde::{Deserialize, Serialize};

/// Which application a host belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantClass {
    /// Public marketing site on the apex domain
    Root,
    /// Platform-wide control center
    Operator,
    /// Internal team panel
    Staff,
    /// Partner/reseller panel
    Reseller,
    /// A city portal, identified by its tenant key
    Tenant,
}

impl TenantClass {
    pub const ALL: [TenantClass; 5] = [
        TenantClass::Root,
        TenantClass::Operator,
        TenantClass::Staff,
        TenantClass::Reseller,
        TenantClass::Tenant,
    ];

    /// True for the surfaces that belong to the platform rather than a city
    pub fn is_platform(self) -> bool {
        match self {
            TenantClass::Operator | TenantClass::Staff | TenantClass::Reseller => true,
            TenantClass::Root | TenantClass::Tenant => false,
        }
    }

    /// User-facing name of the surface
    pub fn display_name(self) -> &'static str {
        match self {
            TenantClass::Root => "Site Institucional",
            TenantClass::Operator => "UrbanByte Control Center",
            TenantClass::Staff => "Painel Colaborador",
            TenantClass::Reseller => "Painel Parceiro",
            TenantClass::Tenant => "Portal da Cidade",
        }
    }

    /// Message shown on the denial view for this surface
    pub fn denial_message(self) -> &'static str {
        match self {
            TenantClass::Root => "Você não tem permissão para acessar esta área.",
            TenantClass::Operator => {
                "Acesso restrito ao UrbanByte Control Center. Apenas administradores master podem acessar."
            }
            TenantClass::Staff => {
                "Acesso restrito ao Painel do Colaborador. Apenas membros da equipe podem acessar."
            }
            TenantClass::Reseller => {
                "Acesso restrito ao Painel do Parceiro. Apenas parceiros credenciados podem acessar."
            }
            TenantClass::Tenant => {
                "Esta é uma área restrita para usuários da cidade. Usuários da plataforma devem usar seus painéis dedicados."
            }
        }
    }

    /// Entry for this class in the label table
    pub fn labels(self) -> &'static ClassLabels {
        // The table is ordered like `TenantClass::ALL`
        &CLASS_LABELS[self as usize]
    }
}

impl std::str::FromStr for TenantClass {
    type Err = GateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "root" => Ok(TenantClass::Root),
            "operator" => Ok(TenantClass::Operator),
            "staff" => Ok(TenantClass::Staff),
            "reseller" => Ok(TenantClass::Reseller),
            "tenant" => Ok(TenantClass::Tenant),
            _ => Err(GateError::UnknownClass(s.to_string())),
        }
    }
}

impl std::fmt::Display for TenantClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TenantClass::Root => write!(f, "root"),
            TenantClass::Operator => write!(f, "operator"),
            TenantClass::Staff => write!(f, "staff"),
            TenantClass::Reseller => write!(f, "reseller"),
            TenantClass::Tenant => write!(f, "tenant"),
        }
    }
}

/// Labels that select a class, in production and in development.
///
/// This is the single source for reserved subdomains, `?mode=` aliases and
/// redirect targets. Whatever label resolves into a class is the label used
/// to redirect toward it.
#[derive(Debug)]
pub struct ClassLabels {
    pub class: TenantClass,
    /// Reserved subdomain under the base domain. `None` for the apex and for
    /// tenants, whose subdomain is their key.
    pub subdomain: Option<&'static str>,
    /// Canonical `?mode=` value in development
    pub mode: &'static str,
    /// Extra `?mode=` values accepted in development
    pub aliases: &'static [&'static str],
}

static CLASS_LABELS: [ClassLabels; 5] = [
    ClassLabels {
        class: TenantClass::Root,
        subdomain: None,
        mode: "root",
        aliases: &["marketing"],
    },
    ClassLabels {
        class: TenantClass::Operator,
        subdomain: Some("dash"),
        mode: "dash",
        aliases: &["master"],
    },
    ClassLabels {
        class: TenantClass::Staff,
        subdomain: Some("colaborador"),
        mode: "colaborador",
        aliases: &["collaborator", "team"],
    },
    ClassLabels {
        class: TenantClass::Reseller,
        subdomain: Some("parceiro"),
        mode: "parceiro",
        aliases: &["partner"],
    },
    ClassLabels {
        class: TenantClass::Tenant,
        subdomain: None,
        mode: "city",
        aliases: &["cidade"],
    },
];

/// Subdomain that is an alias of the apex domain
pub const WWW_LABEL: &str = "www";

/// Platform class claimed by a reserved subdomain label, if any
pub fn class_for_reserved_label(label: &str) -> Option<TenantClass> {
    CLASS_LABELS
        .iter()
        .find(|entry| entry.subdomain == Some(label))
        .map(|entry| entry.class)
}

/// Class selected by a development `?mode=` value, if recognized
pub fn class_for_mode(mode: &str) -> Option<TenantClass> {
    let mode = mode.trim().to_lowercase();
    CLASS_LABELS
        .iter()
        .find(|entry| entry.mode == mode || entry.aliases.contains(&mode.as_str()))
        .map(|entry| entry.class)
}

/// Whether a subdomain label is claimed by the platform and unavailable as a
/// tenant key
pub fn is_reserved_label(label: &str) -> bool {
    let label = label.to_lowercase();
    label == WWW_LABEL || class_for_reserved_label(&label).is_some()
}
