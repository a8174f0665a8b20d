//! Domain models for tenant resolution and access decisions

pub mod context;
pub mod decision;
pub mod role;
pub mod tenant_class;

pub use context::{DomainContext, TenantKey, UNKNOWN_TENANT_KEY};
pub use decision::AccessDecision;
pub use role::{is_operator, is_platform_user, CallerRole};
pub use tenant_class::{
    class_for_mode, class_for_reserved_label, is_reserved_label, ClassLabels, TenantClass,
};
