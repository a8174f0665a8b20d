//! Portal Gate - multi-tenant domain resolution and access control
//!
//! Every request to the portal is mapped from its host to a tenant class
//! (marketing root, control center, staff, reseller or a city tenant),
//! checked against the caller's platform role and then either rendered,
//! redirected to the caller's own surface, or denied.

pub mod api;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod guard;
pub mod middleware;
pub mod policy;
pub mod resolver;
pub mod role_provider;
pub mod server;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
