//! HTTP middleware for Portal Gate
//!
//! - Domain context resolution and the `ResolvedContext` extractor
//! - Request span maker for the trace layer

pub mod domain_context;
pub mod trace;

pub use domain_context::{resolve_domain_context, ResolvedContext};
pub use trace::GateMakeSpan;
