//! Roomery backend library modules.
//!
//! The crate follows a hexagonal layout: `domain` holds transport-agnostic
//! types and use-case services, `inbound` adapts HTTP traffic onto domain
//! ports, and `outbound` adapts domain ports onto PostgreSQL, the OAuth
//! providers, and token signing.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::trace::Trace;
