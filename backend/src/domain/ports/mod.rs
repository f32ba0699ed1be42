//! Ports (interfaces) between the domain and its adapters.
//!
//! Driving ports ([`CredentialsService`], [`SocialLogin`], [`IdentityQuery`])
//! are implemented by domain services and called from the HTTP layer. Driven
//! ports ([`IdentityRepository`], [`ProviderGateway`], [`TokenIssuer`]) are
//! implemented by outbound adapters.

mod credentials_service;
mod identity_query;
mod identity_repository;
mod macros;
mod provider_gateway;
mod social_login;
mod token_issuer;

pub use credentials_service::CredentialsService;
pub use identity_query::IdentityQuery;
pub use identity_repository::{
    IdentityPersistenceError, IdentityRepository, InMemoryIdentityRepository,
};
pub use provider_gateway::{ProviderError, ProviderGateway};
pub use social_login::SocialLogin;
pub use token_issuer::{BearerToken, TokenIssueError, TokenIssuer};

pub(crate) use macros::define_port_error;
