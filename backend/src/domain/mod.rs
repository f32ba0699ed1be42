//! Domain primitives and use-case services.
//!
//! Purpose: define strongly typed identities, provider profiles, and the
//! social-login reconciliation service independently of HTTP and storage.
//! Inbound and outbound adapters depend on this module, never the reverse.

pub mod auth;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod identity_lookup;
pub mod password;
pub mod ports;
pub mod provider;
pub mod social_login;
mod trace_id;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PasswordChange, Registration,
};
pub use self::credentials::LocalCredentialsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::identity::{
    AvatarUrl, DisplayName, EmailAddress, Identity, IdentityValidationError, NewIdentity,
    PasswordCredential, UserId, Username,
};
pub use self::identity_lookup::IdentityLookupService;
pub use self::provider::{
    AuthorizationExchange, ExchangeValidationError, Provider, ProviderProfile,
    UnknownProviderError,
};
pub use self::social_login::{ProviderRegistry, SocialLoginService};
pub use self::trace_id::TraceId;
