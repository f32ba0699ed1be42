//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` so they depend on
//! domain ports only and remain testable without network or database I/O.

use std::sync::Arc;

use crate::domain::ports::{CredentialsService, IdentityQuery, SocialLogin, TokenIssuer};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Password login, registration, and password changes.
    pub credentials: Arc<dyn CredentialsService>,
    /// Provider callback reconciliation.
    pub social: Arc<dyn SocialLogin>,
    /// Identity reads for the profile endpoints.
    pub identities: Arc<dyn IdentityQuery>,
    /// Bearer token issuance for non-browser clients.
    pub tokens: Arc<dyn TokenIssuer>,
}

impl HttpState {
    /// Bundle the port implementations handlers depend on.
    pub fn new(
        credentials: Arc<dyn CredentialsService>,
        social: Arc<dyn SocialLogin>,
        identities: Arc<dyn IdentityQuery>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            credentials,
            social,
            identities,
            tokens,
        }
    }
}
