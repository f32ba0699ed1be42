//! Driving port for the social login flow.

use async_trait::async_trait;

use crate::domain::{AuthorizationExchange, Error, Identity, Provider};

/// Driving port: reconcile a provider callback onto a local identity.
///
/// Implementations collapse every provider-side and storage-side failure into
/// a single opaque [`Error`] so callers cannot distinguish failure causes.
#[async_trait]
pub trait SocialLogin: Send + Sync {
    /// Complete the login for `provider` using the callback `exchange`.
    async fn login_via_provider(
        &self,
        provider: Provider,
        exchange: &AuthorizationExchange,
    ) -> Result<Identity, Error>;
}
