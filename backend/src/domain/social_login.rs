//! Social login reconciliation service.
//!
//! Implements [`SocialLogin`]: redeem the provider callback for a profile,
//! then reconcile that profile onto a local identity keyed by email. Every
//! failure along the way collapses into one opaque unauthorized [`Error`];
//! causes are logged, never returned.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{IdentityPersistenceError, IdentityRepository, ProviderGateway, SocialLogin};
use super::{AuthorizationExchange, Error, Identity, NewIdentity, Provider, ProviderProfile};

/// One gateway per supported provider.
///
/// The registry is total: a [`Provider`] value always resolves to a gateway,
/// so unknown providers are rejected by parsing before reaching the service.
pub struct ProviderRegistry {
    github: Arc<dyn ProviderGateway>,
    kakao: Arc<dyn ProviderGateway>,
    naver: Arc<dyn ProviderGateway>,
    google: Arc<dyn ProviderGateway>,
}

impl ProviderRegistry {
    /// Assemble a registry from one gateway per provider.
    pub fn new(
        github: Arc<dyn ProviderGateway>,
        kakao: Arc<dyn ProviderGateway>,
        naver: Arc<dyn ProviderGateway>,
        google: Arc<dyn ProviderGateway>,
    ) -> Self {
        Self {
            github,
            kakao,
            naver,
            google,
        }
    }

    /// Resolve the gateway for `provider`.
    pub fn gateway(&self, provider: Provider) -> &dyn ProviderGateway {
        match provider {
            Provider::GitHub => self.github.as_ref(),
            Provider::Kakao => self.kakao.as_ref(),
            Provider::Naver => self.naver.as_ref(),
            Provider::Google => self.google.as_ref(),
        }
    }
}

/// Reconciles provider callbacks onto local identities.
pub struct SocialLoginService {
    providers: ProviderRegistry,
    identities: Arc<dyn IdentityRepository>,
}

impl SocialLoginService {
    /// Build the service over a gateway registry and an identity store.
    pub fn new(providers: ProviderRegistry, identities: Arc<dyn IdentityRepository>) -> Self {
        Self {
            providers,
            identities,
        }
    }

    fn auth_failed() -> Error {
        Error::unauthorized("social login failed")
    }

    /// Map a profile onto the local identity that owns its email.
    ///
    /// Creation races against concurrent attempts for the same email resolve
    /// through the store's uniqueness constraint: a `DuplicateEmail` loss is
    /// recovered by a single re-read, so every concurrent attempt converges
    /// on the one identity that won.
    async fn reconcile(&self, profile: &ProviderProfile) -> Result<Identity, Error> {
        let existing = self
            .identities
            .find_by_email(profile.email())
            .await
            .map_err(|error| {
                tracing::warn!(provider = %profile.provider(), %error, "identity lookup failed");
                Self::auth_failed()
            })?;
        if let Some(identity) = existing {
            return Ok(identity);
        }

        let new_identity = NewIdentity::passwordless_from_profile(profile);
        match self.identities.create(&new_identity).await {
            Ok(created) => {
                tracing::info!(
                    provider = %profile.provider(),
                    identity = %created.id(),
                    "created passwordless identity"
                );
                Ok(created)
            }
            Err(IdentityPersistenceError::DuplicateEmail { .. }) => {
                // Lost the creation race; the winner's identity must exist now.
                self.identities
                    .find_by_email(profile.email())
                    .await
                    .map_err(|error| {
                        tracing::warn!(provider = %profile.provider(), %error, "post-race lookup failed");
                        Self::auth_failed()
                    })?
                    .ok_or_else(|| {
                        tracing::warn!(
                            provider = %profile.provider(),
                            "duplicate email reported but identity absent"
                        );
                        Self::auth_failed()
                    })
            }
            Err(error) => {
                tracing::warn!(provider = %profile.provider(), %error, "identity creation failed");
                Err(Self::auth_failed())
            }
        }
    }
}

#[async_trait]
impl SocialLogin for SocialLoginService {
    async fn login_via_provider(
        &self,
        provider: Provider,
        exchange: &AuthorizationExchange,
    ) -> Result<Identity, Error> {
        let gateway = self.providers.gateway(provider);
        let profile = gateway.exchange_and_fetch(exchange).await.map_err(|error| {
            tracing::warn!(provider = %provider, %error, "provider exchange failed");
            Self::auth_failed()
        })?;
        self.reconcile(&profile).await
    }
}
