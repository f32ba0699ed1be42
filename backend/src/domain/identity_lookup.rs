//! Identity read service backing the profile endpoints.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{IdentityPersistenceError, IdentityQuery, IdentityRepository};
use super::{Error, Identity, UserId};

/// Resolves session principals to stored identities.
pub struct IdentityLookupService {
    identities: Arc<dyn IdentityRepository>,
}

impl IdentityLookupService {
    /// Build the service over an identity store.
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }
}

#[async_trait]
impl IdentityQuery for IdentityLookupService {
    async fn identity(&self, id: &UserId) -> Result<Identity, Error> {
        let identity = self.identities.find_by_id(id).await.map_err(|error| {
            tracing::warn!(%error, "identity lookup failed");
            match error {
                IdentityPersistenceError::Connection { .. } => {
                    Error::service_unavailable("identity store unavailable")
                }
                _ => Error::internal("identity store failure"),
            }
        })?;
        identity.ok_or_else(|| Error::not_found("identity not found"))
    }
}
