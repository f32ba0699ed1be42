//! Driving port for identity read access.

use async_trait::async_trait;

use crate::domain::{Error, Identity, UserId};

/// Driving port used by handlers that resolve the authenticated identity.
#[async_trait]
pub trait IdentityQuery: Send + Sync {
    /// Fetch the identity behind a session principal.
    async fn identity(&self, id: &UserId) -> Result<Identity, Error>;
}
