//! Password credential service.
//!
//! Implements [`CredentialsService`] over the identity store and the argon2
//! hashing helpers. Authentication keeps failure causes opaque: unknown
//! username, wrong password, and the unusable sentinel all produce the same
//! unauthorized error.

use std::sync::Arc;

use async_trait::async_trait;

use super::password::{hash_password, verify_credential};
use super::ports::{CredentialsService, IdentityPersistenceError, IdentityRepository};
use super::{
    Error, Identity, LoginCredentials, NewIdentity, PasswordChange, Registration, UserId, Username,
};

/// Username/password operations backed by the identity store.
pub struct LocalCredentialsService {
    identities: Arc<dyn IdentityRepository>,
}

impl LocalCredentialsService {
    /// Build the service over an identity store.
    pub fn new(identities: Arc<dyn IdentityRepository>) -> Self {
        Self { identities }
    }

    fn invalid_credentials() -> Error {
        Error::unauthorized("invalid username or password")
    }

    fn storage_error(error: &IdentityPersistenceError) -> Error {
        match error {
            IdentityPersistenceError::Connection { .. } => {
                Error::service_unavailable("identity store unavailable")
            }
            IdentityPersistenceError::DuplicateEmail { .. } => {
                Error::conflict("email is already registered")
            }
            IdentityPersistenceError::DuplicateUsername { .. } => {
                Error::conflict("username is already taken")
            }
            IdentityPersistenceError::Query { .. } => Error::internal("identity store failure"),
        }
    }
}

#[async_trait]
impl CredentialsService for LocalCredentialsService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let username = Username::new(credentials.username())
            .map_err(|_| Self::invalid_credentials())?;
        let identity = self
            .identities
            .find_by_username(&username)
            .await
            .map_err(|error| {
                tracing::warn!(%error, "username lookup failed");
                Self::storage_error(&error)
            })?;
        let Some(identity) = identity else {
            return Err(Self::invalid_credentials());
        };
        // An unusable credential never matches, so social-only accounts
        // cannot be entered through the password path.
        if !verify_credential(identity.password(), credentials.password()) {
            return Err(Self::invalid_credentials());
        }
        Ok(*identity.id())
    }

    async fn register(&self, registration: &Registration) -> Result<Identity, Error> {
        let password = hash_password(registration.password()).map_err(|error| {
            tracing::error!(%error, "password hashing failed");
            Error::internal("could not process the password")
        })?;
        let new_identity = NewIdentity {
            email: registration.email().clone(),
            username: registration.username().clone(),
            display_name: registration.display_name().clone(),
            avatar_url: None,
            password,
        };
        self.identities.create(&new_identity).await.map_err(|error| {
            tracing::warn!(%error, "registration failed");
            Self::storage_error(&error)
        })
    }

    async fn change_password(&self, id: &UserId, change: &PasswordChange) -> Result<(), Error> {
        let identity = self
            .identities
            .find_by_id(id)
            .await
            .map_err(|error| {
                tracing::warn!(%error, "identity lookup failed");
                Self::storage_error(&error)
            })?
            .ok_or_else(|| Error::not_found("identity not found"))?;
        if !verify_credential(identity.password(), change.old_password()) {
            return Err(Error::invalid_request("current password is incorrect"));
        }
        let password = hash_password(change.new_password()).map_err(|error| {
            tracing::error!(%error, "password hashing failed");
            Error::internal("could not process the password")
        })?;
        self.identities
            .update_password(id, &password)
            .await
            .map_err(|error| {
                tracing::warn!(%error, "password update failed");
                Self::storage_error(&error)
            })
    }
}
