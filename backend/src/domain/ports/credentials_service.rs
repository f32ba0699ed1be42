//! Driving port for password-based account operations.

use async_trait::async_trait;

use crate::domain::{Error, Identity, LoginCredentials, PasswordChange, Registration, UserId};

/// Driving port for local credential operations.
///
/// Authentication failures are opaque: a missing username, a wrong password
/// and an unusable credential all surface as the same [`Error`].
#[async_trait]
pub trait CredentialsService: Send + Sync {
    /// Verify a username/password pair, returning the identity on success.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;

    /// Create a new identity with a usable password credential.
    async fn register(&self, registration: &Registration) -> Result<Identity, Error>;

    /// Replace the password after verifying the current one.
    async fn change_password(&self, id: &UserId, change: &PasswordChange) -> Result<(), Error>;
}
