//! Driven port for identity persistence adapters and their errors.
//!
//! The store owns uniqueness: concurrent duplicate creations for one email
//! must be resolved by a storage-layer constraint surfaced as
//! [`IdentityPersistenceError::DuplicateEmail`], never by an in-process lock,
//! so multiple process instances stay correct.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Identity, NewIdentity, PasswordCredential, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by identity repository adapters.
    pub enum IdentityPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "identity repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity repository query failed: {message}",
        /// Another identity already holds this email.
        DuplicateEmail { email: String } => "identity already exists for email {email}",
        /// Another identity already holds this username.
        DuplicateUsername { username: String } => "identity already exists for username {username}",
    }
}

/// Driven port for identity lookup and creation.
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Fetch an identity by its identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityPersistenceError>;

    /// Fetch an identity by the reconciliation key.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityPersistenceError>;

    /// Fetch an identity by its login handle.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityPersistenceError>;

    /// Insert a new identity, assigning its identifier.
    ///
    /// Uniqueness violations surface as `DuplicateEmail`/`DuplicateUsername`.
    async fn create(&self, identity: &NewIdentity)
        -> Result<Identity, IdentityPersistenceError>;

    /// Replace the stored password credential for an identity.
    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordCredential,
    ) -> Result<(), IdentityPersistenceError>;
}

/// In-memory identity repository with store-level uniqueness semantics.
///
/// Backs the server when no database is configured and doubles as a
/// deterministic test repository: `create` enforces email and username
/// uniqueness under a single mutex, mirroring the SQL constraints.
#[derive(Debug, Default)]
pub struct InMemoryIdentityRepository {
    identities: std::sync::Mutex<Vec<Identity>>,
}

impl InMemoryIdentityRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored identities.
    pub fn len(&self) -> usize {
        self.identities.lock().expect("identity store lock").len()
    }

    /// Whether the repository holds no identities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityPersistenceError> {
        let identities = self.identities.lock().expect("identity store lock");
        Ok(identities.iter().find(|i| i.id() == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityPersistenceError> {
        let identities = self.identities.lock().expect("identity store lock");
        Ok(identities.iter().find(|i| i.email() == email).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityPersistenceError> {
        let identities = self.identities.lock().expect("identity store lock");
        Ok(identities.iter().find(|i| i.username() == username).cloned())
    }

    async fn create(
        &self,
        identity: &NewIdentity,
    ) -> Result<Identity, IdentityPersistenceError> {
        let mut identities = self.identities.lock().expect("identity store lock");
        if identities.iter().any(|i| i.email() == &identity.email) {
            return Err(IdentityPersistenceError::duplicate_email(
                identity.email.as_ref(),
            ));
        }
        if identities.iter().any(|i| i.username() == &identity.username) {
            return Err(IdentityPersistenceError::duplicate_username(
                identity.username.as_ref(),
            ));
        }

        let created = Identity::new(
            UserId::random(),
            identity.email.clone(),
            identity.username.clone(),
            identity.display_name.clone(),
            identity.avatar_url.clone(),
            identity.password.clone(),
        );
        identities.push(created.clone());
        Ok(created)
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordCredential,
    ) -> Result<(), IdentityPersistenceError> {
        let mut identities = self.identities.lock().expect("identity store lock");
        let Some(position) = identities.iter().position(|i| i.id() == id) else {
            return Err(IdentityPersistenceError::query("identity not found"));
        };
        let existing = identities
            .get(position)
            .cloned()
            .ok_or_else(|| IdentityPersistenceError::query("identity not found"))?;
        identities[position] = Identity::new(
            *existing.id(),
            existing.email().clone(),
            existing.username().clone(),
            existing.display_name().clone(),
            existing.avatar_url().cloned(),
            password.clone(),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for in-memory uniqueness semantics.
    use std::sync::Arc;

    use super::*;
    use crate::domain::{DisplayName, EmailAddress, Username};

    fn new_identity(email: &str, username: &str) -> NewIdentity {
        NewIdentity {
            email: EmailAddress::new(email).expect("valid email"),
            username: Username::new(username).expect("valid username"),
            display_name: DisplayName::new("Test Identity").expect("valid display name"),
            avatar_url: None,
            password: PasswordCredential::unusable(),
        }
    }

    #[tokio::test]
    async fn create_then_find_by_email_round_trips() {
        let repository = InMemoryIdentityRepository::new();
        let created = repository
            .create(&new_identity("a@x.com", "a"))
            .await
            .expect("create succeeds");

        let found = repository
            .find_by_email(created.email())
            .await
            .expect("lookup succeeds")
            .expect("identity present");
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repository = InMemoryIdentityRepository::new();
        repository
            .create(&new_identity("a@x.com", "first"))
            .await
            .expect("first create succeeds");

        let err = repository
            .create(&new_identity("a@x.com", "second"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(
            err,
            IdentityPersistenceError::duplicate_email("a@x.com")
        );
        assert_eq!(repository.len(), 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_creations_persist_exactly_one() {
        let repository = Arc::new(InMemoryIdentityRepository::new());
        let mut handles = Vec::new();
        for worker in 0..8 {
            let repository = Arc::clone(&repository);
            handles.push(tokio::spawn(async move {
                let identity = new_identity("raced@x.com", &format!("worker-{worker}"));
                repository.create(&identity).await
            }));
        }

        let mut created = 0;
        let mut duplicates = 0;
        for handle in handles {
            match handle.await.expect("task completes") {
                Ok(_) => created += 1,
                Err(IdentityPersistenceError::DuplicateEmail { .. }) => duplicates += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(created, 1, "exactly one creation must win");
        assert_eq!(duplicates, 7);
        assert_eq!(repository.len(), 1);
    }
}
