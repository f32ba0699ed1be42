//! Diesel row structs for the identities table.
//!
//! Rows are internal to the persistence layer; repositories convert them to
//! and from domain types at the adapter boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::IdentityPersistenceError;
use crate::domain::{
    AvatarUrl, DisplayName, EmailAddress, Identity, NewIdentity, PasswordCredential, UserId,
    Username,
};

use super::schema::identities;

/// Row read back from the identities table.
#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(super) struct IdentityRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl IdentityRow {
    /// Convert a stored row into a domain identity.
    ///
    /// Rows were validated on the way in, so a conversion failure means the
    /// stored data is corrupted and maps to a query error.
    pub(super) fn into_identity(self) -> Result<Identity, IdentityPersistenceError> {
        let corrupted = |err: &dyn std::fmt::Display| {
            IdentityPersistenceError::query(format!("corrupted identity row: {err}"))
        };

        let email = EmailAddress::new(self.email).map_err(|err| corrupted(&err))?;
        let username = Username::new(self.username).map_err(|err| corrupted(&err))?;
        let display_name = DisplayName::new(self.display_name).map_err(|err| corrupted(&err))?;
        let avatar_url = self
            .avatar_url
            .map(AvatarUrl::new)
            .transpose()
            .map_err(|err| corrupted(&err))?;
        let password = match self.password_hash {
            Some(phc) => PasswordCredential::from_phc(phc),
            None => PasswordCredential::Unusable,
        };

        Ok(Identity::new(
            UserId::from(self.id),
            email,
            username,
            display_name,
            avatar_url,
            password,
        ))
    }
}

/// Row inserted for a new identity.
#[derive(Debug, Insertable)]
#[diesel(table_name = identities)]
pub(super) struct NewIdentityRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub password_hash: Option<String>,
}

impl NewIdentityRow {
    /// Flatten a domain creation request into an insertable row, assigning
    /// the identifier.
    pub(super) fn from_domain(identity: &NewIdentity) -> Self {
        Self {
            id: *UserId::random().as_uuid(),
            email: identity.email.as_ref().to_owned(),
            username: identity.username.as_ref().to_owned(),
            display_name: identity.display_name.as_ref().to_owned(),
            avatar_url: identity.avatar_url.as_ref().map(|url| url.as_ref().to_owned()),
            password_hash: identity.password.as_phc().map(str::to_owned),
        }
    }
}
