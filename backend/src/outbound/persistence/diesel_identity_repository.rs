//! PostgreSQL-backed `IdentityRepository` implementation using Diesel ORM.
//!
//! A thin adapter: translate between rows and domain types, map Diesel and
//! pool failures to [`IdentityPersistenceError`], and let the UNIQUE
//! constraints on `email` and `username` arbitrate concurrent creations.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{IdentityPersistenceError, IdentityRepository};
use crate::domain::{EmailAddress, Identity, NewIdentity, PasswordCredential, UserId, Username};

use super::models::{IdentityRow, NewIdentityRow};
use super::pool::{DbPool, PoolError};
use super::schema::identities;

/// Diesel-backed implementation of the `IdentityRepository` port.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    /// Create a new repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            IdentityPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => IdentityPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => {
            IdentityPersistenceError::query("database query error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            IdentityPersistenceError::connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => IdentityPersistenceError::query("database error"),
        _ => IdentityPersistenceError::query("database error"),
    }
}

/// Map an insert failure, resolving unique violations to the column that
/// raised them.
fn map_insert_error(
    error: diesel::result::Error,
    identity: &NewIdentity,
) -> IdentityPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        let constraint = info.constraint_name().unwrap_or_default();
        debug!(constraint, "unique violation on identity insert");
        if constraint.contains("username") {
            return IdentityPersistenceError::duplicate_username(identity.username.as_ref());
        }
        // The table carries exactly two unique constraints; anything that is
        // not the username one is the email key.
        return IdentityPersistenceError::duplicate_email(identity.email.as_ref());
    }
    map_diesel_error(error)
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Identity>, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IdentityRow> = identities::table
            .filter(identities::id.eq(id.as_uuid()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(IdentityRow::into_identity).transpose()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<Identity>, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IdentityRow> = identities::table
            .filter(identities::email.eq(email.as_ref()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(IdentityRow::into_identity).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Identity>, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IdentityRow> = identities::table
            .filter(identities::username.eq(username.as_ref()))
            .select(IdentityRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(IdentityRow::into_identity).transpose()
    }

    async fn create(
        &self,
        identity: &NewIdentity,
    ) -> Result<Identity, IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: IdentityRow = diesel::insert_into(identities::table)
            .values(NewIdentityRow::from_domain(identity))
            .returning(IdentityRow::as_select())
            .get_result(&mut conn)
            .await
            .map_err(|error| map_insert_error(error, identity))?;
        row.into_identity()
    }

    async fn update_password(
        &self,
        id: &UserId,
        password: &PasswordCredential,
    ) -> Result<(), IdentityPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(identities::table.filter(identities::id.eq(id.as_uuid())))
            .set(identities::password_hash.eq(password.as_phc()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(IdentityPersistenceError::query("identity not found"));
        }
        Ok(())
    }
}
