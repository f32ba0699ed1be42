//! Session helpers keeping HTTP handlers free of framework-specific logic.
//!
//! Wraps the Actix session so handlers work with domain-friendly operations:
//! persisting the authenticated identity, requiring it, and purging it on
//! logout. Session establishment is an inbound concern; domain services
//! return identities and never touch cookies.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, UserId};

pub(crate) const IDENTITY_ID_KEY: &str = "identity_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity id in the session cookie.
    pub fn persist_identity(&self, id: &UserId) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_ID_KEY, id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current identity id from the session, if present.
    pub fn identity_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<String>(IDENTITY_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid identity id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated identity id or return `401 Unauthorized`.
    pub fn require_identity_id(&self) -> Result<UserId, Error> {
        self.identity_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop all session state, invalidating the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
