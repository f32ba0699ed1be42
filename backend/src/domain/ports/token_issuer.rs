//! Driven port for bearer token issuance.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while minting a bearer token.
    pub enum TokenIssueError {
        /// The token could not be signed.
        Signing { message: String } => "token signing failed: {message}",
    }
}

/// Opaque signed bearer token handed to non-browser clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap an already signed token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The signed token string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<BearerToken> for String {
    fn from(value: BearerToken) -> Self {
        value.0
    }
}

/// Driven port that signs a bearer token for an authenticated identity.
pub trait TokenIssuer: Send + Sync {
    /// Mint a token whose subject is `id`.
    fn issue(&self, id: &UserId) -> Result<BearerToken, TokenIssueError>;
}
