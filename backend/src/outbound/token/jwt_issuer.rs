//! HS256 JWT issuer backing the non-browser login path.
//!
//! Tokens carry the identity id as `sub` plus `iat`/`exp`; they expire after
//! the configured TTL and are never persisted server-side.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{BearerToken, TokenIssueError, TokenIssuer};
use crate::domain::UserId;

/// Token lifetime applied when the configuration does not override it.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60 * 24);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// [`TokenIssuer`] signing HS256 tokens with a shared secret.
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    ttl: Duration,
}

impl JwtTokenIssuer {
    /// Build an issuer from the shared secret and token lifetime.
    pub fn new(secret: &Zeroizing<String>, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

impl TokenIssuer for JwtTokenIssuer {
    fn issue(&self, id: &UserId) -> Result<BearerToken, TokenIssueError> {
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs())
            .map_err(|_| TokenIssueError::signing("token ttl exceeds representable range"))?;
        let claims = Claims {
            sub: id.to_string(),
            iat: now,
            exp: now + ttl,
        };
        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|error| TokenIssueError::signing(error.to_string()))?;
        Ok(BearerToken::new(token))
    }
}
