//! Argon2 password hashing for local credentials.
//!
//! Hashes are stored as PHC strings. Verification against the unusable
//! sentinel short-circuits to failure without touching the hasher, so a
//! provider-created account can never authenticate locally.

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use password_hash::{PasswordHash, SaltString};
use rand_core::OsRng;

use super::identity::PasswordCredential;

/// Error returned when hashing a new password fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct HashingError {
    message: String,
}

/// Hash a caller-chosen password into a usable credential.
pub fn hash_password(raw: &str) -> Result<PasswordCredential, HashingError> {
    let salt = SaltString::generate(&mut OsRng);
    let phc = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|err| HashingError {
            message: err.to_string(),
        })?
        .to_string();
    Ok(PasswordCredential::from_phc(phc))
}

/// Verify a candidate password against a stored credential.
///
/// Returns `false` for the unusable sentinel and for malformed stored
/// hashes; neither case distinguishes itself to the caller.
pub fn verify_credential(credential: &PasswordCredential, raw: &str) -> bool {
    let Some(phc) = credential.as_phc() else {
        return false;
    };
    let Ok(parsed) = PasswordHash::new(phc) else {
        tracing::warn!("stored password hash failed to parse; rejecting login");
        return false;
    };
    Argon2::default()
        .verify_password(raw.as_bytes(), &parsed)
        .is_ok()
}
