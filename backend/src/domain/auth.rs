//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::identity::{
    DisplayName, EmailAddress, IdentityValidationError, Username,
};

/// Minimum accepted password length for self-service registration.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when login or password payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
    /// New password was shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// A registration field failed identity validation.
    InvalidField(IdentityValidationError),
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::InvalidField(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

impl From<IdentityValidationError> for LoginValidationError {
    fn from(value: IdentityValidationError) -> Self {
        Self::InvalidField(value)
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for identity lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated self-service registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    username: Username,
    email: EmailAddress,
    display_name: DisplayName,
    password: Zeroizing<String>,
}

impl Registration {
    /// Construct a registration from raw inputs, enforcing field invariants
    /// and the minimum password length.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        display_name: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            username: Username::new(username.trim())?,
            email: EmailAddress::new(email.trim())?,
            display_name: DisplayName::new(display_name.trim())?,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Registrant email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Requested display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Caller-chosen password, hashed by the credentials service.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated change-password payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    old_password: Zeroizing<String>,
    new_password: Zeroizing<String>,
}

impl PasswordChange {
    /// Construct a password change from the old and new secrets.
    pub fn try_from_parts(
        old_password: &str,
        new_password: &str,
    ) -> Result<Self, LoginValidationError> {
        if old_password.is_empty() || new_password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if new_password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            old_password: Zeroizing::new(old_password.to_owned()),
            new_password: Zeroizing::new(new_password.to_owned()),
        })
    }

    /// Password currently on record, to be verified before any change.
    pub fn old_password(&self) -> &str {
        self.old_password.as_str()
    }

    /// Replacement password.
    pub fn new_password(&self) -> &str {
        self.new_password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyUsername)]
    #[case("   ", "pw", LoginValidationError::EmptyUsername)]
    #[case("user", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(username, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  seheon  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_username(#[case] username: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(username, password)
            .expect("valid inputs should succeed");
        assert_eq!(creds.username(), username.trim());
        assert_eq!(creds.password(), password);
    }

    #[test]
    fn registration_enforces_password_minimum() {
        let err = Registration::try_from_parts("seheon", "s@x.com", "Seheon", "short")
            .expect_err("short passwords must fail");
        assert_eq!(err, LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }

    #[test]
    fn registration_rejects_invalid_email() {
        let err = Registration::try_from_parts("seheon", "not-an-email", "Seheon", "longenough")
            .expect_err("invalid email must fail");
        assert!(matches!(err, LoginValidationError::InvalidField(_)));
    }

    #[test]
    fn password_change_requires_both_secrets() {
        let err = PasswordChange::try_from_parts("", "replacement1")
            .expect_err("missing old password must fail");
        assert_eq!(err, LoginValidationError::EmptyPassword);

        let change = PasswordChange::try_from_parts("current", "replacement1")
            .expect("valid change");
        assert_eq!(change.old_password(), "current");
        assert_eq!(change.new_password(), "replacement1");
    }
}
