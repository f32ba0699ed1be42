//! Identity data model.
//!
//! An [`Identity`] is the local account a provider profile reconciles onto.
//! Email is the sole reconciliation key; the provider that supplied it is the
//! verification authority. Accounts created by a provider flow carry the
//! unusable password sentinel and can never authenticate locally.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use super::provider::ProviderProfile;

/// Maximum allowed length for usernames and display names.
///
/// Provider-supplied names are stored verbatim, so only length and blankness
/// are constrained here; charset policy for self-service registration lives
/// at the inbound boundary.
pub const NAME_MAX: usize = 150;

/// Validation errors returned by the identity value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmptyUsername,
    UsernameTooLong { max: usize },
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    InvalidAvatarUrl,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "identity id must not be empty"),
            Self::InvalidId => write!(f, "identity id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::InvalidAvatarUrl => write!(f, "avatar url must be a valid URL"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

/// Stable identity identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from string input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, IdentityValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(IdentityValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(IdentityValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| IdentityValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; the provider is the verification authority.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the reconciliation key.
///
/// Stored verbatim as supplied by the provider or the registrant; uniqueness
/// is enforced by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(email: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let email = email.into();
        if email.trim().is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if !email_regex().is_match(&email) {
            return Err(IdentityValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Login handle for an identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(IdentityValidationError::EmptyUsername);
        }
        if username.chars().count() > NAME_MAX {
            return Err(IdentityValidationError::UsernameTooLong { max: NAME_MAX });
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Human readable display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate and construct a [`DisplayName`].
    pub fn new(display_name: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let display_name = display_name.into();
        if display_name.trim().is_empty() {
            return Err(IdentityValidationError::EmptyDisplayName);
        }
        if display_name.chars().count() > NAME_MAX {
            return Err(IdentityValidationError::DisplayNameTooLong { max: NAME_MAX });
        }
        Ok(Self(display_name))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Avatar image URL supplied by a provider or the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Validate and construct an [`AvatarUrl`].
    pub fn new(url: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let url = url.into();
        Url::parse(&url).map_err(|_| IdentityValidationError::InvalidAvatarUrl)?;
        Ok(Self(url))
    }
}

impl AsRef<str> for AvatarUrl {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<AvatarUrl> for String {
    fn from(value: AvatarUrl) -> Self {
        value.0
    }
}

impl TryFrom<String> for AvatarUrl {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Stored password credential.
///
/// `Unusable` is the sentinel written by provider flows: it is distinct from
/// an empty or null hash so no comparison path can ever succeed against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordCredential {
    /// PHC-format argon2 hash of a caller-chosen password.
    Usable(String),
    /// Social-login-only account; local authentication always fails.
    Unusable,
}

impl PasswordCredential {
    /// Wrap an existing PHC hash string.
    pub fn from_phc(phc: impl Into<String>) -> Self {
        Self::Usable(phc.into())
    }

    /// The unusable sentinel for provider-created accounts.
    #[must_use]
    pub fn unusable() -> Self {
        Self::Unusable
    }

    /// Whether a local password could ever match this credential.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Usable(_))
    }

    /// The stored PHC hash, when one exists.
    pub fn as_phc(&self) -> Option<&str> {
        match self {
            Self::Usable(phc) => Some(phc.as_str()),
            Self::Unusable => None,
        }
    }
}

/// Local account reconciled from registration or a provider profile.
///
/// ## Invariants
/// - `email` is unique across the store and is the sole reconciliation key.
/// - An identity with [`PasswordCredential::Unusable`] was created by a
///   provider flow and can never authenticate via password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: UserId,
    email: EmailAddress,
    username: Username,
    display_name: DisplayName,
    avatar_url: Option<AvatarUrl>,
    password: PasswordCredential,
}

impl Identity {
    /// Build an [`Identity`] from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        username: Username,
        display_name: DisplayName,
        avatar_url: Option<AvatarUrl>,
        password: PasswordCredential,
    ) -> Self {
        Self {
            id,
            email,
            username,
            display_name,
            avatar_url,
            password,
        }
    }

    /// Stable identity identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Reconciliation key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name shown to other users.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Avatar image URL, when one is known.
    pub fn avatar_url(&self) -> Option<&AvatarUrl> {
        self.avatar_url.as_ref()
    }

    /// Stored password credential.
    pub fn password(&self) -> &PasswordCredential {
        &self.password
    }
}

/// Identity fields supplied to the store at creation time.
///
/// The store assigns the identifier and enforces email/username uniqueness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIdentity {
    pub email: EmailAddress,
    pub username: Username,
    pub display_name: DisplayName,
    pub avatar_url: Option<AvatarUrl>,
    pub password: PasswordCredential,
}

impl NewIdentity {
    /// Passwordless identity taken verbatim from a provider profile.
    pub fn passwordless_from_profile(profile: &ProviderProfile) -> Self {
        Self {
            email: profile.email().clone(),
            username: profile.username().clone(),
            display_name: profile.display_name().clone(),
            avatar_url: profile.avatar_url().cloned(),
            password: PasswordCredential::Unusable,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", IdentityValidationError::EmptyId)]
    #[case("not-a-uuid", IdentityValidationError::InvalidId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", IdentityValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(
        #[case] raw: &str,
        #[case] expected: IdentityValidationError,
    ) {
        let err = UserId::new(raw).expect_err("invalid ids must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("no-at-sign")]
    #[case("two@@signs@x.com")]
    #[case("user@nodot")]
    fn email_rejects_invalid_shapes(#[case] raw: &str) {
        assert!(EmailAddress::new(raw).is_err(), "{raw:?} should be rejected");
    }

    #[rstest]
    #[case("seheon@example.com")]
    #[case("a.b+c@sub.domain.org")]
    fn email_accepts_valid_addresses(#[case] raw: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_ref(), raw);
    }

    #[test]
    fn provider_names_with_spaces_and_unicode_are_valid() {
        let username = Username::new("김세헌").expect("unicode username");
        let display = DisplayName::new("Ada Lovelace").expect("spaced display name");
        assert_eq!(username.as_ref(), "김세헌");
        assert_eq!(display.as_ref(), "Ada Lovelace");
    }

    #[test]
    fn names_reject_overlong_input() {
        let raw = "x".repeat(NAME_MAX + 1);
        assert_eq!(
            Username::new(raw.clone()).expect_err("overlong username"),
            IdentityValidationError::UsernameTooLong { max: NAME_MAX }
        );
        assert_eq!(
            DisplayName::new(raw).expect_err("overlong display name"),
            IdentityValidationError::DisplayNameTooLong { max: NAME_MAX }
        );
    }

    #[test]
    fn avatar_url_requires_parseable_url() {
        assert!(AvatarUrl::new("https://img.example.com/a.png").is_ok());
        assert!(AvatarUrl::new("not a url").is_err());
    }

    #[test]
    fn unusable_credential_has_no_phc() {
        let credential = PasswordCredential::unusable();
        assert!(!credential.is_usable());
        assert_eq!(credential.as_phc(), None);
    }
}
