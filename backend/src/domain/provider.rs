//! Social-login providers and the ephemeral values that flow through one
//! login attempt.
//!
//! The provider set is closed: each variant's token-exchange shape and
//! profile field paths are known at compile time, so dispatch is an enum
//! match rather than runtime string lookup. Inbound adapters parse path
//! segments with [`Provider::from_str`] and reject unknown identifiers
//! before any network call is made.

use std::fmt;
use std::str::FromStr;

use super::identity::{AvatarUrl, DisplayName, EmailAddress, Username};

/// Supported OAuth identity providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    GitHub,
    Kakao,
    Naver,
    Google,
}

impl Provider {
    /// All supported providers, in registry order.
    pub const ALL: [Provider; 4] = [
        Provider::GitHub,
        Provider::Kakao,
        Provider::Naver,
        Provider::Google,
    ];

    /// Stable lowercase identifier used in routes and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GitHub => "github",
            Self::Kakao => "kakao",
            Self::Naver => "naver",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a provider identifier is not in the supported set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProviderError(pub String);

impl FromStr for Provider {
    type Err = UnknownProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "github" => Ok(Self::GitHub),
            "kakao" => Ok(Self::Kakao),
            "naver" => Ok(Self::Naver),
            "google" => Ok(Self::Google),
            other => Err(UnknownProviderError(other.to_owned())),
        }
    }
}

/// Validation errors for [`AuthorizationExchange`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeValidationError {
    /// Authorization code was missing or blank.
    EmptyCode,
}

impl fmt::Display for ExchangeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "authorization code must not be empty"),
        }
    }
}

impl std::error::Error for ExchangeValidationError {}

/// One authorization-code redemption attempt.
///
/// Single-use by provider contract: reuse fails at the provider's token
/// endpoint and is never cached locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationExchange {
    code: String,
    state: Option<String>,
}

impl AuthorizationExchange {
    /// Construct an exchange from the caller-supplied code and optional state.
    pub fn try_from_parts(
        code: &str,
        state: Option<&str>,
    ) -> Result<Self, ExchangeValidationError> {
        if code.trim().is_empty() {
            return Err(ExchangeValidationError::EmptyCode);
        }
        Ok(Self {
            code: code.to_owned(),
            state: state.map(str::to_owned),
        })
    }

    /// Authorization code issued by the provider's consent redirect.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }

    /// Provider-required state token, when the caller supplied one.
    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }
}

/// Provider-agnostic profile produced by a provider adapter.
///
/// Ephemeral: consumed once by the reconciliation service, never persisted
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderProfile {
    provider: Provider,
    native_id: Option<String>,
    email: EmailAddress,
    username: Username,
    display_name: DisplayName,
    avatar_url: Option<AvatarUrl>,
}

impl ProviderProfile {
    /// Build a canonical profile from adapter-extracted fields.
    pub fn new(
        provider: Provider,
        native_id: Option<String>,
        email: EmailAddress,
        username: Username,
        display_name: DisplayName,
        avatar_url: Option<AvatarUrl>,
    ) -> Self {
        Self {
            provider,
            native_id,
            email,
            username,
            display_name,
            avatar_url,
        }
    }

    /// Provider that vouched for this profile.
    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// Provider-native account identifier, for log correlation only.
    /// Kakao and Naver omit it from some profile payloads.
    pub fn native_id(&self) -> Option<&str> {
        self.native_id.as_deref()
    }

    /// Verified email, the reconciliation key.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Login handle derived from the provider profile.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name derived from the provider profile.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Avatar URL, when the provider supplied one.
    pub fn avatar_url(&self) -> Option<&AvatarUrl> {
        self.avatar_url.as_ref()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("github", Provider::GitHub)]
    #[case("kakao", Provider::Kakao)]
    #[case("naver", Provider::Naver)]
    #[case("google", Provider::Google)]
    fn provider_identifiers_round_trip(#[case] raw: &str, #[case] expected: Provider) {
        let parsed: Provider = raw.parse().expect("known provider");
        assert_eq!(parsed, expected);
        assert_eq!(parsed.as_str(), raw);
    }

    #[rstest]
    #[case("facebook")]
    #[case("GitHub")]
    #[case("")]
    fn unknown_identifiers_are_rejected(#[case] raw: &str) {
        let err = Provider::from_str(raw).expect_err("unknown provider must fail");
        assert_eq!(err, UnknownProviderError(raw.to_owned()));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_codes_are_rejected(#[case] code: &str) {
        let err = AuthorizationExchange::try_from_parts(code, None)
            .expect_err("blank codes must fail");
        assert_eq!(err, ExchangeValidationError::EmptyCode);
    }

    #[test]
    fn exchange_preserves_state() {
        let exchange = AuthorizationExchange::try_from_parts("abc123", Some("xyzzy"))
            .expect("valid exchange");
        assert_eq!(exchange.code(), "abc123");
        assert_eq!(exchange.state(), Some("xyzzy"));
    }
}
