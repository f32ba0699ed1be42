//! Server configuration and environment loading.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use thiserror::Error as ThisError;
use zeroize::Zeroizing;

use crate::outbound::oauth::{
    GithubOAuthSettings, GoogleOAuthSettings, KakaoOAuthSettings, NaverOAuthSettings,
};
use crate::outbound::persistence::DbPool;
use crate::outbound::token::DEFAULT_TOKEN_TTL;

/// A configuration value the process cannot start without was missing or
/// malformed.
#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("missing required environment variable {name}")]
    MissingVar { name: String },
    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },
}

fn required(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, ConfigError> {
    lookup(name)
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| ConfigError::MissingVar { name: name.into() })
}

/// Per-provider application credentials.
#[derive(Clone)]
pub struct OAuthConfig {
    pub github: GithubOAuthSettings,
    pub kakao: KakaoOAuthSettings,
    pub naver: NaverOAuthSettings,
    pub google: GoogleOAuthSettings,
}

impl OAuthConfig {
    /// Load provider credentials from the process environment.
    ///
    /// Required variables: `GITHUB_CLIENT_ID`, `GITHUB_CLIENT_SECRET`,
    /// `KAKAO_CLIENT_ID`, `KAKAO_REDIRECT_URI`, `NAVER_CLIENT_ID`,
    /// `NAVER_CLIENT_SECRET`, `GOOGLE_CLIENT_ID`, `GOOGLE_CLIENT_SECRET`,
    /// and `GOOGLE_REDIRECT_URI`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&|name| env::var(name).ok())
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            github: GithubOAuthSettings {
                client_id: required(lookup, "GITHUB_CLIENT_ID")?,
                client_secret: Zeroizing::new(required(lookup, "GITHUB_CLIENT_SECRET")?),
            },
            kakao: KakaoOAuthSettings {
                client_id: required(lookup, "KAKAO_CLIENT_ID")?,
                redirect_uri: required(lookup, "KAKAO_REDIRECT_URI")?,
            },
            naver: NaverOAuthSettings {
                client_id: required(lookup, "NAVER_CLIENT_ID")?,
                client_secret: Zeroizing::new(required(lookup, "NAVER_CLIENT_SECRET")?),
            },
            google: GoogleOAuthSettings {
                client_id: required(lookup, "GOOGLE_CLIENT_ID")?,
                client_secret: Zeroizing::new(required(lookup, "GOOGLE_CLIENT_SECRET")?),
                redirect_uri: required(lookup, "GOOGLE_REDIRECT_URI")?,
            },
        })
    }
}

/// Bearer token signing configuration.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: Zeroizing<String>,
    pub ttl: Duration,
}

impl TokenConfig {
    /// Load the signing secret and token lifetime from the environment.
    ///
    /// `TOKEN_SECRET_FILE` takes precedence over `TOKEN_SECRET` so the
    /// secret can be mounted rather than passed inline. `TOKEN_TTL_SECS`
    /// overrides the default lifetime of one day.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup = |name: &str| env::var(name).ok();
        if let Ok(path) = env::var("TOKEN_SECRET_FILE") {
            let raw = std::fs::read_to_string(&path).map_err(|e| ConfigError::InvalidVar {
                name: "TOKEN_SECRET_FILE".into(),
                reason: format!("could not read {path}: {e}"),
            })?;
            return Ok(Self {
                secret: Zeroizing::new(raw.trim_end().to_owned()),
                ttl: Self::ttl_from_lookup(&lookup)?,
            });
        }
        Self::from_lookup(&lookup)
    }

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            secret: Zeroizing::new(required(lookup, "TOKEN_SECRET")?),
            ttl: Self::ttl_from_lookup(lookup)?,
        })
    }

    fn ttl_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Duration, ConfigError> {
        match lookup("TOKEN_TTL_SECS") {
            Some(raw) => {
                let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidVar {
                    name: "TOKEN_TTL_SECS".into(),
                    reason: format!("expected a number of seconds, got {raw:?}"),
                })?;
                Ok(Duration::from_secs(secs))
            }
            None => Ok(DEFAULT_TOKEN_TTL),
        }
    }
}

/// Configuration for constructing the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) oauth: OAuthConfig,
    pub(crate) token: TokenConfig,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(
        key: Key,
        cookie_secure: bool,
        same_site: SameSite,
        bind_addr: SocketAddr,
        oauth: OAuthConfig,
        token: TokenConfig,
    ) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            db_pool: None,
            oauth,
            token,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the server keeps identities in process memory, which
    /// suits tests and local development only.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// The socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::rstest;

    use super::*;

    fn vars(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(name, value)| ((*name).to_owned(), (*value).to_owned()))
            .collect()
    }

    fn full_oauth_vars() -> HashMap<String, String> {
        vars(&[
            ("GITHUB_CLIENT_ID", "gh-id"),
            ("GITHUB_CLIENT_SECRET", "gh-secret"),
            ("KAKAO_CLIENT_ID", "kakao-id"),
            ("KAKAO_REDIRECT_URI", "https://app.example.com/kakao"),
            ("NAVER_CLIENT_ID", "naver-id"),
            ("NAVER_CLIENT_SECRET", "naver-secret"),
            ("GOOGLE_CLIENT_ID", "google-id"),
            ("GOOGLE_CLIENT_SECRET", "google-secret"),
            ("GOOGLE_REDIRECT_URI", "https://app.example.com/google"),
        ])
    }

    #[test]
    fn oauth_config_loads_all_provider_credentials() {
        let env = full_oauth_vars();
        let config =
            OAuthConfig::from_lookup(&|name| env.get(name).cloned()).expect("complete env");
        assert_eq!(config.github.client_id, "gh-id");
        assert_eq!(config.kakao.redirect_uri, "https://app.example.com/kakao");
        assert_eq!(config.naver.client_id, "naver-id");
        assert_eq!(config.google.redirect_uri, "https://app.example.com/google");
    }

    #[rstest]
    #[case("GITHUB_CLIENT_SECRET")]
    #[case("KAKAO_REDIRECT_URI")]
    #[case("NAVER_CLIENT_ID")]
    #[case("GOOGLE_CLIENT_SECRET")]
    fn oauth_config_reports_the_missing_variable(#[case] removed: &str) {
        let mut env = full_oauth_vars();
        env.remove(removed);
        let Err(error) = OAuthConfig::from_lookup(&|name| env.get(name).cloned()) else {
            panic!("incomplete env must fail");
        };
        assert!(matches!(error, ConfigError::MissingVar { ref name } if name == removed));
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut env = full_oauth_vars();
        env.insert("GITHUB_CLIENT_ID".into(), "   ".into());
        let Err(error) = OAuthConfig::from_lookup(&|name| env.get(name).cloned()) else {
            panic!("blank value must fail");
        };
        assert!(matches!(error, ConfigError::MissingVar { ref name } if name == "GITHUB_CLIENT_ID"));
    }

    #[test]
    fn token_config_defaults_the_ttl() {
        let env = vars(&[("TOKEN_SECRET", "signing-secret")]);
        let config = TokenConfig::from_lookup(&|name| env.get(name).cloned()).expect("secret set");
        assert_eq!(config.ttl, DEFAULT_TOKEN_TTL);
    }

    #[test]
    fn token_config_honours_a_ttl_override() {
        let env = vars(&[("TOKEN_SECRET", "signing-secret"), ("TOKEN_TTL_SECS", "900")]);
        let config = TokenConfig::from_lookup(&|name| env.get(name).cloned()).expect("valid env");
        assert_eq!(config.ttl, Duration::from_secs(900));
    }

    #[test]
    fn token_config_rejects_a_malformed_ttl() {
        let env = vars(&[
            ("TOKEN_SECRET", "signing-secret"),
            ("TOKEN_TTL_SECS", "soon"),
        ]);
        let Err(error) = TokenConfig::from_lookup(&|name| env.get(name).cloned()) else {
            panic!("malformed ttl must fail");
        };
        assert!(matches!(error, ConfigError::InvalidVar { ref name, .. } if name == "TOKEN_TTL_SECS"));
    }
}
