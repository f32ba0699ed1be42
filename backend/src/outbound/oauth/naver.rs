//! Naver OAuth gateway.
//!
//! Naver requires the caller's anti-forgery `state` on the token exchange,
//! so a callback without one fails before any request is sent. The profile
//! arrives wrapped in a `response` envelope.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use zeroize::Zeroizing;

use super::dto::{NaverUserDto, TokenResponseDto};
use super::http::{build_client, decode_json, map_transport_error};
use crate::domain::ports::{ProviderError, ProviderGateway};
use crate::domain::{AuthorizationExchange, Provider, ProviderProfile};

const TOKEN_URL: &str = "https://nid.naver.com/oauth2.0/token";
const PROFILE_URL: &str = "https://openapi.naver.com/v1/nid/me";

/// Application credentials registered with Naver.
#[derive(Clone)]
pub struct NaverOAuthSettings {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

/// [`ProviderGateway`] speaking Naver's OAuth endpoints.
pub struct NaverGateway {
    client: Client,
    settings: NaverOAuthSettings,
}

impl NaverGateway {
    /// Build the gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: NaverOAuthSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            settings,
        })
    }

    async fn exchange_code(&self, code: &str, state: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .query(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("state", state),
                ("code", code),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let token: TokenResponseDto = decode_json(response).await?;
        token.into_access_token()
    }
}

#[async_trait]
impl ProviderGateway for NaverGateway {
    fn provider(&self) -> Provider {
        Provider::Naver
    }

    async fn exchange_and_fetch(
        &self,
        exchange: &AuthorizationExchange,
    ) -> Result<ProviderProfile, ProviderError> {
        let state = exchange
            .state()
            .ok_or_else(|| ProviderError::missing_field("state"))?;
        let access_token = self.exchange_code(exchange.code(), state).await?;
        let response = self
            .client
            .get(PROFILE_URL)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(map_transport_error)?;
        let user: NaverUserDto = decode_json(response).await?;
        user.into_profile()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for pre-network validation.
    use super::*;

    #[tokio::test]
    async fn missing_state_fails_before_any_request() {
        let gateway = NaverGateway::new(
            NaverOAuthSettings {
                client_id: String::from("client"),
                client_secret: Zeroizing::new(String::from("secret")),
            },
            Duration::from_secs(1),
        )
        .expect("client builds");

        let exchange =
            AuthorizationExchange::try_from_parts("code-123", None).expect("valid exchange");
        let err = gateway
            .exchange_and_fetch(&exchange)
            .await
            .expect_err("stateless exchange must fail");
        assert_eq!(err, ProviderError::missing_field("state"));
    }
}
