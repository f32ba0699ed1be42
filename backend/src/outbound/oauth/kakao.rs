//! Kakao OAuth gateway.
//!
//! Kakao's token endpoint takes a urlencoded form without a client secret;
//! the registered redirect URI must be echoed back with the code. Profile
//! fields arrive nested under `kakao_account`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::dto::{KakaoUserDto, TokenResponseDto};
use super::http::{build_client, decode_json, map_transport_error};
use crate::domain::ports::{ProviderError, ProviderGateway};
use crate::domain::{AuthorizationExchange, Provider, ProviderProfile};

const TOKEN_URL: &str = "https://kauth.kakao.com/oauth/token";
const PROFILE_URL: &str = "https://kapi.kakao.com/v2/user/me";

/// Application credentials registered with Kakao.
#[derive(Clone)]
pub struct KakaoOAuthSettings {
    pub client_id: String,
    pub redirect_uri: String,
}

/// [`ProviderGateway`] speaking Kakao's OAuth endpoints.
pub struct KakaoGateway {
    client: Client,
    settings: KakaoOAuthSettings,
}

impl KakaoGateway {
    /// Build the gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: KakaoOAuthSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            settings,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.settings.client_id.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
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
impl ProviderGateway for KakaoGateway {
    fn provider(&self) -> Provider {
        Provider::Kakao
    }

    async fn exchange_and_fetch(
        &self,
        exchange: &AuthorizationExchange,
    ) -> Result<ProviderProfile, ProviderError> {
        let access_token = self.exchange_code(exchange.code()).await?;
        let response = self
            .client
            .get(PROFILE_URL)
            .bearer_auth(&access_token)
            .send()
            .await
            .map_err(map_transport_error)?;
        let user: KakaoUserDto = decode_json(response).await?;
        user.into_profile()
    }
}
