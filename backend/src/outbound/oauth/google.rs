//! Google OAuth gateway.
//!
//! The token endpoint takes the standard urlencoded grant form with the
//! registered redirect URI; the userinfo profile is already flat.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use zeroize::Zeroizing;

use super::dto::{GoogleUserDto, TokenResponseDto};
use super::http::{build_client, decode_json, map_transport_error};
use crate::domain::ports::{ProviderError, ProviderGateway};
use crate::domain::{AuthorizationExchange, Provider, ProviderProfile};

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const PROFILE_URL: &str = "https://www.googleapis.com/userinfo/v2/me";

/// Application credentials registered with Google.
#[derive(Clone)]
pub struct GoogleOAuthSettings {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
    pub redirect_uri: String,
}

/// [`ProviderGateway`] speaking Google's OAuth endpoints.
pub struct GoogleGateway {
    client: Client,
    settings: GoogleOAuthSettings,
}

impl GoogleGateway {
    /// Build the gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: GoogleOAuthSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
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
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
                ("redirect_uri", self.settings.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let token: TokenResponseDto = decode_json(response).await?;
        token.into_access_token()
    }
}

#[async_trait]
impl ProviderGateway for GoogleGateway {
    fn provider(&self) -> Provider {
        Provider::Google
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
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let user: GoogleUserDto = decode_json(response).await?;
        user.into_profile()
    }
}
