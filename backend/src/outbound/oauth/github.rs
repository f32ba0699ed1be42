//! GitHub OAuth gateway.
//!
//! Token exchange posts the code to GitHub's access-token endpoint, then the
//! profile and the email listing are fetched concurrently; GitHub keeps login
//! emails on a separate endpoint.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::try_join;
use reqwest::Client;
use zeroize::Zeroizing;

use super::dto::{GithubEmailDto, GithubUserDto, TokenResponseDto};
use super::http::{build_client, decode_json, map_transport_error};
use crate::domain::ports::{ProviderError, ProviderGateway};
use crate::domain::{AuthorizationExchange, Provider, ProviderProfile};

const TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const USER_URL: &str = "https://api.github.com/user";
const EMAILS_URL: &str = "https://api.github.com/user/emails";

/// Application credentials registered with GitHub.
#[derive(Clone)]
pub struct GithubOAuthSettings {
    pub client_id: String,
    pub client_secret: Zeroizing<String>,
}

/// [`ProviderGateway`] speaking GitHub's OAuth endpoints.
pub struct GithubGateway {
    client: Client,
    settings: GithubOAuthSettings,
}

impl GithubGateway {
    /// Build the gateway with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(settings: GithubOAuthSettings, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(timeout)?,
            settings,
        })
    }

    async fn exchange_code(&self, code: &str) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(TOKEN_URL)
            .query(&[
                ("code", code),
                ("client_id", self.settings.client_id.as_str()),
                ("client_secret", self.settings.client_secret.as_str()),
            ])
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        let token: TokenResponseDto = decode_json(response).await?;
        token.into_access_token()
    }

    async fn fetch_authenticated<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        access_token: &str,
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        decode_json(response).await
    }
}

#[async_trait]
impl ProviderGateway for GithubGateway {
    fn provider(&self) -> Provider {
        Provider::GitHub
    }

    async fn exchange_and_fetch(
        &self,
        exchange: &AuthorizationExchange,
    ) -> Result<ProviderProfile, ProviderError> {
        let access_token = self.exchange_code(exchange.code()).await?;
        let (user, emails): (GithubUserDto, Vec<GithubEmailDto>) = try_join!(
            self.fetch_authenticated(USER_URL, &access_token),
            self.fetch_authenticated(EMAILS_URL, &access_token),
        )?;
        user.into_profile(emails)
    }
}
