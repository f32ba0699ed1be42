//! Builders wiring ports to their adapters for the HTTP server.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::IdentityRepository;
use crate::domain::ports::InMemoryIdentityRepository;
use crate::domain::{
    IdentityLookupService, LocalCredentialsService, ProviderRegistry, SocialLoginService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::oauth::{
    GithubGateway, GoogleGateway, KakaoGateway, NaverGateway, DEFAULT_PROVIDER_TIMEOUT,
};
use crate::outbound::persistence::DieselIdentityRepository;
use crate::outbound::token::JwtTokenIssuer;

use super::ServerConfig;

/// Construct the four provider gateways from configured credentials.
///
/// Fails only when reqwest cannot build a client, which indicates a broken
/// TLS backend rather than bad configuration.
fn build_provider_registry(config: &ServerConfig) -> std::io::Result<ProviderRegistry> {
    let build_error =
        |err: reqwest::Error| std::io::Error::other(format!("provider client setup failed: {err}"));
    Ok(ProviderRegistry::new(
        Arc::new(
            GithubGateway::new(config.oauth.github.clone(), DEFAULT_PROVIDER_TIMEOUT)
                .map_err(build_error)?,
        ),
        Arc::new(
            KakaoGateway::new(config.oauth.kakao.clone(), DEFAULT_PROVIDER_TIMEOUT)
                .map_err(build_error)?,
        ),
        Arc::new(
            NaverGateway::new(config.oauth.naver.clone(), DEFAULT_PROVIDER_TIMEOUT)
                .map_err(build_error)?,
        ),
        Arc::new(
            GoogleGateway::new(config.oauth.google.clone(), DEFAULT_PROVIDER_TIMEOUT)
                .map_err(build_error)?,
        ),
    ))
}

/// Build the HTTP state from configuration.
///
/// Uses the SQL-backed identity repository when a pool is configured and an
/// in-process store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let repository: Arc<dyn IdentityRepository> = match &config.db_pool {
        Some(pool) => Arc::new(DieselIdentityRepository::new(pool.clone())),
        None => Arc::new(InMemoryIdentityRepository::new()),
    };

    let registry = build_provider_registry(config)?;
    let credentials = Arc::new(LocalCredentialsService::new(repository.clone()));
    let social = Arc::new(SocialLoginService::new(registry, repository.clone()));
    let identities = Arc::new(IdentityLookupService::new(repository));
    let tokens = Arc::new(JwtTokenIssuer::new(&config.token.secret, config.token.ttl));

    Ok(web::Data::new(HttpState::new(
        credentials,
        social,
        identities,
        tokens,
    )))
}
