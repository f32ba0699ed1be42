//! Social login callback handler.
//!
//! The frontend completes the provider's authorization redirect and posts the
//! resulting code (and state, where the provider issues one) here. The handler
//! validates the request shape before any provider traffic, delegates the
//! exchange and reconciliation to the [`SocialLogin`] port, and establishes a
//! session on success.
//!
//! [`SocialLogin`]: crate::domain::ports::SocialLogin

use std::str::FromStr;

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{AuthorizationExchange, Error, ExchangeValidationError, Provider};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Callback payload for `POST /api/v1/social/{provider}/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SocialLoginRequest {
    /// Single-use authorization code from the provider redirect.
    pub code: String,
    /// CSRF state echoed by the provider; required by Naver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

fn map_exchange_validation_error(err: ExchangeValidationError) -> Error {
    match err {
        ExchangeValidationError::EmptyCode => {
            Error::invalid_request("authorization code must not be empty")
                .with_details(json!({ "field": "code", "code": "empty_code" }))
        }
    }
}

/// Complete a provider login and establish a session.
///
/// Reconciliation failures are reported as a uniform 401 so callers cannot
/// probe which stage rejected them.
#[utoipa::path(
    post,
    path = "/api/v1/social/{provider}/login",
    params(
        ("provider" = String, Path, description = "Provider slug: github, kakao, naver, or google")
    ),
    request_body = SocialLoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Unknown provider or invalid request", body = Error),
        (status = 401, description = "Social login failed", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "socialLogin",
    security([])
)]
#[post("/social/{provider}/login")]
pub async fn social_login(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SocialLoginRequest>,
) -> ApiResult<HttpResponse> {
    let provider = Provider::from_str(&path).map_err(|error| {
        Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "provider", "code": "unknown_provider" }))
    })?;
    let exchange = AuthorizationExchange::try_from_parts(&payload.code, payload.state.as_deref())
        .map_err(map_exchange_validation_error)?;
    let identity = state.social.login_via_provider(provider, &exchange).await?;
    session.persist_identity(identity.id())?;
    Ok(HttpResponse::Ok().finish())
}
