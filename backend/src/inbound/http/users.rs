//! Identity and authentication API handlers.
//!
//! ```text
//! POST /api/v1/users                {"username","email","displayName","password"}
//! POST /api/v1/login                {"username","password"}
//! POST /api/v1/logout
//! POST /api/v1/token                {"username","password"}
//! GET  /api/v1/me
//! PUT  /api/v1/me/password          {"oldPassword","newPassword"}
//! ```

use actix_web::{get, post, put, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Error, Identity, IdentityValidationError, LoginCredentials, LoginValidationError,
    PasswordChange, Registration,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Login request body for `POST /api/v1/login` and `POST /api/v1/token`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Registration request body for `POST /api/v1/users`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub display_name: String,
    pub password: String,
}

/// Password change request body for `PUT /api/v1/me/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Bearer token response for `POST /api/v1/token`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
}

/// Public identity shape returned by profile endpoints.
///
/// Password material never appears here, not even as a usable/unusable flag.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id().to_string(),
            username: identity.username().as_ref().to_owned(),
            email: identity.email().as_ref().to_owned(),
            display_name: identity.display_name().as_ref().to_owned(),
            avatar_url: identity.avatar_url().map(|url| url.as_ref().to_owned()),
        }
    }
}

fn field_for(err: &IdentityValidationError) -> &'static str {
    match err {
        IdentityValidationError::EmptyId | IdentityValidationError::InvalidId => "id",
        IdentityValidationError::EmptyEmail | IdentityValidationError::InvalidEmail => "email",
        IdentityValidationError::EmptyUsername
        | IdentityValidationError::UsernameTooLong { .. } => "username",
        IdentityValidationError::EmptyDisplayName
        | IdentityValidationError::DisplayNameTooLong { .. } => "displayName",
        IdentityValidationError::InvalidAvatarUrl => "avatarUrl",
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        LoginValidationError::PasswordTooShort { min } => {
            Error::invalid_request(format!("password must be at least {min} characters"))
                .with_details(json!({ "field": "password", "code": "password_too_short" }))
        }
        LoginValidationError::InvalidField(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": field_for(&inner), "code": "invalid_field" })),
    }
}

/// Authenticate with username and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let id = state.credentials.authenticate(&credentials).await?;
    session.persist_identity(&id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Drop the current session.
///
/// Idempotent: logging out without a session still returns 200.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 200, description = "Session cleared"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::Ok().finish()
}

/// Authenticate with username and password and mint a bearer token.
///
/// The stateless counterpart to `/login` for non-browser clients; no cookie
/// is set.
#[utoipa::path(
    post,
    path = "/api/v1/token",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed bearer token", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["auth"],
    operation_id = "issueToken",
    security([])
)]
#[post("/token")]
pub async fn token(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let id = state.credentials.authenticate(&credentials).await?;
    let token = state.tokens.issue(&id).map_err(|error| {
        tracing::error!(%error, "token issuance failed");
        Error::internal("token issuance failed")
    })?;
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Register a new identity with a usable password.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created", body = IdentityResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email or username already taken", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/users")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration = Registration::try_from_parts(
        &payload.username,
        &payload.email,
        &payload.display_name,
        &payload.password,
    )
    .map_err(map_login_validation_error)?;
    let identity = state.credentials.register(&registration).await?;
    Ok(HttpResponse::Created().json(IdentityResponse::from(&identity)))
}

/// Fetch the authenticated identity.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Authenticated identity", body = IdentityResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Identity no longer exists", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<IdentityResponse>> {
    let id = session.require_identity_id()?;
    let identity = state.identities.identity(&id).await?;
    Ok(web::Json(IdentityResponse::from(&identity)))
}

/// Change the authenticated identity's password.
#[utoipa::path(
    put,
    path = "/api/v1/me/password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Invalid request or wrong current password", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error")
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[put("/me/password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let id = session.require_identity_id()?;
    let change = PasswordChange::try_from_parts(&payload.old_password, &payload.new_password)
        .map_err(map_login_validation_error)?;
    state.credentials.change_password(&id, &change).await?;
    Ok(HttpResponse::Ok().finish())
}
