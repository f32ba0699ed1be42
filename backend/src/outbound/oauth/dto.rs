//! Wire DTOs for the provider token and profile endpoints.
//!
//! Each profile DTO owns the flattening of its provider's response shape into
//! a canonical [`ProviderProfile`]. Absent required fields surface as
//! [`ProviderError::MissingField`] naming the dotted path that was expected.

use serde::Deserialize;

use crate::domain::ports::ProviderError;
use crate::domain::{
    AvatarUrl, DisplayName, EmailAddress, Provider, ProviderProfile, Username,
};

/// Token endpoint response shared by all four providers.
#[derive(Debug, Deserialize)]
pub(super) struct TokenResponseDto {
    access_token: Option<String>,
}

impl TokenResponseDto {
    /// The bearer token, or a `MissingField` when the provider returned a
    /// 200 without one (GitHub reports bad codes this way).
    pub(super) fn into_access_token(self) -> Result<String, ProviderError> {
        self.access_token
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ProviderError::missing_field("access_token"))
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ProviderError> {
    value.ok_or_else(|| ProviderError::missing_field(field))
}

fn parse_email(raw: String) -> Result<EmailAddress, ProviderError> {
    EmailAddress::new(raw).map_err(|error| ProviderError::decode(error.to_string()))
}

fn parse_username(raw: String) -> Result<Username, ProviderError> {
    Username::new(raw).map_err(|error| ProviderError::decode(error.to_string()))
}

fn parse_display_name(raw: String) -> Result<DisplayName, ProviderError> {
    DisplayName::new(raw).map_err(|error| ProviderError::decode(error.to_string()))
}

/// Avatar URLs are cosmetic, so unparseable ones are dropped rather than
/// failing the login.
fn parse_avatar(raw: Option<String>) -> Option<AvatarUrl> {
    raw.and_then(|url| AvatarUrl::new(url).ok())
}

/// GitHub `GET /user` response.
#[derive(Debug, Deserialize)]
pub(super) struct GithubUserDto {
    id: Option<u64>,
    login: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
}

/// One entry from GitHub `GET /user/emails`.
#[derive(Debug, Deserialize)]
pub(super) struct GithubEmailDto {
    email: String,
    #[serde(default)]
    primary: bool,
    #[serde(default)]
    verified: bool,
}

/// Pick the login email from the `/user/emails` listing.
///
/// GitHub marks exactly one address primary; prefer it when verified, and
/// fall back to the first entry for accounts without one.
pub(super) fn select_github_email(emails: &[GithubEmailDto]) -> Result<&str, ProviderError> {
    emails
        .iter()
        .find(|entry| entry.primary && entry.verified)
        .or_else(|| emails.first())
        .map(|entry| entry.email.as_str())
        .ok_or_else(|| ProviderError::missing_field("emails[0].email"))
}

impl GithubUserDto {
    pub(super) fn into_profile(
        self,
        emails: Vec<GithubEmailDto>,
    ) -> Result<ProviderProfile, ProviderError> {
        let email = select_github_email(&emails)?.to_owned();
        let id = required(self.id, "id")?;
        let login = required(self.login, "login")?;
        // GitHub's display name is optional; fall back to the login handle.
        let name = self.name.unwrap_or_else(|| login.clone());
        Ok(ProviderProfile::new(
            Provider::GitHub,
            Some(id.to_string()),
            parse_email(email)?,
            parse_username(login)?,
            parse_display_name(name)?,
            parse_avatar(self.avatar_url),
        ))
    }
}

/// Kakao `GET /v2/user/me` response.
#[derive(Debug, Deserialize)]
pub(super) struct KakaoUserDto {
    id: Option<u64>,
    kakao_account: Option<KakaoAccountDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct KakaoAccountDto {
    email: Option<String>,
    profile: Option<KakaoProfileDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct KakaoProfileDto {
    nickname: Option<String>,
    profile_image_url: Option<String>,
}

impl KakaoUserDto {
    pub(super) fn into_profile(self) -> Result<ProviderProfile, ProviderError> {
        let account = required(self.kakao_account, "kakao_account")?;
        let email = required(account.email, "kakao_account.email")?;
        let profile = required(account.profile, "kakao_account.profile")?;
        let nickname = required(profile.nickname, "kakao_account.profile.nickname")?;
        Ok(ProviderProfile::new(
            Provider::Kakao,
            // Kakao omits the numeric id from scoped profile responses.
            self.id.map(|id| id.to_string()),
            parse_email(email)?,
            parse_username(nickname.clone())?,
            parse_display_name(nickname)?,
            parse_avatar(profile.profile_image_url),
        ))
    }
}

/// Naver `GET /v1/nid/me` envelope.
#[derive(Debug, Deserialize)]
pub(super) struct NaverUserDto {
    response: Option<NaverAccountDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct NaverAccountDto {
    id: Option<String>,
    email: Option<String>,
    name: Option<String>,
    profile_image: Option<String>,
}

impl NaverUserDto {
    pub(super) fn into_profile(self) -> Result<ProviderProfile, ProviderError> {
        let account = required(self.response, "response")?;
        let email = required(account.email, "response.email")?;
        let name = required(account.name, "response.name")?;
        Ok(ProviderProfile::new(
            Provider::Naver,
            account.id,
            parse_email(email)?,
            parse_username(name.clone())?,
            parse_display_name(name)?,
            parse_avatar(account.profile_image),
        ))
    }
}

/// Google `GET /userinfo/v2/me` response.
#[derive(Debug, Deserialize)]
pub(super) struct GoogleUserDto {
    id: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleUserDto {
    pub(super) fn into_profile(self) -> Result<ProviderProfile, ProviderError> {
        let id = required(self.id, "id")?;
        let email = required(self.email, "email")?;
        let name = required(self.name, "name")?;
        Ok(ProviderProfile::new(
            Provider::Google,
            Some(id),
            parse_email(email)?,
            parse_username(name.clone())?,
            parse_display_name(name)?,
            parse_avatar(self.picture),
        ))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for provider response flattening.
    use super::*;

    fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> T {
        serde_json::from_str(raw).expect("payload decodes")
    }

    #[test]
    fn token_response_requires_a_non_empty_token() {
        let ok: TokenResponseDto = decode(r#"{"access_token":"gho_abc","scope":"user"}"#);
        assert_eq!(ok.into_access_token().expect("token present"), "gho_abc");

        let missing: TokenResponseDto = decode(r#"{"error":"bad_verification_code"}"#);
        assert_eq!(
            missing.into_access_token().expect_err("token absent"),
            ProviderError::missing_field("access_token")
        );

        let empty: TokenResponseDto = decode(r#"{"access_token":""}"#);
        assert!(empty.into_access_token().is_err());
    }

    #[test]
    fn github_prefers_the_verified_primary_email() {
        let user: GithubUserDto = decode(
            r#"{"id":583231,"login":"octocat","name":"The Octocat","avatar_url":"https://avatars.githubusercontent.com/u/583231"}"#,
        );
        let emails: Vec<GithubEmailDto> = decode(
            r#"[
                {"email":"spare@example.com","primary":false,"verified":true},
                {"email":"main@example.com","primary":true,"verified":true}
            ]"#,
        );

        let profile = user.into_profile(emails).expect("profile builds");
        assert_eq!(profile.provider(), Provider::GitHub);
        assert_eq!(profile.native_id(), Some("583231"));
        assert_eq!(profile.email().as_ref(), "main@example.com");
        assert_eq!(profile.username().as_ref(), "octocat");
        assert_eq!(profile.display_name().as_ref(), "The Octocat");
        assert!(profile.avatar_url().is_some());
    }

    #[test]
    fn github_falls_back_to_the_first_email_and_the_login_handle() {
        let user: GithubUserDto =
            decode(r#"{"id":1,"login":"ghost","name":null,"avatar_url":null}"#);
        let emails: Vec<GithubEmailDto> =
            decode(r#"[{"email":"first@example.com","primary":false,"verified":false}]"#);

        let profile = user.into_profile(emails).expect("profile builds");
        assert_eq!(profile.email().as_ref(), "first@example.com");
        assert_eq!(profile.display_name().as_ref(), "ghost");
        assert!(profile.avatar_url().is_none());
    }

    #[test]
    fn github_without_any_email_is_a_missing_field() {
        let user: GithubUserDto = decode(r#"{"id":1,"login":"ghost"}"#);
        let err = user.into_profile(Vec::new()).expect_err("must fail");
        assert_eq!(err, ProviderError::missing_field("emails[0].email"));
    }

    #[test]
    fn kakao_profile_is_flattened_from_the_nested_account() {
        let user: KakaoUserDto = decode(
            r#"{
                "id": 4242,
                "connected_at": "2023-01-01T00:00:00Z",
                "kakao_account": {
                    "email": "kim@example.com",
                    "profile": {
                        "nickname": "김세헌",
                        "profile_image_url": "https://k.kakaocdn.net/img.png"
                    }
                }
            }"#,
        );

        let profile = user.into_profile().expect("profile builds");
        assert_eq!(profile.provider(), Provider::Kakao);
        assert_eq!(profile.native_id(), Some("4242"));
        assert_eq!(profile.email().as_ref(), "kim@example.com");
        assert_eq!(profile.username().as_ref(), "김세헌");
        assert_eq!(profile.display_name().as_ref(), "김세헌");
    }

    #[test]
    fn kakao_profile_without_a_native_id_still_builds() {
        let user: KakaoUserDto = decode(
            r#"{"kakao_account":{"email":"u@k.com","profile":{"nickname":"U"}}}"#,
        );

        let profile = user.into_profile().expect("profile builds");
        assert_eq!(profile.native_id(), None);
        assert_eq!(profile.email().as_ref(), "u@k.com");
        assert_eq!(profile.username().as_ref(), "U");
    }

    #[test]
    fn kakao_without_consented_email_names_the_missing_path() {
        let user: KakaoUserDto = decode(
            r#"{"id":4242,"kakao_account":{"profile":{"nickname":"kim"}}}"#,
        );
        let err = user.into_profile().expect_err("must fail");
        assert_eq!(err, ProviderError::missing_field("kakao_account.email"));
    }

    #[test]
    fn naver_profile_is_unwrapped_from_the_response_envelope() {
        let user: NaverUserDto = decode(
            r#"{
                "resultcode": "00",
                "message": "success",
                "response": {
                    "id": "naver-123",
                    "email": "lee@example.com",
                    "name": "이순신",
                    "profile_image": "https://phinf.net/img.png"
                }
            }"#,
        );

        let profile = user.into_profile().expect("profile builds");
        assert_eq!(profile.provider(), Provider::Naver);
        assert_eq!(profile.native_id(), Some("naver-123"));
        assert_eq!(profile.email().as_ref(), "lee@example.com");
        assert_eq!(profile.username().as_ref(), "이순신");
    }

    #[test]
    fn naver_profile_without_a_native_id_still_builds() {
        let user: NaverUserDto =
            decode(r#"{"response":{"email":"u@n.com","name":"U"}}"#);

        let profile = user.into_profile().expect("profile builds");
        assert_eq!(profile.native_id(), None);
        assert_eq!(profile.email().as_ref(), "u@n.com");
        assert_eq!(profile.display_name().as_ref(), "U");
    }

    #[test]
    fn naver_without_the_envelope_is_a_missing_field() {
        let user: NaverUserDto = decode(r#"{"resultcode":"024","message":"auth failed"}"#);
        let err = user.into_profile().expect_err("must fail");
        assert_eq!(err, ProviderError::missing_field("response"));
    }

    #[test]
    fn google_profile_maps_picture_to_the_avatar() {
        let user: GoogleUserDto = decode(
            r#"{
                "id": "1093021",
                "email": "g@example.com",
                "verified_email": true,
                "name": "Grace Hopper",
                "picture": "https://lh3.googleusercontent.com/img.jpg"
            }"#,
        );

        let profile = user.into_profile().expect("profile builds");
        assert_eq!(profile.provider(), Provider::Google);
        assert_eq!(profile.native_id(), Some("1093021"));
        assert_eq!(profile.display_name().as_ref(), "Grace Hopper");
        assert!(profile.avatar_url().is_some());
    }

    #[test]
    fn malformed_provider_email_is_a_decode_error() {
        let user: GoogleUserDto =
            decode(r#"{"id":"1","email":"not-an-email","name":"G"}"#);
        let err = user.into_profile().expect_err("must fail");
        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[test]
    fn unparseable_avatar_urls_are_dropped_not_fatal() {
        let user: GoogleUserDto = decode(
            r#"{"id":"1","email":"g@example.com","name":"G","picture":"not a url"}"#,
        );
        let profile = user.into_profile().expect("profile builds");
        assert!(profile.avatar_url().is_none());
    }
}
