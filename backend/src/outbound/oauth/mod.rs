//! Reqwest-backed OAuth provider gateways.
//!
//! One adapter per provider, each owning both legs of the flow: redeem the
//! authorization code for an access token, then fetch and flatten the
//! provider's profile shape into a canonical [`crate::domain::ProviderProfile`].

mod dto;
mod github;
mod google;
mod http;
mod kakao;
mod naver;

pub use github::{GithubGateway, GithubOAuthSettings};
pub use google::{GoogleGateway, GoogleOAuthSettings};
pub use http::DEFAULT_PROVIDER_TIMEOUT;
pub use kakao::{KakaoGateway, KakaoOAuthSettings};
pub use naver::{NaverGateway, NaverOAuthSettings};
