//! JWT bearer token adapter.

mod jwt_issuer;

pub use jwt_issuer::{JwtTokenIssuer, DEFAULT_TOKEN_TTL};
