//! Outbound adapters: OAuth provider gateways, persistence, and token signing.

pub mod oauth;
pub mod persistence;
pub mod token;
