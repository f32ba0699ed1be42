//! Driven port for OAuth provider adapters.

use async_trait::async_trait;

use crate::domain::{AuthorizationExchange, Provider, ProviderProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised while talking to an OAuth provider.
    pub enum ProviderError {
        /// Network failure before a response arrived.
        Transport { message: String } => "provider request failed: {message}",
        /// The provider did not answer within the deadline.
        Timeout { message: String } => "provider request timed out: {message}",
        /// The provider answered with a non-success status.
        Status { status: u16, message: String } => "provider returned status {status}: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "provider response could not be decoded: {message}",
        /// A field the flow depends on was absent from the response.
        MissingField { field: String } => "provider response is missing {field}",
    }
}

/// Driven port covering one provider's code-to-profile flow.
///
/// An adapter owns both legs: exchanging the authorization code for an access
/// token and fetching the normalised profile with it. Callers never see the
/// access token; it lives and dies inside the adapter.
#[async_trait]
pub trait ProviderGateway: Send + Sync {
    /// The provider this gateway speaks to.
    fn provider(&self) -> Provider;

    /// Run the full exchange: code to access token to normalised profile.
    async fn exchange_and_fetch(
        &self,
        exchange: &AuthorizationExchange,
    ) -> Result<ProviderProfile, ProviderError>;
}
