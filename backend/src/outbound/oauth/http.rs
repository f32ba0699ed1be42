//! Shared transport plumbing for the provider gateways.
//!
//! Every gateway builds its client here and maps reqwest failures through the
//! same helpers, so transport, timeout, status, and decode errors look alike
//! regardless of provider.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::ports::ProviderError;

/// Request deadline applied to every provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "roomery-backend/0.1";

/// Build the reqwest client shared by a gateway's token and profile calls.
pub(super) fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
}

pub(super) fn map_transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::timeout(error.to_string())
    } else {
        ProviderError::transport(error.to_string())
    }
}

pub(super) fn map_status_error(status: StatusCode, body: &[u8]) -> ProviderError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        String::from("empty body")
    } else {
        preview
    };

    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ProviderError::timeout(message)
        }
        _ => ProviderError::status(status.as_u16(), message),
    }
}

/// Check the status and decode the success body as JSON.
pub(super) async fn decode_json<T: DeserializeOwned>(
    response: Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    serde_json::from_slice(body.as_ref())
        .map_err(|error| ProviderError::decode(format!("invalid JSON payload: {error}")))
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::request_timeout(StatusCode::REQUEST_TIMEOUT)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT)]
    fn timeout_statuses_map_to_timeout(#[case] status: StatusCode) {
        let error = map_status_error(status, b"slow upstream");
        assert!(matches!(error, ProviderError::Timeout { .. }));
    }

    #[rstest]
    #[case::unauthorized(StatusCode::UNAUTHORIZED, 401)]
    #[case::forbidden(StatusCode::FORBIDDEN, 403)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, 500)]
    fn other_statuses_carry_their_code(#[case] status: StatusCode, #[case] expected: u16) {
        let error = map_status_error(status, b"{\"error\":\"bad_verification_code\"}");
        assert_eq!(
            error,
            ProviderError::status(expected, "{\"error\":\"bad_verification_code\"}")
        );
    }

    #[test]
    fn body_preview_compacts_and_truncates() {
        let long = "word ".repeat(100);
        let preview = body_preview(long.as_bytes());
        assert!(preview.ends_with("..."));
        assert!(preview.chars().count() <= 163);

        assert_eq!(body_preview(b"  a \n b  "), "a b");
        assert_eq!(body_preview(b""), "");
    }
}
