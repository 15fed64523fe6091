//! Shared HTTP plumbing for the provider adapters

use pagecast_domain::ProviderError;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("pagecast/", env!("CARGO_PKG_VERSION"));

/// Default per-request timeout for content and image providers
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub(crate) fn build_client(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to build HTTP client")
}

/// Transport failure; the URL is dropped since some providers take the key as a query param
pub(crate) fn transport_error(error: reqwest::Error) -> ProviderError {
    ProviderError::Network(error.without_url().to_string())
}

/// Map non-success statuses onto provider errors, passing successful responses through
pub(crate) async fn check_status(
    response: Response,
    provider: &str,
) -> Result<Response, ProviderError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::Auth(format!("{} rejected the API key", provider)));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(ProviderError::RateLimited);
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::Api(format!(
            "{} returned {}: {}",
            provider, status, body
        )));
    }

    Ok(response)
}
