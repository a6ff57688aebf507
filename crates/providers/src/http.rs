//! Shared HTTP status handling for provider calls.

use jarvis_core::error::ProviderError;
use tracing::warn;

/// Seconds allowed to establish a connection. Replies themselves are not
/// time-limited, so long streams run to completion.
pub(crate) const CONNECT_TIMEOUT_SECS: u64 = 30;

pub(crate) fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Map non-success statuses to `ProviderError`, passing 2xx through.
pub(crate) async fn ensure_success(
    provider: &str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();

    if status == 429 {
        return Err(ProviderError::RateLimited {
            retry_after_secs: 5,
        });
    }

    if status == 401 || status == 403 {
        return Err(ProviderError::AuthenticationFailed(
            "Invalid API key or insufficient permissions".into(),
        ));
    }

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        warn!(provider, status, body = %error_body, "Provider returned error");
        return Err(ProviderError::ApiError {
            status_code: status,
            message: error_body,
        });
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_has_no_whole_request_deadline() {
        // The client's Debug output lists request and read timeouts when set
        let shown = format!("{:?}", client()).to_lowercase();
        assert!(!shown.contains("timeout"), "unexpected deadline in {shown}");
    }
}
