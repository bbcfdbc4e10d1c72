//! # Reward backend seam.
//!
//! [`RewardBackend`] abstracts the game server's reward endpoints;
//! [`HttpRewardBackend`] is the production implementation over HTTP/JSON.
//! One endpoint exists per non-retry purpose; each accepts an empty body and
//! returns a purpose-specific reward payload.
//!
//! The resolver makes a single attempt per earned reward — no retries at
//! this layer, since a duplicate call would double-grant.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::purpose::AdPurpose;

/// Default timeout for a single reward claim request.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// # Errors produced by reward claims.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BackendError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("reward endpoint responded with status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request never produced a usable response (connect, timeout,
    /// decode).
    #[error("reward request failed")]
    Transport {
        /// The underlying client error.
        #[from]
        source: reqwest::Error,
    },

    /// No endpoint exists for this purpose (retry purposes claim nothing).
    #[error("no reward endpoint for purpose {purpose}")]
    NoEndpoint {
        /// The offending purpose.
        purpose: AdPurpose,
    },

    /// A non-HTTP implementation rejected the claim.
    #[error("reward claim rejected: {reason}")]
    Rejected {
        /// Implementation-provided description.
        reason: String,
    },
}

/// # Reward endpoints of the game server.
///
/// One claim per earned reward; implementations must not retry internally.
#[async_trait]
pub trait RewardBackend: Send + Sync + 'static {
    /// Claims the reward for `purpose` and returns the server's payload.
    async fn claim(&self, purpose: AdPurpose) -> Result<Value, BackendError>;
}

/// HTTP/JSON implementation of [`RewardBackend`].
#[derive(Clone)]
pub struct HttpRewardBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpRewardBackend {
    /// Creates a backend rooted at `base_url` with a default client
    /// (10s request timeout).
    pub fn new(base_url: impl Into<String>) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()?;
        Ok(Self::with_client(base_url, http))
    }

    /// Creates a backend with a caller-provided client (custom TLS, proxy,
    /// timeout).
    pub fn with_client(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }
}

#[async_trait]
impl RewardBackend for HttpRewardBackend {
    async fn claim(&self, purpose: AdPurpose) -> Result<Value, BackendError> {
        let path = purpose
            .endpoint()
            .ok_or(BackendError::NoEndpoint { purpose })?;
        let url = format!("{}{}", self.base_url, path);

        let res = self.http.post(url).send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res
                .text()
                .await
                .unwrap_or_else(|_| "<unavailable body>".to_string());
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(res.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_retry_purposes_have_no_endpoint() {
        let backend = HttpRewardBackend::new("http://localhost:0").expect("client builds");
        for purpose in [AdPurpose::DiceRetry, AdPurpose::FlipRetry] {
            let err = backend.claim(purpose).await.expect_err("must refuse");
            assert!(
                matches!(err, BackendError::NoEndpoint { .. }),
                "expected NoEndpoint for {purpose}, got {err:?}"
            );
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let backend =
            HttpRewardBackend::with_client("http://game.example/", reqwest::Client::new());
        assert_eq!(backend.base_url, "http://game.example");
    }
}
