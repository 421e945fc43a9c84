//! HTTP client for the representatives-by-address endpoint.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::types::{Official, RepresentativesResponse};

/// Errors that can occur when calling the geocoding API.
#[derive(Debug, Error)]
pub enum CivicApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned an error response
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Body was missing an expected field or had the wrong shape
    #[error("unexpected response shape: {0}")]
    Schema(String),
}

/// Trait for geocoding API operations.
#[async_trait]
pub trait CivicApiClient: Send + Sync {
    /// Officials representing an address, in upstream order.
    async fn officials_for_address(&self, address: &str) -> Result<Vec<Official>, CivicApiError>;
}

/// HTTP-based implementation of `CivicApiClient`.
pub struct HttpCivicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpCivicClient {
    /// Create a new client with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client whose requests time out after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_timeout(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CivicApiError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Create a client with a custom `reqwest::Client`.
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl CivicApiClient for HttpCivicClient {
    async fn officials_for_address(&self, address: &str) -> Result<Vec<Official>, CivicApiError> {
        tracing::debug!(base_url = %self.base_url, "geocoding API request");

        let url = format!(
            "{}/representatives?key={}&address={}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(address)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CivicApiError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response.json().await?;
        let parsed: RepresentativesResponse = serde_json::from_value(body)
            .map_err(|e| CivicApiError::Schema(format!("representatives: {e}")))?;
        Ok(parsed.officials)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{async_trait, CivicApiClient, CivicApiError, Official};
    use std::sync::Mutex;

    /// Mock implementation of `CivicApiClient`.
    ///
    /// Returns the configured officials for every address, or a schema
    /// error if none were configured.
    pub struct MockCivicClient {
        officials: Mutex<Option<Vec<Official>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockCivicClient {
        pub fn new() -> Self {
            Self {
                officials: Mutex::new(None),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Build a mock returning officials with the given display names.
        pub fn with_names(names: &[&str]) -> Self {
            let mock = Self::new();
            mock.set_officials(
                names
                    .iter()
                    .map(|name| Official {
                        name: (*name).to_string(),
                        party: None,
                    })
                    .collect(),
            );
            mock
        }

        pub fn set_officials(&self, officials: Vec<Official>) {
            *self.officials.lock().unwrap() = Some(officials);
        }

        /// Get all addresses passed to `officials_for_address`.
        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Default for MockCivicClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl CivicApiClient for MockCivicClient {
        async fn officials_for_address(
            &self,
            address: &str,
        ) -> Result<Vec<Official>, CivicApiError> {
            self.calls.lock().unwrap().push(address.to_string());
            self.officials
                .lock()
                .unwrap()
                .clone()
                .ok_or_else(|| CivicApiError::Schema("missing field `officials`".to_string()))
        }
    }
}
