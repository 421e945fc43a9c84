//! HTTP mock server helpers for testing outbound HTTP calls.
//!
//! A thin wrapper around `wiremock` for declarative stubbing of the
//! legislative and geocoding APIs.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn roster_lookup() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/115/senate/members.json")
//!         .with_header("X-API-Key", "test-key")
//!         .respond_with_json(json!({ "results": [{ "members": [] }] }))
//!         .expect_times(1)
//!         .mount()
//!         .await;
//!
//!     // Point the client at server.url()
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)` or `.respond_with_body(string)`
//! - **Error response**: `.respond_with_status(500)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` to assert call count

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

/// A running stub server. Expectations are verified when it is dropped.
pub struct MockHttpServer {
    inner: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            inner: MockServer::start().await,
        }
    }

    /// Base URL of the server, without a trailing slash.
    pub fn url(&self) -> String {
        self.inner.uri()
    }

    /// Absolute URL for a path on this server.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.inner.uri())
    }

    pub fn inner(&self) -> &MockServer {
        &self.inner
    }

    /// Assert all `expect_times` expectations now rather than on drop.
    pub async fn verify(&self) {
        self.inner.verify().await;
    }

    /// Number of requests received so far.
    pub async fn request_count(&self) -> usize {
        self.inner
            .received_requests()
            .await
            .map_or(0, |requests| requests.len())
    }

    /// Start stubbing a GET on `request_path`.
    pub fn expect_get(&self, request_path: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: self,
            builder: Mock::given(method("GET")).and(path(request_path)),
            response: ResponseTemplate::new(200),
            times: None,
        }
    }
}

/// Builder for a single stubbed route.
pub struct StubBuilder<'a> {
    server: &'a MockHttpServer,
    builder: MockBuilder,
    response: ResponseTemplate,
    times: Option<u64>,
}

impl StubBuilder<'_> {
    #[must_use]
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.builder = self.builder.and(header(name, value));
        self
    }

    #[must_use]
    pub fn with_query_param(mut self, name: &'static str, value: &'static str) -> Self {
        self.builder = self.builder.and(query_param(name, value));
        self
    }

    #[must_use]
    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.response = ResponseTemplate::new(200).set_body_json(body);
        self
    }

    #[must_use]
    pub fn respond_with_status_json(mut self, status: u16, body: Value) -> Self {
        self.response = ResponseTemplate::new(status).set_body_json(body);
        self
    }

    #[must_use]
    pub fn respond_with_body(mut self, body: &str) -> Self {
        self.response = ResponseTemplate::new(200).set_body_string(body);
        self
    }

    #[must_use]
    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.response = ResponseTemplate::new(status);
        self
    }

    #[must_use]
    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.response = self.response.set_delay(delay);
        self
    }

    #[must_use]
    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut mock = self.builder.respond_with(self.response);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(&self.server.inner).await;
    }
}
