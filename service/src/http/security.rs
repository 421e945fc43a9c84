//! Security headers added to every response.
//!
//! Responses carry account data behind a session cookie, so they are also
//! marked `Cache-Control: no-store`.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
        HeaderMap, HeaderValue,
    },
    middleware::Next,
    response::Response,
    Extension,
};

use crate::config::SecurityHeadersConfig;

/// Pre-built response headers, shared across requests via `Extension`.
#[derive(Debug, Clone)]
pub struct SecurityHeaders(Arc<HeaderMap>);

impl SecurityHeaders {
    /// Build the header set. Configured values that are not valid header
    /// values are skipped.
    #[must_use]
    pub fn from_config(config: &SecurityHeadersConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let configured = [
            (X_FRAME_OPTIONS, config.frame_options.to_uppercase()),
            (CONTENT_SECURITY_POLICY, config.content_security_policy.clone()),
            (REFERRER_POLICY, config.referrer_policy.clone()),
        ];
        for (name, value) in configured {
            if let Ok(value) = HeaderValue::from_str(&value) {
                headers.insert(name, value);
            }
        }

        if config.hsts_enabled {
            let mut hsts = format!("max-age={}", config.hsts_max_age);
            if config.hsts_include_subdomains {
                hsts.push_str("; includeSubDomains");
            }
            if let Ok(value) = HeaderValue::from_str(&hsts) {
                headers.insert(STRICT_TRANSPORT_SECURITY, value);
            }
        }

        Self(Arc::new(headers))
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.0
    }
}

/// Middleware copying [`SecurityHeaders`] onto every response. Handler-set
/// values for the same names are overwritten.
///
/// ```ignore
/// let app = voter::http::router()
///     .layer(middleware::from_fn(security_headers_middleware))
///     .layer(Extension(SecurityHeaders::from_config(&config.security_headers)));
/// ```
pub async fn security_headers_middleware(
    Extension(headers): Extension<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let response_headers = response.headers_mut();
    for (name, value) in headers.headers() {
        response_headers.insert(name.clone(), value.clone());
    }
    response
}
