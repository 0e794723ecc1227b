//! Custom Axum extractors

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;

/// Absolute URL prefix of the inbound request, e.g. `http://localhost:3000`.
///
/// The scheme honors `X-Forwarded-Proto` when a proxy sets it; the host
/// comes from the `Host` header. Every hyperlink in a response is built
/// from this value.
#[derive(Debug, Clone)]
pub struct BaseUrl(String);

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn from_headers(scheme: Option<&str>, host: Option<&str>) -> Self {
        let scheme = scheme.unwrap_or("http");
        let host = host.unwrap_or("localhost");
        Self(format!("{scheme}://{host}"))
    }
}

impl<S> FromRequestParts<S> for BaseUrl
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok());
        let host = parts.headers.get(HOST).and_then(|v| v.to_str().ok());

        Ok(Self::from_headers(scheme, host))
    }
}
