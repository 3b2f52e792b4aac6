//! Rate-limited HTTP transport
//!
//! Every call to the server goes through the [`Transport`] trait. The
//! production implementation, [`HttpTransport`], waits out HTTP 429 responses
//! on its own so callers only ever see a non-throttled response or a hard
//! failure.

mod http;
mod ratelimit;

#[cfg(test)]
pub(crate) mod fake;

pub use http::{HttpConfig, HttpTransport};
pub use ratelimit::{FALLBACK_COOLDOWN, RATE_LIMIT_RESET_HEADER, cooldown, reset_time};

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Connection timeout")]
    Timeout,

    #[error("Failed to read response body: {0}")]
    Body(String),
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    /// Write verbs carry their parameters form-encoded in the body.
    pub fn has_form_body(self) -> bool {
        matches!(self, Method::Post)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request relative to the configured server root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    /// Value of the first parameter called `name`
    pub fn param_value(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Raw server response plus the pagination `Link` header, if any
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub body: Bytes,
    pub link: Option<String>,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            link: None,
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    /// Body as text, for diagnostics
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request at a time to the server.
///
/// Implementations must absorb rate limiting themselves: a returned
/// [`Response`] never carries status 429.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &Request) -> Result<Response>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn send(&self, request: &Request) -> Result<Response> {
        (**self).send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder_params() {
        let request = Request::get("/api/v1/favourites")
            .param("limit", 40)
            .param("max_id", 97u64);

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.param_value("limit"), Some("40"));
        assert_eq!(request.param_value("max_id"), Some("97"));
        assert_eq!(request.param_value("pinned"), None);
    }

    #[test]
    fn test_form_body_verbs() {
        assert!(Method::Post.has_form_body());
        assert!(!Method::Get.has_form_body());
        assert!(!Method::Delete.has_form_body());
    }
}
