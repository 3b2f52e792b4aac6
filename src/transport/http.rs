//! reqwest-backed transport

use super::ratelimit::{FALLBACK_COOLDOWN, RATE_LIMIT_RESET_HEADER, cooldown, reset_time};
use super::{Method, Request, Response, Result, Transport, TransportError};
use crate::observability::RunStats;
use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::LINK;
use reqwest::{Client, StatusCode, Url};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub user_agent: String,
    pub rate_limit_fallback: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            user_agent: default_user_agent(),
            rate_limit_fallback: FALLBACK_COOLDOWN,
        }
    }
}

pub(crate) fn default_user_agent() -> String {
    format!("tootprune/{}", env!("CARGO_PKG_VERSION"))
}

/// Transport talking to a single server with a fixed identity
pub struct HttpTransport {
    client: Client,
    base_url: String,
    access_token: Option<String>,
    config: HttpConfig,
    stats: Arc<RunStats>,
}

impl HttpTransport {
    /// Create a transport for `server` (e.g. `https://mastodon.social`)
    pub fn new(
        server: &str,
        access_token: Option<&str>,
        config: HttpConfig,
        stats: Arc<RunStats>,
    ) -> Result<Self> {
        let parsed = Url::parse(server)
            .map_err(|e| TransportError::InvalidUrl(format!("{}: {}", server, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| TransportError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url: server.trim_end_matches('/').to_string(),
            access_token: access_token
                .filter(|token| !token.is_empty())
                .map(str::to_string),
            config,
            stats,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send once; returns the response and the raw rate-limit reset header
    async fn send_once(&self, url: &str, request: &Request) -> Result<(Response, Option<String>)> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, url);
        if request.method.has_form_body() {
            builder = builder.form(&request.params);
        } else if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        if let Some(token) = &self.access_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let header = |name: &str| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let link = header(LINK.as_str());
        let reset = header(RATE_LIMIT_RESET_HEADER);

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        debug!(method = %request.method, url, status = status.as_u16(), size = body.len(), "Request completed");

        Ok((Response { status, body, link }, reset))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    /// Send a request, waiting out throttling for as long as the server asks
    async fn send(&self, request: &Request) -> Result<Response> {
        let url = self.endpoint(&request.path);

        loop {
            let (response, reset) = self.send_once(&url, request).await?;
            if response.status != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            self.stats.rate_limited();
            let wait = cooldown(reset.as_deref(), Utc::now(), self.config.rate_limit_fallback);
            if reset_time(reset.as_deref()).is_none() {
                warn!(
                    header = reset.as_deref().unwrap_or("<missing>"),
                    fallback_secs = self.config.rate_limit_fallback.as_secs(),
                    "Cool down time was not defined by server, using fallback"
                );
            }
            warn!(
                path = %request.path,
                wait_secs = wait.as_secs(),
                "Server is throttling requests, waiting until it has cooled down"
            );
            tokio::time::sleep(wait).await;
            debug!(path = %request.path, "Retrying throttled request");
        }
    }
}
