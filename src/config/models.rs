use crate::humanize::MaxAge;
use crate::transport::HttpConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub purge: PurgeSettings,
}

/// Which server to talk to and as whom
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccountConfig {
    /// Home instance, either a bare domain ("metalhead.club") or a URL
    pub server: Option<String>,
    /// Bearer token; prefer the `TOOTPRUNE_ACCESS_TOKEN` environment variable
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

impl AccountConfig {
    /// Server root with a scheme; bare domains default to https
    pub fn server_url(&self) -> Option<String> {
        let server = self.server.as_deref()?.trim().trim_end_matches('/');
        if server.is_empty() {
            return None;
        }
        if server.contains("://") {
            Some(server.to_string())
        } else {
            Some(format!("https://{}", server))
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Wait after a 429 that carries no usable reset time
    #[serde(default = "default_rate_limit_fallback_secs")]
    pub rate_limit_fallback_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
            rate_limit_fallback_secs: default_rate_limit_fallback_secs(),
        }
    }
}

impl HttpSettings {
    pub fn to_http_config(&self) -> HttpConfig {
        HttpConfig {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            user_agent: self.user_agent.clone(),
            rate_limit_fallback: Duration::from_secs(self.rate_limit_fallback_secs),
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    crate::transport::HttpConfig::default().user_agent
}

fn default_rate_limit_fallback_secs() -> u64 {
    30
}

/// Retention and pacing settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PurgeSettings {
    /// Posts older than this are deleted
    pub max_age: Option<MaxAge>,
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,
    #[serde(default = "default_page_pause_ms")]
    pub page_pause_ms: u64,
    #[serde(default)]
    pub favourites: bool,
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for PurgeSettings {
    fn default() -> Self {
        Self {
            max_age: None,
            page_limit: default_page_limit(),
            page_pause_ms: default_page_pause_ms(),
            favourites: false,
            dry_run: false,
        }
    }
}

fn default_page_limit() -> u32 {
    crate::pagination::PAGE_LIMIT
}

fn default_page_pause_ms() -> u64 {
    1000
}
