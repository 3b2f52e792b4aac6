use super::models::Config;
use crate::pagination::PAGE_LIMIT;
use reqwest::Url;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("No server configured (set account.server or TOOTPRUNE__ACCOUNT__SERVER)")]
    MissingServer,

    #[error("Invalid server URL '{server}': {reason}")]
    InvalidServer { server: String, reason: String },

    #[error("No access token configured (set TOOTPRUNE_ACCESS_TOKEN)")]
    MissingAccessToken,

    #[error("page_limit must be between 1 and {max}, got {value}")]
    InvalidPageLimit { value: u32, max: u32 },

    #[error("Timeouts must be positive: {field} = 0")]
    InvalidTimeout { field: String },

    #[error("Missing maximum post age (pass --max-age or set purge.max_age)")]
    MissingMaxAge,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_account(config)?;
    validate_http(config)?;
    validate_purge(config)?;
    Ok(())
}

fn validate_account(config: &Config) -> Result<(), ValidationError> {
    let server = config
        .account
        .server_url()
        .ok_or(ValidationError::MissingServer)?;

    let url = Url::parse(&server).map_err(|e| ValidationError::InvalidServer {
        server: server.clone(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ValidationError::InvalidServer {
            server,
            reason: "expected an http(s) URL with a host".to_string(),
        });
    }

    let has_token = config
        .account
        .access_token
        .as_deref()
        .is_some_and(|token| !token.trim().is_empty());
    if !has_token {
        return Err(ValidationError::MissingAccessToken);
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ValidationError> {
    if config.http.connect_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "http.connect_timeout_secs".to_string(),
        });
    }
    if config.http.request_timeout_secs == 0 {
        return Err(ValidationError::InvalidTimeout {
            field: "http.request_timeout_secs".to_string(),
        });
    }
    Ok(())
}

fn validate_purge(config: &Config) -> Result<(), ValidationError> {
    let value = config.purge.page_limit;
    if value == 0 || value > PAGE_LIMIT {
        return Err(ValidationError::InvalidPageLimit {
            value,
            max: PAGE_LIMIT,
        });
    }
    Ok(())
}
