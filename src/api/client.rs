//! Typed calls for the handful of Mastodon endpoints the purge needs

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::{ApiError, Result};
use super::models::{Account, Confirmation, Status};
use crate::observability::RunStats;
use crate::transport::{Request, Response, Transport};

pub const VERIFY_CREDENTIALS_PATH: &str = "/api/v1/accounts/verify_credentials";
pub const FAVOURITES_PATH: &str = "/api/v1/favourites";

pub fn account_statuses_path(account_id: u64) -> String {
    format!("/api/v1/accounts/{}/statuses", account_id)
}

pub fn status_path(status_id: u64) -> String {
    format!("/api/v1/statuses/{}", status_id)
}

pub fn unfavourite_path(status_id: u64) -> String {
    format!("/api/v1/statuses/{}/unfavourite", status_id)
}

/// One page of statuses plus the server's pagination hint
#[derive(Debug, Clone)]
pub struct Listing {
    pub statuses: Vec<Status>,
    pub link: Option<String>,
}

pub struct MastodonClient<T> {
    transport: T,
    stats: Arc<RunStats>,
}

impl<T: Transport> MastodonClient<T> {
    pub fn new(transport: T, stats: Arc<RunStats>) -> Self {
        Self { transport, stats }
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Send a request and reject non-success statuses
    async fn call(&self, request: Request) -> Result<Response> {
        self.stats.request_issued();
        let response = self.transport.send(&request).await?;

        if response.status.is_success() {
            Ok(response)
        } else {
            debug!(path = %request.path, status = response.status.as_u16(), "Request rejected");
            Err(ApiError::Status {
                status: response.status,
                body: response.text(),
            })
        }
    }

    /// Look up the account the access token belongs to
    pub async fn verify_credentials(&self) -> Result<Account> {
        let response = match self.call(Request::get(VERIFY_CREDENTIALS_PATH)).await {
            Ok(response) => response,
            Err(ApiError::Status { status, body })
                if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) =>
            {
                return Err(ApiError::AccessDenied(body));
            }
            Err(e) => return Err(e),
        };

        let account: Account = decode(&response)?;
        if account.id == 0 {
            return Err(ApiError::AccessDenied(response.text()));
        }
        Ok(account)
    }

    /// Fetch one page of statuses; the body must be a JSON array
    pub async fn list_statuses(&self, request: Request) -> Result<Listing> {
        let response = self.call(request).await?;
        let statuses = decode(&response)?;
        Ok(Listing {
            statuses,
            link: response.link,
        })
    }

    /// Delete a status and check the server acknowledged that exact id
    pub async fn delete_status(&self, status_id: u64) -> Result<Confirmation> {
        let response = self.call(Request::delete(status_path(status_id))).await?;
        Confirmation::from_body(&response.body, status_id).map_err(|source| ApiError::Decode {
            source,
            body: response.text(),
        })
    }

    /// Remove a status from the favourites; any 2xx counts as success
    pub async fn unfavourite(&self, status_id: u64) -> Result<()> {
        self.call(Request::post(unfavourite_path(status_id))).await?;
        Ok(())
    }
}

fn decode<D: DeserializeOwned>(response: &Response) -> Result<D> {
    serde_json::from_slice(&response.body).map_err(|source| ApiError::Decode {
        source,
        body: response.text(),
    })
}
