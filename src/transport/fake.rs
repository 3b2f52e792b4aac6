//! In-memory Mastodon server for exercising the purge without a network

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::StatusCode;
use serde_json::json;

use super::{Method, Request, Response, Result, Transport, TransportError};
use crate::api::{Account, Status};

/// How the fake answers a DELETE for a particular status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReply {
    /// Echo the deleted status back (Mastodon's usual answer)
    Echo,
    /// Answer `{}`
    Empty,
    /// Answer with a different id and keep the status
    Mismatch,
    /// Fail at the transport level and keep the status
    Unreachable,
}

#[derive(Debug, Default)]
struct State {
    statuses: Vec<Status>,
    pinned: HashSet<u64>,
    favourites: Vec<Status>,
    delete_replies: HashMap<u64, DeleteReply>,
    overrides: HashMap<(Method, String), Response>,
    requests: Vec<Request>,
    next_link_without_max_id: bool,
    ignore_max_id: bool,
}

pub struct FakeServer {
    account_id: u64,
    state: Mutex<State>,
}

pub fn status(id: u64, age_days: i64) -> Status {
    status_at(id, Utc::now() - Duration::days(age_days))
}

pub fn status_at(id: u64, created_at: DateTime<Utc>) -> Status {
    Status {
        id,
        created_at,
        account: Account {
            id: 42,
            username: "tester".to_string(),
            acct: "tester".to_string(),
        },
    }
}

impl FakeServer {
    pub fn new(account_id: u64) -> Self {
        Self {
            account_id,
            state: Mutex::new(State::default()),
        }
    }

    pub fn with_statuses(self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.state.lock().unwrap().statuses.extend(statuses);
        self
    }

    pub fn with_pinned(self, ids: impl IntoIterator<Item = u64>) -> Self {
        self.state.lock().unwrap().pinned.extend(ids);
        self
    }

    pub fn with_favourites(self, statuses: impl IntoIterator<Item = Status>) -> Self {
        self.state.lock().unwrap().favourites.extend(statuses);
        self
    }

    pub fn with_delete_reply(self, id: u64, reply: DeleteReply) -> Self {
        self.state.lock().unwrap().delete_replies.insert(id, reply);
        self
    }

    /// Emit `rel="next"` links whose URL has no `max_id`
    pub fn with_next_link_without_max_id(self) -> Self {
        self.state.lock().unwrap().next_link_without_max_id = true;
        self
    }

    /// Answer account timeline requests as if `max_id` had not been sent
    pub fn ignoring_max_id(self) -> Self {
        self.state.lock().unwrap().ignore_max_id = true;
        self
    }

    pub fn override_response(&self, method: Method, path: &str, response: Response) {
        self.state
            .lock()
            .unwrap()
            .overrides
            .insert((method, path.to_string()), response);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn requests_with(&self, method: Method) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|request| request.method == method)
            .collect()
    }

    pub fn status_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.state.lock().unwrap().statuses.iter().map(|s| s.id).collect();
        ids.sort_unstable_by(|a, b| b.cmp(a));
        ids
    }

    pub fn favourite_ids(&self) -> Vec<u64> {
        self.state.lock().unwrap().favourites.iter().map(|s| s.id).collect()
    }

    fn statuses_path(&self) -> String {
        format!("/api/v1/accounts/{}/statuses", self.account_id)
    }

    fn respond(&self, request: &Request) -> Result<Response> {
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if let Some(response) = state.overrides.get(&(request.method, request.path.clone())) {
            return Ok(response.clone());
        }

        let limit = request
            .param_value("limit")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(20);
        let max_id = request.param_value("max_id").and_then(|v| v.parse::<u64>().ok());

        match (request.method, request.path.as_str()) {
            (Method::Get, "/api/v1/accounts/verify_credentials") => Ok(json_response(json!({
                "id": self.account_id.to_string(),
                "username": "tester",
                "acct": "tester",
            }))),
            (Method::Get, path) if path == self.statuses_path() => {
                let pinned_only = request.param_value("pinned") == Some("true");
                let max_id = max_id.filter(|_| !state.ignore_max_id);
                let page: Vec<&Status> = newest_first(&state.statuses)
                    .into_iter()
                    .filter(|s| !pinned_only || state.pinned.contains(&s.id))
                    .filter(|s| max_id.is_none_or(|max| s.id < max))
                    .take(limit)
                    .collect();
                Ok(json_response(json!(page)))
            }
            (Method::Get, "/api/v1/favourites") => {
                let candidates: Vec<&Status> = newest_first(&state.favourites)
                    .into_iter()
                    .filter(|s| max_id.is_none_or(|max| s.id < max))
                    .collect();
                let page: Vec<&Status> = candidates.iter().take(limit).copied().collect();
                let mut response = json_response(json!(page));
                if let Some(last) = page.last() {
                    let next = if state.next_link_without_max_id {
                        format!("<https://fake.test/api/v1/favourites?limit={}>", limit)
                    } else {
                        format!(
                            "<https://fake.test/api/v1/favourites?limit={}&max_id={}>",
                            limit, last.id
                        )
                    };
                    let prev = format!(
                        "<https://fake.test/api/v1/favourites?limit={}&min_id={}>",
                        limit, page[0].id
                    );
                    response = response.with_link(format!("{}; rel=\"next\", {}; rel=\"prev\"", next, prev));
                }
                Ok(response)
            }
            (Method::Delete, path) => {
                let id = trailing_id(path)?;
                let reply = state.delete_replies.get(&id).copied().unwrap_or(DeleteReply::Echo);
                let position = state.statuses.iter().position(|s| s.id == id);
                match (reply, position) {
                    (DeleteReply::Unreachable, _) => {
                        Err(TransportError::RequestFailed("connection reset by peer".to_string()))
                    }
                    (DeleteReply::Mismatch, Some(_)) => Ok(json_response(json!({"id": (id + 1000).to_string()}))),
                    (_, None) => Ok(Response::new(
                        StatusCode::NOT_FOUND,
                        r#"{"error":"Record not found"}"#,
                    )),
                    (DeleteReply::Empty, Some(index)) => {
                        state.statuses.remove(index);
                        Ok(json_response(json!({})))
                    }
                    (DeleteReply::Echo, Some(index)) => {
                        let removed = state.statuses.remove(index);
                        Ok(json_response(json!(removed)))
                    }
                }
            }
            (Method::Post, path) if path.ends_with("/unfavourite") => {
                let id = trailing_id(path.trim_end_matches("/unfavourite"))?;
                state.favourites.retain(|s| s.id != id);
                Ok(json_response(json!({"id": id.to_string(), "favourited": false})))
            }
            _ => Ok(Response::new(StatusCode::NOT_FOUND, r#"{"error":"Not found"}"#)),
        }
    }
}

fn newest_first(statuses: &[Status]) -> Vec<&Status> {
    let mut sorted: Vec<&Status> = statuses.iter().collect();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted
}

fn trailing_id(path: &str) -> Result<u64> {
    path.rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| TransportError::InvalidUrl(path.to_string()))
}

fn json_response(value: serde_json::Value) -> Response {
    Response::new(StatusCode::OK, value.to_string())
}

#[async_trait]
impl Transport for FakeServer {
    async fn send(&self, request: &Request) -> Result<Response> {
        self.respond(request)
    }
}
