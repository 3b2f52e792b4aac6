//! Cooldown computation for throttled responses

use chrono::{DateTime, Utc};
use std::time::Duration;

/// Header carrying the absolute time at which the rate limit resets
pub const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

/// Wait used when the server does not say when the limit resets
pub const FALLBACK_COOLDOWN: Duration = Duration::from_secs(30);

/// Reset instant announced by the server, if the header is present and valid RFC3339
pub fn reset_time(reset: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = reset?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|reset_at| reset_at.with_timezone(&Utc))
}

/// How long to wait before retrying a throttled request.
///
/// `reset` is the raw RFC3339 header value. A reset time already in the past
/// yields a zero wait; a missing or malformed header yields `fallback`.
pub fn cooldown(reset: Option<&str>, now: DateTime<Utc>, fallback: Duration) -> Duration {
    match reset_time(reset) {
        Some(reset_at) => (reset_at - now).to_std().unwrap_or(Duration::ZERO),
        None => fallback,
    }
}
