use std::fmt;

use super::link::next_max_id;
use crate::api::Status;

/// Upper bound for the next page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// No bound: the server returns its newest items
    #[default]
    Newest,
    /// Only items with an id below this value
    Before(u64),
}

impl Cursor {
    pub fn max_id(self) -> Option<u64> {
        match self {
            Cursor::Newest => None,
            Cursor::Before(id) => Some(id),
        }
    }

    /// A walk may only continue to a strictly lower bound
    pub fn allows(self, next: u64) -> bool {
        match self {
            Cursor::Newest => true,
            Cursor::Before(current) => next < current,
        }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cursor::Newest => f.write_str("newest"),
            Cursor::Before(id) => write!(f, "{}", id),
        }
    }
}

/// How an endpoint tells us where the next page starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorStrategy {
    /// Next bound is the smallest id on the page minus one
    IdOffset,
    /// Next bound is the `max_id` of the `rel="next"` entry in the `Link` header
    LinkHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    EmptyPage,
    NoProgress,
    NoNextLink,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            StopReason::EmptyPage => "no more items",
            StopReason::NoProgress => "cursor did not move",
            StopReason::NoNextLink => "no next page advertised",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Continue(Cursor),
    Stop(StopReason),
}

impl CursorStrategy {
    /// Decide the cursor after a page fetched with `current`
    pub fn advance(self, current: Cursor, statuses: &[Status], link: Option<&str>) -> Advance {
        if statuses.is_empty() {
            return Advance::Stop(StopReason::EmptyPage);
        }

        let next = match self {
            CursorStrategy::IdOffset => statuses
                .iter()
                .map(|status| status.id)
                .min()
                .map(|oldest| oldest.saturating_sub(1)),
            CursorStrategy::LinkHeader => match link.and_then(next_max_id) {
                Some(id) => Some(id),
                None => return Advance::Stop(StopReason::NoNextLink),
            },
        };

        match next {
            Some(next) if current.allows(next) => Advance::Continue(Cursor::Before(next)),
            _ => Advance::Stop(StopReason::NoProgress),
        }
    }
}
