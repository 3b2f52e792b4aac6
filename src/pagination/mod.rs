//! Cursor-based pagination over Mastodon timelines
//!
//! Two endpoint styles are supported through [`CursorStrategy`]:
//! account statuses page by "oldest id on the page minus one", favourites
//! follow the `max_id` advertised in the `Link` response header.

mod cursor;
mod link;
mod walker;

pub use cursor::{Advance, Cursor, CursorStrategy, StopReason};
pub use link::{LinkEntry, next_max_id, parse_link_header};
pub use walker::{PAGE_LIMIT, Page, PageWalker, WalkState};
