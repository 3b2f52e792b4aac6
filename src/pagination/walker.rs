use tracing::debug;

use super::cursor::{Advance, Cursor, CursorStrategy, StopReason};
use crate::api::{MastodonClient, Result, Status};
use crate::transport::{Request, Transport};

/// Largest page Mastodon hands out for status timelines
pub const PAGE_LIMIT: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkState {
    Start,
    HasMore,
    Done(StopReason),
}

/// A non-empty page, in the order the server delivered it
#[derive(Debug, Clone)]
pub struct Page {
    pub number: usize,
    pub cursor: Cursor,
    pub statuses: Vec<Status>,
}

/// Walks a timeline endpoint from newest to oldest, one page at a time.
///
/// The walk is lazy and cannot be restarted. It ends on an empty page, when
/// the cursor stops moving down, or (link-header endpoints) when the server
/// stops advertising a next page.
pub struct PageWalker<'c, T> {
    client: &'c MastodonClient<T>,
    path: String,
    extra_params: Vec<(String, String)>,
    limit: u32,
    strategy: CursorStrategy,
    cursor: Cursor,
    state: WalkState,
    pages: usize,
}

impl<'c, T: Transport> PageWalker<'c, T> {
    pub fn new(client: &'c MastodonClient<T>, path: impl Into<String>, strategy: CursorStrategy) -> Self {
        Self {
            client,
            path: path.into(),
            extra_params: Vec::new(),
            limit: PAGE_LIMIT,
            strategy,
            cursor: Cursor::Newest,
            state: WalkState::Start,
            pages: 0,
        }
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Extra query parameter sent with every page request
    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.extra_params.push((name.to_string(), value.to_string()));
        self
    }

    /// Bound the next request will use
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn state(&self) -> WalkState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, WalkState::Done(_))
    }

    fn request(&self) -> Request {
        let mut request = Request::get(self.path.as_str()).param("limit", self.limit);
        for (name, value) in &self.extra_params {
            request = request.param(name, value);
        }
        if let Some(max_id) = self.cursor.max_id() {
            request = request.param("max_id", max_id);
        }
        request
    }

    fn finish(&mut self, reason: StopReason) {
        debug!(path = %self.path, pages = self.pages, %reason, "Pagination finished");
        self.state = WalkState::Done(reason);
    }

    /// Fetch the next page, or `None` once the walk is over.
    ///
    /// A body that is not a list of statuses is an error carrying that body.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        if self.is_done() {
            return Ok(None);
        }

        let cursor = self.cursor;
        debug!(path = %self.path, %cursor, "Fetching page");
        let listing = self.client.list_statuses(self.request()).await?;
        self.client.stats().page_fetched();

        match self
            .strategy
            .advance(cursor, &listing.statuses, listing.link.as_deref())
        {
            Advance::Continue(next) => {
                self.cursor = next;
                self.state = WalkState::HasMore;
            }
            // the server ignored the bound and sent statuses already seen
            Advance::Stop(StopReason::NoProgress) => {
                self.finish(StopReason::NoProgress);
                return Ok(None);
            }
            Advance::Stop(reason) => self.finish(reason),
        }

        if listing.statuses.is_empty() {
            return Ok(None);
        }

        self.pages += 1;
        Ok(Some(Page {
            number: self.pages,
            cursor,
            statuses: listing.statuses,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, FAVOURITES_PATH, account_statuses_path};
    use crate::observability::RunStats;
    use crate::transport::fake::{FakeServer, status};
    use crate::transport::{Method, Response};
    use reqwest::StatusCode;
    use std::sync::Arc;

    fn client(server: &Arc<FakeServer>) -> MastodonClient<Arc<FakeServer>> {
        MastodonClient::new(server.clone(), Arc::new(RunStats::new()))
    }

    async fn collect_pages<T: Transport>(walker: &mut PageWalker<'_, T>) -> Vec<Page> {
        let mut pages = Vec::new();
        while let Some(page) = walker.next_page().await.unwrap() {
            pages.push(page);
        }
        pages
    }

    #[tokio::test]
    async fn test_first_page_has_no_bound_and_cursor_follows_oldest() {
        let server = Arc::new(FakeServer::new(1).with_statuses([status(100, 5), status(99, 40), status(98, 60)]));
        let client = client(&server);
        let mut walker = PageWalker::new(&client, account_statuses_path(1), CursorStrategy::IdOffset);

        let page = walker.next_page().await.unwrap().unwrap();
        assert_eq!(page.statuses.len(), 3);
        assert_eq!(page.cursor, Cursor::Newest);
        assert_eq!(walker.cursor(), Cursor::Before(97));
        assert_eq!(walker.state(), WalkState::HasMore);

        let first = &server.requests()[0];
        assert_eq!(first.param_value("limit"), Some("40"));
        assert_eq!(first.param_value("max_id"), None);
    }

    #[tokio::test]
    async fn test_walks_all_pages_with_decreasing_cursor() {
        // snowflake-like ids leave gaps, so "oldest minus one" never skips a status
        let statuses: Vec<_> = (1..=95).map(|n| status(n * 10, 1)).collect();
        let server = Arc::new(FakeServer::new(1).with_statuses(statuses));
        let client = client(&server);
        let mut walker = PageWalker::new(&client, account_statuses_path(1), CursorStrategy::IdOffset);

        let pages = collect_pages(&mut walker).await;
        let sizes: Vec<usize> = pages.iter().map(|p| p.statuses.len()).collect();
        assert_eq!(sizes, vec![40, 40, 15]);
        assert_eq!(walker.state(), WalkState::Done(StopReason::EmptyPage));

        let bounds: Vec<u64> = server
            .requests()
            .iter()
            .filter_map(|r| r.param_value("max_id").map(|v| v.parse().unwrap()))
            .collect();
        assert_eq!(bounds, vec![559, 159, 9]);
        assert!(bounds.windows(2).all(|w| w[1] < w[0]));

        // finished walks do not touch the server again
        let before = server.requests().len();
        assert!(walker.next_page().await.unwrap().is_none());
        assert_eq!(server.requests().len(), before);
    }

    #[tokio::test]
    async fn test_stops_when_server_repeats_page() {
        let server = Arc::new(FakeServer::new(1));
        let path = account_statuses_path(1);
        server.override_response(
            Method::Get,
            &path,
            Response::new(
                StatusCode::OK,
                serde_json::to_string(&[status(10, 1), status(9, 1)]).unwrap(),
            ),
        );
        let client = client(&server);
        let mut walker = PageWalker::new(&client, path, CursorStrategy::IdOffset);

        let pages = collect_pages(&mut walker).await;
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].statuses.len(), 2);
        assert_eq!(walker.state(), WalkState::Done(StopReason::NoProgress));
        assert_eq!(server.requests().len(), 2);
        assert_eq!(server.requests()[1].param_value("max_id"), Some("8"));
    }

    #[tokio::test]
    async fn test_link_header_walk() {
        let favourites: Vec<_> = (1..=50).map(|id| status(id * 10, 3)).collect();
        let server = Arc::new(FakeServer::new(1).with_favourites(favourites));
        let client = client(&server);
        let mut walker = PageWalker::new(&client, FAVOURITES_PATH, CursorStrategy::LinkHeader);

        let pages = collect_pages(&mut walker).await;
        let total: usize = pages.iter().map(|p| p.statuses.len()).sum();
        assert_eq!(total, 50);
        assert_eq!(server.requests()[1].param_value("max_id"), Some("110"));
    }

    #[tokio::test]
    async fn test_link_without_max_id_returns_page_then_stops() {
        let favourites: Vec<_> = (1..=60).map(|id| status(id, 3)).collect();
        let server = Arc::new(
            FakeServer::new(1)
                .with_favourites(favourites)
                .with_next_link_without_max_id(),
        );
        let client = client(&server);
        let mut walker = PageWalker::new(&client, FAVOURITES_PATH, CursorStrategy::LinkHeader);

        let page = walker.next_page().await.unwrap().unwrap();
        assert_eq!(page.statuses.len(), 40);
        assert_eq!(walker.state(), WalkState::Done(StopReason::NoNextLink));

        assert!(walker.next_page().await.unwrap().is_none());
        assert_eq!(server.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_error_payload_is_fatal_and_keeps_body() {
        let server = Arc::new(FakeServer::new(1));
        let path = account_statuses_path(1);
        server.override_response(
            Method::Get,
            &path,
            Response::new(StatusCode::OK, r#"{"error":"Too many requests"}"#),
        );
        let client = client(&server);
        let mut walker = PageWalker::new(&client, path, CursorStrategy::IdOffset);

        match walker.next_page().await {
            Err(ApiError::Decode { body, .. }) => assert!(body.contains("Too many requests")),
            other => panic!("expected decode error, got {:?}", other.map(|p| p.map(|p| p.number))),
        }
    }

    #[tokio::test]
    async fn test_extra_params_and_limit() {
        let server = Arc::new(FakeServer::new(1));
        let client = client(&server);
        let mut walker = PageWalker::new(&client, account_statuses_path(1), CursorStrategy::IdOffset)
            .limit(5)
            .param("exclude_reblogs", true);

        assert!(walker.next_page().await.unwrap().is_none());
        let request = &server.requests()[0];
        assert_eq!(request.param_value("limit"), Some("5"));
        assert_eq!(request.param_value("exclude_reblogs"), Some("true"));
    }
}
