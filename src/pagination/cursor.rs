//! Cursor walk
//!
//! Repeats one request, substituting the cursor each time, until a stop
//! condition holds. The page that crosses the cap is kept.

use super::types::{Page, PageSequence, PagerState, StopReason};
use crate::error::{Error, Result};
use crate::http::Dispatcher;
use crate::request::{QueryString, TransportOptions};
use crate::types::CURSOR_START;
use tracing::{debug, info, warn};

/// Deep-paging walker over a dispatcher
pub struct CursorPager<'a> {
    dispatcher: &'a dyn Dispatcher,
    cursor_max: u64,
}

impl<'a> CursorPager<'a> {
    /// Create a pager that stops once `cursor_max` items were fetched
    pub fn new(dispatcher: &'a dyn Dispatcher, cursor_max: u64) -> Self {
        Self {
            dispatcher,
            cursor_max,
        }
    }

    /// Cap on items fetched
    pub fn cursor_max(&self) -> u64 {
        self.cursor_max
    }

    /// Walk from the cursor already in `query` (or `*` if none)
    ///
    /// Any failure discards the pages fetched so far and is returned
    /// wrapped with the cursor and page index it happened at.
    pub async fn run(
        &self,
        path: &str,
        query: &QueryString,
        options: &TransportOptions,
    ) -> Result<PageSequence> {
        if self.cursor_max == 0 {
            debug!("cursor_max is 0, skipping {}", path);
            return Ok(PageSequence::new(Vec::new(), StopReason::ZeroCap, None));
        }

        let start = query.get("cursor").unwrap_or(CURSOR_START);
        let mut state = PagerState::new(start);
        let mut pages = Vec::new();

        let (stop, next) = loop {
            let request = query.with_cursor(&state.cursor);
            let page = self
                .fetch_page(path, &request, options)
                .await
                .map_err(|e| e.at_cursor(state.cursor.clone(), state.pages))?;

            let count = page.item_count() as u64;
            debug!(
                "Page {} at cursor '{}' returned {} items",
                state.pages, state.cursor, count
            );

            if count == 0 {
                break (StopReason::EmptyPage, None);
            }

            let next = page.next_cursor().map(str::to_string);
            state.add_page(count, page.total_results());
            pages.push(page);

            if state.total_fetched >= self.cursor_max {
                let resume = next.filter(|n| *n != state.cursor);
                break (StopReason::CapReached, resume);
            }

            if state.exhausted() {
                break (StopReason::Exhausted, None);
            }

            match next {
                None => break (StopReason::NoNextCursor, None),
                Some(next) if next == state.cursor => {
                    warn!(
                        "Server returned the same cursor '{}', stopping after {} pages",
                        next, state.pages
                    );
                    break (StopReason::StalledCursor, None);
                }
                Some(next) => state.set_cursor(next),
            }
        };

        info!(
            "Cursor walk on {} stopped ({:?}): {} pages, {} items",
            path, stop, state.pages, state.total_fetched
        );

        Ok(PageSequence::new(pages, stop, next))
    }

    async fn fetch_page(
        &self,
        path: &str,
        query: &QueryString,
        options: &TransportOptions,
    ) -> Result<Page> {
        let body = self.dispatcher.fetch(path, query, options).await?;
        let page = Page::new(body);
        if page.item_list().is_none() {
            return Err(Error::decode(format!(
                "Response from {path} has no message.items list"
            )));
        }
        Ok(page)
    }
}
