//! Execution engine module
//!
//! Runs one logical call: encode, fan out over identifiers, then either a
//! single dispatch or a cursor walk per target.
//!
//! # Overview
//!
//! ```text
//! SearchRequest ──▶ encode ──▶ fan_out(ids) ──┬──▶ Dispatcher (one page)
//!                                             └──▶ CursorPager (page sequence)
//! ```
//!
//! Everything is sequential. A failure anywhere aborts the whole call and
//! no partial result is returned.

mod fanout;
mod types;

pub use fanout::fan_out;
pub use types::{FanOut, Fetched, ResultSet};

use crate::error::Result;
use crate::http::Dispatcher;
use crate::pagination::{CursorPager, Page};
use crate::request::{self, QueryString, SearchRequest};
use crate::types::DEFAULT_CURSOR_MAX;
use std::time::Instant;
use tracing::{debug, info};

/// Executes search requests against a dispatcher
pub struct QueryEngine<'a> {
    dispatcher: &'a dyn Dispatcher,
    default_cursor_max: u64,
}

impl<'a> QueryEngine<'a> {
    /// Create an engine over a dispatcher
    pub fn new(dispatcher: &'a dyn Dispatcher) -> Self {
        Self {
            dispatcher,
            default_cursor_max: DEFAULT_CURSOR_MAX,
        }
    }

    /// Set the cap used when a request carries no `cursor_max`
    #[must_use]
    pub fn with_cursor_max(mut self, cursor_max: u64) -> Self {
        self.default_cursor_max = cursor_max;
        self
    }

    /// Execute a request
    ///
    /// Validation and encoding happen once, before any network call.
    pub async fn execute(&self, request: &SearchRequest) -> Result<ResultSet> {
        let start = Instant::now();
        let query = request::encode(request)?;
        debug!(
            "Executing {} with {} ids, query '{}'",
            request.resource,
            request.ids.len(),
            query
        );

        let query = &query;
        let fetched = fan_out(&request.ids, |id| self.fetch_target(request, query, id)).await?;
        let result = ResultSet::from(fetched);

        info!(
            "Fetched {} ({:?}) in {}ms",
            request.resource,
            result.shape(),
            start.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Fetch one target route: a single page or a cursor walk
    async fn fetch_target(
        &self,
        request: &SearchRequest,
        query: &QueryString,
        id: Option<&str>,
    ) -> Result<Fetched> {
        let path = request::path(request, id);

        if request.is_cursor() {
            let cap = request.cursor_max.unwrap_or(self.default_cursor_max);
            let pages = CursorPager::new(self.dispatcher, cap)
                .run(&path, query, &request.transport)
                .await?;
            Ok(Fetched::Pages(pages))
        } else {
            let body = self
                .dispatcher
                .fetch(&path, query, &request.transport)
                .await?;
            Ok(Fetched::Page(Page::new(body)))
        }
    }
}

#[cfg(test)]
mod tests;
