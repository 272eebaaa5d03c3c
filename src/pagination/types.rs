//! Pagination types
//!
//! Response pages, the sequence a cursor walk produces and the walk's state.

use crate::types::JsonValue;
use serde::{Serialize, Serializer};

/// One decoded response body
///
/// Opaque apart from the fields paging needs: `message.items`,
/// `message.total-results` and `message.next-cursor`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Page {
    body: JsonValue,
}

impl Page {
    /// Wrap a decoded body
    pub fn new(body: JsonValue) -> Self {
        Self { body }
    }

    /// The full body
    pub fn body(&self) -> &JsonValue {
        &self.body
    }

    /// Consume into the full body
    pub fn into_body(self) -> JsonValue {
        self.body
    }

    /// Top-level `status`
    pub fn status(&self) -> Option<&str> {
        self.body.get("status").and_then(JsonValue::as_str)
    }

    /// The `message` object
    pub fn message(&self) -> Option<&JsonValue> {
        self.body.get("message")
    }

    /// `message.items`, if the body has an item list
    pub fn item_list(&self) -> Option<&Vec<JsonValue>> {
        self.message()
            .and_then(|m| m.get("items"))
            .and_then(JsonValue::as_array)
    }

    /// `message.items`, empty when absent
    pub fn items(&self) -> &[JsonValue] {
        self.item_list().map_or(&[], Vec::as_slice)
    }

    /// Number of items in this page
    pub fn item_count(&self) -> usize {
        self.items().len()
    }

    /// `message.total-results`
    pub fn total_results(&self) -> Option<u64> {
        self.message()
            .and_then(|m| m.get("total-results"))
            .and_then(JsonValue::as_u64)
    }

    /// `message.next-cursor`
    pub fn next_cursor(&self) -> Option<&str> {
        self.message()
            .and_then(|m| m.get("next-cursor"))
            .and_then(JsonValue::as_str)
            .filter(|c| !c.is_empty())
    }
}

/// Why a cursor walk stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// `cursor_max` was zero; nothing was fetched
    ZeroCap,
    /// A page came back with no items
    EmptyPage,
    /// Items fetched reached `cursor_max`
    CapReached,
    /// Items fetched reached the reported `total-results`
    Exhausted,
    /// The page carried no `next-cursor`
    NoNextCursor,
    /// The server returned the cursor it was given
    StalledCursor,
}

/// Pages of one cursor walk, in fetch order
#[derive(Debug, Clone, PartialEq)]
pub struct PageSequence {
    pages: Vec<Page>,
    stop: StopReason,
    next_cursor: Option<String>,
}

impl PageSequence {
    pub(crate) fn new(pages: Vec<Page>, stop: StopReason, next_cursor: Option<String>) -> Self {
        Self {
            pages,
            stop,
            next_cursor,
        }
    }

    /// Pages in fetch order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Consume into the pages
    pub fn into_pages(self) -> Vec<Page> {
        self.pages
    }

    /// Number of pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page was kept
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Why the walk stopped
    pub fn stop_reason(&self) -> StopReason {
        self.stop
    }

    /// Token to resume the walk from, when the walk was cut short by the cap
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    /// Items across all pages, in order
    pub fn items(&self) -> impl Iterator<Item = &JsonValue> {
        self.pages.iter().flat_map(Page::items)
    }

    /// Total items across all pages
    pub fn total_items(&self) -> usize {
        self.pages.iter().map(Page::item_count).sum()
    }
}

impl Serialize for PageSequence {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.pages.serialize(serializer)
    }
}

/// Tracks a cursor walk in progress
#[derive(Debug, Clone, Default)]
pub struct PagerState {
    /// Cursor for the next request
    pub cursor: String,
    /// Pages fetched so far
    pub pages: usize,
    /// Items fetched so far
    pub total_fetched: u64,
    /// `total-results` reported by the first page
    pub total_available: Option<u64>,
}

impl PagerState {
    /// Create state starting at `cursor`
    pub fn new(cursor: impl Into<String>) -> Self {
        Self {
            cursor: cursor.into(),
            ..Default::default()
        }
    }

    /// Record a fetched page of `count` items
    pub fn add_page(&mut self, count: u64, total_available: Option<u64>) {
        self.pages += 1;
        self.total_fetched += count;
        if self.total_available.is_none() {
            self.total_available = total_available;
        }
    }

    /// Set cursor
    pub fn set_cursor(&mut self, cursor: String) {
        self.cursor = cursor;
    }

    /// Have the fetched items reached the reported `total-results`?
    pub fn exhausted(&self) -> bool {
        self.total_available
            .is_some_and(|total| self.total_fetched >= total)
    }
}
