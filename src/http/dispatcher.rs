//! Request dispatcher
//!
//! The seam between the paging engine and the transport. One `fetch` issues
//! exactly one request and returns the decoded body.

use super::client::HttpClient;
use crate::error::Result;
use crate::request::{QueryString, TransportOptions};
use crate::types::JsonValue;
use async_trait::async_trait;

/// Issues one GET against a route and returns the decoded JSON body
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Fetch `path` with the encoded `query`
    async fn fetch(
        &self,
        path: &str,
        query: &QueryString,
        options: &TransportOptions,
    ) -> Result<JsonValue>;
}

#[async_trait]
impl Dispatcher for HttpClient {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryString,
        options: &TransportOptions,
    ) -> Result<JsonValue> {
        self.get_json(path, query, options).await
    }
}
