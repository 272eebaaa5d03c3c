//! HTTP module
//!
//! Transport client and the dispatcher seam used by the paging engine.
//!
//! # Features
//!
//! - **API Key**: Sent as a fixed `Crossref-Plus-API-Token` header
//! - **Transport Retries**: Optional, with constant, linear or exponential backoff
//! - **Error Classification**: Status, timeout, transport and decode failures

mod client;
mod dispatcher;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, API_KEY_HEADER};
pub use dispatcher::Dispatcher;

#[cfg(test)]
pub(crate) mod scripted;
