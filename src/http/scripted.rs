//! Scripted dispatcher for unit tests
//!
//! Replies are consumed in order, one per `fetch`. Every call is recorded.

use super::Dispatcher;
use crate::error::{Error, Result};
use crate::request::{QueryString, TransportOptions};
use crate::types::JsonValue;
use async_trait::async_trait;
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted reply
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Body(JsonValue),
    Status(u16),
}

/// A recorded call
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub path: String,
    pub query: QueryString,
}

#[derive(Default)]
pub(crate) struct ScriptedDispatcher {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedDispatcher {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Dispatcher for ScriptedDispatcher {
    async fn fetch(
        &self,
        path: &str,
        query: &QueryString,
        _options: &TransportOptions,
    ) -> Result<JsonValue> {
        self.calls.lock().unwrap().push(Call {
            path: path.to_string(),
            query: query.clone(),
        });
        match self.replies.lock().unwrap().pop_front() {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(Error::http_status(status, "scripted failure")),
            None => Err(Error::http_status(599, "no scripted reply left")),
        }
    }
}

/// A list page with `count` items numbered from `first`
pub(crate) fn list_page(first: usize, count: usize, total: u64, next: Option<&str>) -> Reply {
    let items: Vec<JsonValue> = (first..first + count)
        .map(|i| json!({"DOI": format!("10.5555/{i}")}))
        .collect();
    let mut message = json!({
        "items": items,
        "total-results": total,
        "items-per-page": count,
    });
    if let Some(next) = next {
        message["next-cursor"] = json!(next);
    }
    Reply::Body(json!({
        "status": "ok",
        "message-type": "work-list",
        "message": message,
    }))
}

/// A single-entity body
pub(crate) fn entity(message: JsonValue) -> Reply {
    Reply::Body(json!({"status": "ok", "message": message}))
}
