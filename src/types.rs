//! Common types used throughout the client
//!
//! Shared enums and aliases used by the request, pagination and client
//! modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// Default Crossref API root
pub const DEFAULT_BASE_URL: &str = "https://api.crossref.org";

/// Cursor token that starts a deep-paging walk
pub const CURSOR_START: &str = "*";

/// Default cap on records fetched by a cursor walk
pub const DEFAULT_CURSOR_MAX: u64 = 5000;

// ============================================================================
// Resource
// ============================================================================

/// Resource collections exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Works,
    Members,
    Prefixes,
    Funders,
    Journals,
    Types,
    Licenses,
}

impl Resource {
    /// All resources, in route order
    pub const ALL: [Resource; 7] = [
        Resource::Works,
        Resource::Members,
        Resource::Prefixes,
        Resource::Funders,
        Resource::Journals,
        Resource::Types,
        Resource::Licenses,
    ];

    /// Route name without slashes (e.g. `works`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Works => "works",
            Resource::Members => "members",
            Resource::Prefixes => "prefixes",
            Resource::Funders => "funders",
            Resource::Journals => "journals",
            Resource::Types => "types",
            Resource::Licenses => "licenses",
        }
    }

    /// Route path (e.g. `/works`)
    pub fn path(&self) -> String {
        format!("/{}", self.as_str())
    }

    /// Whether identifiers may be appended to the route
    pub fn supports_ids(&self) -> bool {
        !matches!(self, Resource::Licenses)
    }

    /// Whether a free-text `query` is accepted
    pub fn supports_query(&self) -> bool {
        !matches!(self, Resource::Prefixes)
    }

    /// Whether `filter` is accepted
    pub fn supports_filter(&self) -> bool {
        !matches!(self, Resource::Licenses)
    }

    /// Whether `sample` is accepted
    pub fn supports_sample(&self) -> bool {
        !matches!(self, Resource::Licenses)
    }

    /// Whether cursor deep paging is accepted
    pub fn supports_cursor(&self) -> bool {
        !matches!(self, Resource::Licenses)
    }

    /// Whether the `/<id>/works` sub-route exists
    pub fn supports_works(&self) -> bool {
        !matches!(self, Resource::Works | Resource::Licenses)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().trim_matches('/').to_ascii_lowercase();
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == trimmed)
            .ok_or_else(|| Error::invalid_request(format!("Unknown resource: {s}")))
    }
}

// ============================================================================
// Sort Order
// ============================================================================

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(Error::invalid_request(format!(
                "order must be 'asc' or 'desc', got '{other}'"
            ))),
        }
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for transport retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
