// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # Crossref Client
//!
//! An async client for the Crossref REST API.
//!
//! ## Features
//!
//! - **All list routes**: works, members, prefixes, funders, journals, types, licenses
//! - **Validated filters**: Unknown names and malformed values fail before any request
//! - **Field queries**: `query.author`, `query.container-title`, ...
//! - **Deep paging**: Cursor walks with a cap, stopping on empty pages
//! - **Multi-DOI fan-out**: One result per identifier, in input order
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use crossref_client::{Crossref, Result, SearchRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Crossref::new()?;
//!
//!     let request = SearchRequest::default()
//!         .query("ecology")
//!         .filter("has_full_text", true)
//!         .cursor("*")
//!         .cursor_max(500);
//!
//!     let pages = client.works(request).await?;
//!     println!("{:?}", pages.shape());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Crossref client                       │
//! │   works()  members()  ...  registration_agency()  random_dois│
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────┬──────────────┬───┴──────────┬───────────┬─────────┐
//! │  Filters  │   Request    │    Engine    │ Paginate  │  HTTP   │
//! ├───────────┼──────────────┼──────────────┼───────────┼─────────┤
//! │ Registry  │ Validate     │ Fan-out      │ Cursor    │ GET     │
//! │ Coercion  │ Encode       │ Result shape │ Cap/Stop  │ Retry   │
//! │ Wire names│ Paths        │              │           │ API key │
//! └───────────┴──────────────┴──────────────┴───────────┴─────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Filter registry and validation
pub mod filters;

/// Search parameters and query-string encoding
pub mod request;

/// HTTP transport and the dispatcher seam
pub mod http;

/// Cursor deep paging
pub mod pagination;

/// Request execution and multi-identifier fan-out
pub mod engine;

/// Client configuration
pub mod config;

/// Caller-facing API client
pub mod client;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use client::Crossref;
pub use config::ClientConfig;
pub use engine::{FanOut, Fetched, ResultSet};
pub use filters::{FilterRegistry, FilterValue, Filters};
pub use pagination::{Page, PageSequence, StopReason};
pub use request::{Ids, ResultShape, SearchRequest, TransportOptions};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
