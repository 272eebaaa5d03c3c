//! Request module
//!
//! Search parameters and their encoding into query strings.
//!
//! # Overview
//!
//! - `SearchRequest` - Parameters of one logical call
//! - `Ids` - No identifier, one, or many
//! - `TransportOptions` - Headers and overrides passed to the dispatcher
//! - `encode` / `path` - Query string and route for one HTTP request

mod encoder;
mod types;

pub use encoder::{encode, path, validate};
pub use types::{Ids, QueryString, ResultShape, SearchRequest, TransportOptions};
