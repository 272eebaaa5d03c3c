//! Filter registry module
//!
//! Static table of the filters the API recognizes, used to validate filter
//! maps and render them into the single `filter=` query value.
//!
//! # Overview
//!
//! - `Filters` - Ordered filter map supplied by the caller
//! - `FilterRegistry` - Lookup, validation and introspection
//! - `ValidatedFilters` - Normalized filters ready for encoding

mod registry;
mod types;

pub use registry::{FilterRegistry, FilterSpec};
pub use types::{
    FilterDetail, FilterEntry, FilterKind, FilterValue, Filters, ValidatedFilter, ValidatedFilters,
};
