//! Request types
//!
//! The parameter set of one logical call, identifier variants and the
//! transport options forwarded to the dispatcher.

use crate::error::{Error, Result};
use crate::filters::{FilterValue, Filters};
use crate::types::{Resource, SortOrder};
use std::fmt;
use std::time::Duration;

// ============================================================================
// Identifiers
// ============================================================================

/// Identifiers supplied with a request
///
/// Decided once when the request is built: an empty list becomes `None` and
/// a one-element list becomes `Single`, so `Many` always holds two or more.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Ids {
    #[default]
    None,
    Single(String),
    Many(Vec<String>),
}

impl Ids {
    /// Build from any list of identifiers
    pub fn from_list<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        match ids.len() {
            0 => Ids::None,
            1 => Ids::Single(ids.remove(0)),
            _ => Ids::Many(ids),
        }
    }

    /// Number of identifiers
    pub fn len(&self) -> usize {
        match self {
            Ids::None => 0,
            Ids::Single(_) => 1,
            Ids::Many(ids) => ids.len(),
        }
    }

    /// Check if no identifier was given
    pub fn is_empty(&self) -> bool {
        matches!(self, Ids::None)
    }

    /// Check if the request fans out over several identifiers
    pub fn is_many(&self) -> bool {
        matches!(self, Ids::Many(_))
    }

    /// Iterate identifiers in input order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Ids::None => &[],
            Ids::Single(id) => std::slice::from_ref(id),
            Ids::Many(ids) => ids,
        };
        slice.iter().map(String::as_str)
    }
}

impl From<&str> for Ids {
    fn from(id: &str) -> Self {
        Ids::Single(id.to_string())
    }
}

impl From<String> for Ids {
    fn from(id: String) -> Self {
        Ids::Single(id)
    }
}

impl From<Vec<String>> for Ids {
    fn from(ids: Vec<String>) -> Self {
        Ids::from_list(ids)
    }
}

impl From<Vec<&str>> for Ids {
    fn from(ids: Vec<&str>) -> Self {
        Ids::from_list(ids)
    }
}

impl From<&[&str]> for Ids {
    fn from(ids: &[&str]) -> Self {
        Ids::from_list(ids.iter().copied())
    }
}

// ============================================================================
// Transport Options
// ============================================================================

/// Options forwarded to the dispatcher, never into the query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportOptions {
    /// Extra request headers
    pub headers: Vec<(String, String)>,
    /// Override the client timeout for these requests
    pub timeout: Option<Duration>,
    /// Override the client's transport retry count
    pub max_retries: Option<u32>,
}

impl TransportOptions {
    /// Create empty options
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Set timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set max retries
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }
}

// ============================================================================
// Result Shape
// ============================================================================

/// Shape of the result a request produces, known before any call is made
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultShape {
    /// One page (no cursor, at most one identifier)
    Single,
    /// A page sequence (cursor mode, at most one identifier)
    Pages,
    /// One result per identifier
    PerId,
}

// ============================================================================
// Search Request
// ============================================================================

/// Parameters for one logical call
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    /// Target resource
    pub resource: Resource,
    /// Identifiers appended to the route
    pub ids: Ids,
    /// Free-text query
    pub query: Option<String>,
    /// Filters in caller order
    pub filters: Filters,
    /// Field queries (`field`, value) in caller order, sent as `query.<field>`
    pub field_queries: Vec<(String, String)>,
    /// Offset of the first record
    pub offset: Option<u64>,
    /// Records per page, sent as `rows`
    pub limit: Option<u64>,
    /// Number of random records
    pub sample: Option<u64>,
    /// Sort field
    pub sort: Option<String>,
    /// Sort direction
    pub order: Option<SortOrder>,
    /// Include facet counts
    pub facet: Option<bool>,
    /// Target the `/<id>/works` sub-route
    pub works: bool,
    /// Cursor token (`*` to start deep paging)
    pub cursor: Option<String>,
    /// Cap on records fetched in cursor mode
    pub cursor_max: Option<u64>,
    /// Options forwarded to the transport
    pub transport: TransportOptions,
    /// Target the `/<id>/agency` sub-route
    pub(crate) agency: bool,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self::new(Resource::Works)
    }
}

impl SearchRequest {
    /// Create an empty request against a resource
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            ids: Ids::None,
            query: None,
            filters: Filters::new(),
            field_queries: Vec::new(),
            offset: None,
            limit: None,
            sample: None,
            sort: None,
            order: None,
            facet: None,
            works: false,
            cursor: None,
            cursor_max: None,
            transport: TransportOptions::default(),
            agency: false,
        }
    }

    /// Set the resource
    #[must_use]
    pub fn resource(mut self, resource: Resource) -> Self {
        self.resource = resource;
        self
    }

    /// Set identifiers
    #[must_use]
    pub fn ids(mut self, ids: impl Into<Ids>) -> Self {
        self.ids = ids.into();
        self
    }

    /// Set the free-text query
    #[must_use]
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Add a filter
    #[must_use]
    pub fn filter(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.filters.insert(name, value);
        self
    }

    /// Replace all filters
    #[must_use]
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Add a field query (`author` becomes `query.author`)
    #[must_use]
    pub fn field_query(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        let value = value.into();
        if let Some(existing) = self.field_queries.iter_mut().find(|(f, _)| *f == field) {
            existing.1 = value;
        } else {
            self.field_queries.push((field, value));
        }
        self
    }

    /// Set offset
    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Set records per page
    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set random sample size
    #[must_use]
    pub fn sample(mut self, sample: u64) -> Self {
        self.sample = Some(sample);
        self
    }

    /// Set sort field
    #[must_use]
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    /// Set sort direction
    #[must_use]
    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Request facet counts
    #[must_use]
    pub fn facet(mut self, facet: bool) -> Self {
        self.facet = Some(facet);
        self
    }

    /// Target the works of the identified entity
    #[must_use]
    pub fn works(mut self, works: bool) -> Self {
        self.works = works;
        self
    }

    /// Set the cursor token
    #[must_use]
    pub fn cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Set the cursor cap
    #[must_use]
    pub fn cursor_max(mut self, max: u64) -> Self {
        self.cursor_max = Some(max);
        self
    }

    /// Set transport options
    #[must_use]
    pub fn transport(mut self, transport: TransportOptions) -> Self {
        self.transport = transport;
        self
    }

    /// Set a parameter by name
    ///
    /// Accepts the fixed parameter names, `query_<field>` field queries,
    /// `filter.<name>` filters and the transport keys `timeout` (seconds) and
    /// `max_retries`. Any other name is rejected with `UnknownParameter`.
    pub fn set(self, name: &str, value: &str) -> Result<Self> {
        let request = match name {
            "query" => self.query(value),
            "offset" => self.offset(parse_number(name, value)?),
            "limit" | "rows" => self.limit(parse_number(name, value)?),
            "sample" => self.sample(parse_number(name, value)?),
            "sort" => self.sort(value),
            "order" => self.order(value.parse()?),
            "facet" => self.facet(parse_bool(name, value)?),
            "works" => self.works(parse_bool(name, value)?),
            "cursor" => self.cursor(value),
            "cursor_max" => self.cursor_max(parse_number(name, value)?),
            "ids" => self.ids(Ids::from_list(value.split(',').map(str::trim))),
            "timeout" => {
                let secs = parse_number(name, value)?;
                let mut request = self;
                request.transport.timeout = Some(Duration::from_secs(secs));
                request
            }
            "max_retries" => {
                let retries = parse_number(name, value)?;
                let mut request = self;
                request.transport.max_retries = Some(u32::try_from(retries).map_err(|_| {
                    Error::invalid_request(format!("max_retries out of range: {value}"))
                })?);
                request
            }
            other => {
                if let Some(field) = other.strip_prefix("query_") {
                    self.field_query(field, value)
                } else if let Some(filter) = other.strip_prefix("filter.") {
                    self.filter(filter, value)
                } else {
                    return Err(Error::unknown_parameter(other));
                }
            }
        };
        Ok(request)
    }

    /// Whether cursor deep paging is requested
    pub fn is_cursor(&self) -> bool {
        self.cursor.is_some()
    }

    /// Shape of the result this request produces
    pub fn shape(&self) -> ResultShape {
        if self.ids.is_many() {
            ResultShape::PerId
        } else if self.is_cursor() {
            ResultShape::Pages
        } else {
            ResultShape::Single
        }
    }
}

fn parse_number(name: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        Error::invalid_request(format!("{name} must be a non-negative integer, got '{value}'"))
    })
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(Error::invalid_request(format!(
            "{name} must be true or false, got '{value}'"
        ))),
    }
}

// ============================================================================
// Query String
// ============================================================================

/// Ordered query parameters for one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Create an empty query string
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Set a parameter, replacing an existing one in place
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(pair) = self.pairs.iter_mut().find(|(k, _)| k == key) {
            pair.1 = value;
        } else {
            self.pairs.push((key.to_string(), value));
        }
    }

    /// Copy with the cursor set to `token`
    #[must_use]
    pub fn with_cursor(&self, token: &str) -> Self {
        let mut query = self.clone();
        query.set("cursor", token);
        query
    }

    /// Value of a parameter
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters in encoding order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Parameter names in encoding order
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl fmt::Display for QueryString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish();
        f.write_str(&encoded)
    }
}
