//! Parameter encoder
//!
//! Turns a [`SearchRequest`] into the route path and ordered query string of
//! one HTTP request. Encoding is pure and deterministic: the same request
//! always produces the same string.

use super::types::{QueryString, SearchRequest};
use crate::error::{Error, Result};
use crate::filters::FilterRegistry;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// Field names accepted after the `query_` prefix
static FIELD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9]*([_-][A-Za-z0-9]+)*$").unwrap());

/// Check a request for parameter combinations the API rejects
///
/// Runs before any request is issued.
pub fn validate(request: &SearchRequest) -> Result<()> {
    let resource = request.resource;
    let unsupported = |name: &str| Error::unsupported(resource.as_str(), name);

    if !request.ids.is_empty() && !resource.supports_ids() {
        return Err(unsupported("ids"));
    }
    if request.query.is_some() && !resource.supports_query() {
        return Err(unsupported("query"));
    }
    if !request.filters.is_empty() && !resource.supports_filter() {
        return Err(unsupported("filter"));
    }
    if request.sample.is_some() && !resource.supports_sample() {
        return Err(unsupported("sample"));
    }
    if request.works && !resource.supports_works() {
        return Err(unsupported("works"));
    }

    for (field, _) in &request.field_queries {
        if !FIELD_REGEX.is_match(field) {
            return Err(Error::unknown_parameter(format!("query_{field}")));
        }
    }

    if let Some(cursor) = &request.cursor {
        if !resource.supports_cursor() {
            return Err(unsupported("cursor"));
        }
        if cursor.trim().is_empty() {
            return Err(Error::invalid_request("cursor must not be empty"));
        }
        if request.sample.is_some() {
            return Err(Error::invalid_request(
                "sample cannot be combined with cursor deep paging",
            ));
        }
        if request.agency {
            return Err(Error::invalid_request(
                "cursor deep paging is not available on the agency route",
            ));
        }
        if !request.ids.is_empty() && !request.works {
            return Err(Error::invalid_request(
                "cursor deep paging on an identifier requires the works route",
            ));
        }
    }

    Ok(())
}

/// Route path for one identifier (or none)
///
/// `/works`, `/works/10.1371/journal.pone.0033693`,
/// `/members/98/works`, `/works/10.1371/journal.pone.0033693/agency`.
///
/// The identifier is percent-encoded except for `/`, so `#`, `?` and `%`
/// inside a DOI stay part of the path.
pub fn path(request: &SearchRequest, id: Option<&str>) -> String {
    let mut path = request.resource.path();
    if let Some(id) = id {
        path.push('/');
        push_escaped(&mut path, id.trim().trim_matches('/'));
        if request.agency {
            path.push_str("/agency");
        } else if request.works {
            path.push_str("/works");
        }
    }
    path
}

/// Append `segment`, escaping every byte outside the RFC 3986 path set
fn push_escaped(out: &mut String, segment: &str) {
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'.'
            | b'_'
            | b'~'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
            | b':'
            | b'@'
            | b'/' => out.push(char::from(byte)),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
}

/// Encode the query string of a request
///
/// Validates the request and its filters first. Parameter order is fixed:
/// `query`, `query.<field>` (caller order), `filter`, `offset`, `rows`,
/// `sample`, `sort`, `order`, `facet`, `cursor`. In cursor mode `offset` is
/// dropped.
pub fn encode(request: &SearchRequest) -> Result<QueryString> {
    validate(request)?;

    let mut query = QueryString::new();

    if let Some(q) = &request.query {
        query.push("query", q.as_str());
    }

    for (field, value) in &request.field_queries {
        query.push(format!("query.{}", field_token(field)), value.as_str());
    }

    if !request.filters.is_empty() {
        let validated = FilterRegistry::global().validate(&request.filters)?;
        query.push("filter", validated.to_wire());
    }

    if let Some(offset) = request.offset {
        if request.is_cursor() {
            debug!("Dropping offset={offset} in cursor mode");
        } else {
            query.push("offset", offset.to_string());
        }
    }
    if let Some(limit) = request.limit {
        query.push("rows", limit.to_string());
    }
    if let Some(sample) = request.sample {
        query.push("sample", sample.to_string());
    }
    if let Some(sort) = &request.sort {
        query.push("sort", sort.as_str());
    }
    if let Some(order) = request.order {
        query.push("order", order.as_str());
    }
    if let Some(facet) = request.facet {
        query.push("facet", facet.to_string());
    }
    if let Some(cursor) = &request.cursor {
        query.push("cursor", cursor.as_str());
    }

    Ok(query)
}

/// API token for a field query name (`container_title` -> `container-title`)
fn field_token(field: &str) -> String {
    field.replace('_', "-").to_ascii_lowercase()
}
