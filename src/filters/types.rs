//! Filter types
//!
//! Caller-facing filter map and the validated form produced by the registry.

use super::registry::normalize;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of value a registered filter accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// `true` / `false`
    Boolean,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    Date,
    /// Non-negative integer
    Integer,
    /// A DOI (`10.<prefix>/<suffix>`)
    Doi,
    /// An ISSN (`1234-5678`)
    Issn,
    /// An ORCID iD, bare or as an orcid.org URL
    Orcid,
    /// An http(s) URL
    Url,
    /// Free text
    Text,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FilterKind::Boolean => "boolean",
            FilterKind::Date => "date",
            FilterKind::Integer => "integer",
            FilterKind::Doi => "doi",
            FilterKind::Issn => "issn",
            FilterKind::Orcid => "orcid",
            FilterKind::Url => "url",
            FilterKind::Text => "text",
        };
        f.write_str(s)
    }
}

/// A filter value as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Number(n) => write!(f, "{n}"),
            FilterValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<i32> for FilterValue {
    fn from(value: i32) -> Self {
        FilterValue::Number(value.into())
    }
}

impl From<u32> for FilterValue {
    fn from(value: u32) -> Self {
        FilterValue::Number(value.into())
    }
}

/// One entry of a caller's filter map
#[derive(Debug, Clone, PartialEq)]
pub struct FilterEntry {
    /// Filter name as the caller spelled it
    pub name: String,
    /// Filter value
    pub value: FilterValue,
    /// Whether the name is checked against the registry
    pub checked: bool,
}

/// Ordered filter map
///
/// Entries keep insertion order; re-inserting a name replaces the value in
/// place. Names are compared after folding case, `-` and `.`, so
/// `has_full_text` and `has-full-text` are the same entry. Encoding follows this order, so two maps with the same entries in
/// different order encode differently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters {
    entries: Vec<FilterEntry>,
}

impl Filters {
    /// Create an empty filter map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter (builder style)
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a filter
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.upsert(name.into(), value.into(), true);
    }

    /// Add a filter that bypasses the registry name check
    ///
    /// The name is sent on the wire exactly as given and the value is not
    /// coerced.
    pub fn insert_unchecked(&mut self, name: impl Into<String>, value: impl Into<FilterValue>) {
        self.upsert(name.into(), value.into(), false);
    }

    fn upsert(&mut self, name: String, value: FilterValue, checked: bool) {
        let key = normalize(&name);
        if let Some(entry) = self.entries.iter_mut().find(|e| normalize(&e.name) == key) {
            entry.name = name;
            entry.value = value;
            entry.checked = checked;
        } else {
            self.entries.push(FilterEntry {
                name,
                value,
                checked,
            });
        }
    }

    /// Look up a value by name
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|e| normalize(&e.name) == normalize(name))
            .map(|e| &e.value)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FilterEntry> {
        self.entries.iter()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (k, v) in iter {
            filters.insert(k, v);
        }
        filters
    }
}

/// A filter after registry validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFilter {
    /// Registry name (snake_case), or the raw name for unchecked entries
    pub name: String,
    /// Token the API expects
    pub wire: String,
    /// Normalized value
    pub value: String,
}

/// Validated filters in caller order
///
/// `Display` renders registry names (`has_full_text:true`);
/// [`ValidatedFilters::to_wire`] renders the API tokens (`has-full-text:true`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedFilters {
    pub(crate) filters: Vec<ValidatedFilter>,
}

impl ValidatedFilters {
    /// Iterate filters in caller order
    pub fn iter(&self) -> impl Iterator<Item = &ValidatedFilter> {
        self.filters.iter()
    }

    /// Number of filters
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Value of a filter by registry name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Render as the `filter=` query value
    pub fn to_wire(&self) -> String {
        self.filters
            .iter()
            .map(|f| format!("{}:{}", f.wire, f.value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for ValidatedFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, filter) in self.filters.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}:{}", filter.name, filter.value)?;
        }
        Ok(())
    }
}

/// Introspection record for one registered filter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterDetail {
    /// Accepted value kind
    pub kind: FilterKind,
    /// Human description of the accepted values
    pub values: Option<&'static str>,
    /// What the filter selects
    pub description: &'static str,
}
