//! Filter registry
//!
//! The static table of recognized filters, name normalization and value
//! coercion. Validation is pure: no I/O, no shared state.

use super::types::{
    FilterDetail, FilterKind, FilterValue, Filters, ValidatedFilter, ValidatedFilters,
};
use crate::error::{Error, Result};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

/// A registered filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Registry name (snake_case)
    pub name: &'static str,
    /// Token the API expects
    pub wire: &'static str,
    /// Accepted value kind
    pub kind: FilterKind,
    /// Human description of the accepted values
    pub values: Option<&'static str>,
    /// What the filter selects
    pub description: &'static str,
}

const fn spec(
    name: &'static str,
    wire: &'static str,
    kind: FilterKind,
    values: Option<&'static str>,
    description: &'static str,
) -> FilterSpec {
    FilterSpec {
        name,
        wire,
        kind,
        values,
        description,
    }
}

use FilterKind::{Boolean, Date, Doi, Integer, Issn, Orcid, Text, Url};

#[rustfmt::skip]
static FILTERS: &[FilterSpec] = &[
    // Funding
    spec("has_funder", "has-funder", Boolean, None, "metadata which includes one or more funder entry"),
    spec("funder", "funder", Text, Some("{funder_id}"), "metadata which include the {funder_id} in FundRef data"),
    spec("has_funder_doi", "has-funder-doi", Boolean, None, "metadata where funders have a DOI"),
    spec("location", "location", Text, Some("{country_name}"), "funder records where location = {country name}. Only works on /funders route"),
    spec("award_number", "award.number", Text, Some("{award_number}"), "metadata for records with a matching award number. Optionally combine with award_funder"),
    spec("award_funder", "award.funder", Text, Some("{funder doi or id}"), "metadata for records with an award with matching funder. Optionally combine with award_number"),
    // Ownership
    spec("prefix", "prefix", Text, Some("{owner_prefix}"), "metadata belonging to a DOI owner prefix {owner_prefix} (e.g. '10.1016' )"),
    spec("member", "member", Integer, Some("{member_id}"), "metadata belonging to a CrossRef member"),
    // Dates
    spec("from_index_date", "from-index-date", Date, Some("{date}"), "metadata indexed since (inclusive) {date}"),
    spec("until_index_date", "until-index-date", Date, Some("{date}"), "metadata indexed before (inclusive) {date}"),
    spec("from_deposit_date", "from-deposit-date", Date, Some("{date}"), "metadata last (re)deposited since (inclusive) {date}"),
    spec("until_deposit_date", "until-deposit-date", Date, Some("{date}"), "metadata last (re)deposited before (inclusive) {date}"),
    spec("from_update_date", "from-update-date", Date, Some("{date}"), "Metadata updated since (inclusive) {date}. Currently the same as 'from_deposit_date'"),
    spec("until_update_date", "until-update-date", Date, Some("{date}"), "Metadata updated before (inclusive) {date}. Currently the same as 'until_deposit_date'"),
    spec("from_created_date", "from-created-date", Date, Some("{date}"), "metadata first deposited since (inclusive) {date}"),
    spec("until_created_date", "until-created-date", Date, Some("{date}"), "metadata first deposited before (inclusive) {date}"),
    spec("from_pub_date", "from-pub-date", Date, Some("{date}"), "metadata where published date is since (inclusive) {date}"),
    spec("until_pub_date", "until-pub-date", Date, Some("{date}"), "metadata where published date is before (inclusive) {date}"),
    spec("from_online_pub_date", "from-online-pub-date", Date, Some("{date}"), "metadata where online published date is since (inclusive) {date}"),
    spec("until_online_pub_date", "until-online-pub-date", Date, Some("{date}"), "metadata where online published date is before (inclusive) {date}"),
    spec("from_print_pub_date", "from-print-pub-date", Date, Some("{date}"), "metadata where print published date is since (inclusive) {date}"),
    spec("until_print_pub_date", "until-print-pub-date", Date, Some("{date}"), "metadata where print published date is before (inclusive) {date}"),
    spec("from_posted_date", "from-posted-date", Date, Some("{date}"), "metadata where posted date is since (inclusive) {date}"),
    spec("until_posted_date", "until-posted-date", Date, Some("{date}"), "metadata where posted date is before (inclusive) {date}"),
    spec("from_accepted_date", "from-accepted-date", Date, Some("{date}"), "metadata where accepted date is since (inclusive) {date}"),
    spec("until_accepted_date", "until-accepted-date", Date, Some("{date}"), "metadata where accepted date is before (inclusive) {date}"),
    // Licensing and full text
    spec("has_license", "has-license", Boolean, None, "metadata that includes any '<license_ref>' elements"),
    spec("license_url", "license.url", Url, Some("{url}"), "metadata where '<license_ref>' value equals {url}"),
    spec("license_version", "license.version", Text, Some("{string}"), "metadata where the '<license_ref>''s 'applies_to' attribute is {string}"),
    spec("license_delay", "license.delay", Integer, Some("{integer}"), "metadata where difference between publication date and the '<license_ref>''s 'start_date' attribute is <= {integer} (in days)"),
    spec("has_full_text", "has-full-text", Boolean, None, "metadata that includes any full text '<resource>' elements"),
    spec("full_text_version", "full-text.version", Text, Some("{string}"), "metadata where '<resource>' element's 'content_version' attribute is {string}"),
    spec("full_text_type", "full-text.type", Text, Some("{mime_type}"), "metadata where '<resource>' element's 'content_type' attribute is {mime_type} (e.g. 'application/pdf')"),
    spec("full_text_application", "full-text.application", Text, Some("{string}"), "metadata where '<resource>' link has one of the following intended applications: 'text-mining', 'similarity-checking' or 'unspecified'"),
    // References and archiving
    spec("has_references", "has-references", Boolean, None, "metadata for works that have a list of references"),
    spec("reference_visibility", "reference-visibility", Text, Some("[open, limited, closed]"), "metadata for works where references are either 'open', 'limited' or 'closed'"),
    spec("has_archive", "has-archive", Boolean, None, "metadata which include name of archive partner"),
    spec("archive", "archive", Text, Some("{string}"), "metadata which where value of archive partner is {string}"),
    // Contributors
    spec("has_orcid", "has-orcid", Boolean, None, "metadata which includes one or more ORCIDs"),
    spec("has_authenticated_orcid", "has-authenticated-orcid", Boolean, None, "metadata which includes one or more ORCIDs where the depositing publisher claims to have witness the ORCID owner authenticate with ORCID"),
    spec("orcid", "orcid", Orcid, Some("{orcid}"), "metadata where '<orcid>' element's value = {orcid}"),
    spec("has_affiliation", "has-affiliation", Boolean, None, "metadata for records that have any affiliation information"),
    // Identifiers
    spec("issn", "issn", Issn, Some("{issn}"), "metadata where record has an ISSN = {issn}. Format is 'xxxx-xxxx'"),
    spec("isbn", "isbn", Text, Some("{isbn}"), "metadata where record has an ISBN = {isbn}"),
    spec("doi", "doi", Doi, Some("{doi}"), "metadata describing the DOI {doi}"),
    spec("updates", "updates", Doi, Some("{doi}"), "metadata for records that represent editorial updates to the DOI {doi}"),
    spec("alternative_id", "alternative-id", Text, Some("{string}"), "metadata for records with the given alternative ID, which may be a publisher_specific ID, or any other identifier a publisher may have provided"),
    spec("article_number", "article-number", Text, Some("{string}"), "metadata for records with a given article number"),
    // Record type and container
    spec("type", "type", Text, Some("{type}"), "metadata records whose type = {type}. Type must be an ID value from the list of types returned by the '/types' resource"),
    spec("type_name", "type-name", Text, Some("{string}"), "metadata records whose type name = {string}"),
    spec("directory", "directory", Text, Some("{directory}"), "metadata records whose article or serial are mentioned in the given {directory}. Currently the only supported value is 'doaj'"),
    spec("container_title", "container-title", Text, Some("{string}"), "metadata for records with a publication title exactly with an exact match"),
    spec("category_name", "category-name", Text, Some("{string}"), "metadata for records with an exact matching category label"),
    spec("group_title", "group-title", Text, Some("{string}"), "metadata for records that belong to a group with the given title"),
    // Updates and assertions
    spec("is_update", "is-update", Boolean, None, "metadata for records that represent editorial updates"),
    spec("has_update_policy", "has-update-policy", Boolean, None, "metadata for records that include a link to an editorial update policy"),
    spec("has_assertion", "has-assertion", Boolean, None, "metadata for records with any assertions"),
    spec("assertion_group", "assertion-group", Text, Some("{string}"), "metadata for records with an assertion in a particular group"),
    spec("assertion", "assertion", Text, Some("{string}"), "metadata for records with a particular named assertion"),
    // Content
    spec("has_abstract", "has-abstract", Boolean, None, "metadata for records which include an abstract"),
    spec("has_clinical_trial_number", "has-clinical-trial-number", Boolean, None, "metadata for records which include a clinical trial number"),
    spec("content_domain", "content-domain", Text, Some("{string}"), "metadata where the publisher records a particular domain name as the location Crossmark content will appear"),
    spec("has_content_domain", "has-content-domain", Boolean, None, "metadata where the publisher records a domain name location for Crossmark content"),
    spec("has_domain_restriction", "has-domain-restriction", Boolean, None, "metadata where the publisher restricts Crossmark usage to content domains"),
    // Relations
    spec("has_relation", "has-relation", Boolean, None, "metadata for records that either assert or are the object of a relation"),
    spec("relation_type", "relation.type", Text, Some("{string}"), "metadata for records with a relation of the given type"),
    spec("relation_object", "relation.object", Text, Some("{string}"), "metadata for records that are the object of a relation with the given identifier"),
    spec("relation_object_type", "relation.object-type", Text, Some("{string}"), "metadata for records that are the object of a relation with the given identifier type"),
];

/// Normalized lookup key: lowercase with `-` and `.` folded into `_`
pub(super) fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '-' | '.' => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

static INDEX: LazyLock<HashMap<String, &'static FilterSpec>> =
    LazyLock::new(|| FILTERS.iter().map(|f| (normalize(f.name), f)).collect());

static DATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}(-(0[1-9]|1[0-2])(-(0[1-9]|[12]\d|3[01]))?)?$").unwrap());

static ISSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-?\d{3}[\dXx]$").unwrap());

static ORCID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://orcid\.org/)?\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").unwrap()
});

static DOI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://(dx\.)?doi\.org/)?10\.\d{4,9}/\S+$").unwrap()
});

/// Registry of recognized filters
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterRegistry;

impl FilterRegistry {
    /// Get the registry
    pub fn global() -> Self {
        Self
    }

    /// Look up a filter; accepts snake_case, hyphenated or wire spellings
    pub fn lookup(&self, name: &str) -> Option<&'static FilterSpec> {
        INDEX.get(&normalize(name)).copied()
    }

    /// Check if a filter name is recognized
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All registered filter names
    pub fn names(&self) -> BTreeSet<&'static str> {
        FILTERS.iter().map(|f| f.name).collect()
    }

    /// Registered filters with accepted values and descriptions
    pub fn details(&self) -> BTreeMap<&'static str, FilterDetail> {
        FILTERS
            .iter()
            .map(|f| {
                (
                    f.name,
                    FilterDetail {
                        kind: f.kind,
                        values: f.values,
                        description: f.description,
                    },
                )
            })
            .collect()
    }

    /// Validate a filter map
    ///
    /// Fails on the first unknown name (unless the entry was inserted
    /// unchecked) or the first value that does not fit its filter's kind.
    pub fn validate(&self, filters: &Filters) -> Result<ValidatedFilters> {
        let mut validated = Vec::with_capacity(filters.len());

        for entry in filters.iter() {
            if !entry.checked {
                let value = entry.value.to_string();
                reject_separator(&entry.name, &value)?;
                validated.push(ValidatedFilter {
                    name: entry.name.clone(),
                    wire: entry.name.clone(),
                    value,
                });
                continue;
            }

            let spec = self
                .lookup(&entry.name)
                .ok_or_else(|| Error::unknown_filter(&entry.name))?;
            let value = coerce(spec, &entry.value)?;

            validated.push(ValidatedFilter {
                name: spec.name.to_string(),
                wire: spec.wire.to_string(),
                value,
            });
        }

        Ok(ValidatedFilters { filters: validated })
    }
}

/// Coerce a value to the registered kind, returning its wire text
fn coerce(spec: &FilterSpec, value: &FilterValue) -> Result<String> {
    let text = coerce_kind(spec, value)?;
    reject_separator(spec.name, &text)?;
    Ok(text)
}

/// Filters are joined with `,` on the wire, so a value may not contain one
fn reject_separator(name: &str, value: &str) -> Result<()> {
    if value.contains(',') {
        return Err(Error::filter_value(
            name,
            format!("value '{value}' must not contain ','"),
        ));
    }
    Ok(())
}

fn coerce_kind(spec: &FilterSpec, value: &FilterValue) -> Result<String> {
    let invalid = |expected: &str| {
        Error::filter_value(spec.name, format!("expected {expected}, got '{value}'"))
    };

    match spec.kind {
        FilterKind::Boolean => match value {
            FilterValue::Bool(b) => Ok(b.to_string()),
            FilterValue::Number(n) => match n.as_u64() {
                Some(1) => Ok("true".to_string()),
                Some(0) => Ok("false".to_string()),
                _ => Err(invalid("boolean")),
            },
            FilterValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Ok("true".to_string()),
                "false" | "0" => Ok("false".to_string()),
                _ => Err(invalid("boolean")),
            },
        },
        FilterKind::Integer => match value {
            FilterValue::Number(n) if n.is_u64() => Ok(n.to_string()),
            FilterValue::Text(s) if s.trim().parse::<u64>().is_ok() => Ok(s.trim().to_string()),
            _ => Err(invalid("non-negative integer")),
        },
        FilterKind::Date => {
            let text = match value {
                FilterValue::Number(n) if n.is_u64() => n.to_string(),
                FilterValue::Text(s) => s.trim().to_string(),
                _ => return Err(invalid("date (YYYY, YYYY-MM or YYYY-MM-DD)")),
            };
            if DATE_REGEX.is_match(&text) {
                Ok(text)
            } else {
                Err(invalid("date (YYYY, YYYY-MM or YYYY-MM-DD)"))
            }
        }
        FilterKind::Doi => text_matching(value, &DOI_REGEX).ok_or_else(|| invalid("DOI")),
        FilterKind::Issn => text_matching(value, &ISSN_REGEX).ok_or_else(|| invalid("ISSN")),
        FilterKind::Orcid => text_matching(value, &ORCID_REGEX).ok_or_else(|| invalid("ORCID iD")),
        FilterKind::Url => match value {
            FilterValue::Text(s)
                if s.trim().starts_with("http://") || s.trim().starts_with("https://") =>
            {
                Ok(s.trim().to_string())
            }
            _ => Err(invalid("http(s) URL")),
        },
        FilterKind::Text => match value {
            FilterValue::Text(s) if s.trim().is_empty() => Err(invalid("non-empty text")),
            FilterValue::Text(s) => Ok(s.trim().to_string()),
            FilterValue::Number(n) => Ok(n.to_string()),
            FilterValue::Bool(b) => Ok(b.to_string()),
        },
    }
}

fn text_matching(value: &FilterValue, regex: &Regex) -> Option<String> {
    match value {
        FilterValue::Text(s) if regex.is_match(s.trim()) => Some(s.trim().to_string()),
        _ => None,
    }
}
