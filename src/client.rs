//! API client
//!
//! The caller-facing entry point: one method per resource, plus agency
//! resolution, random DOIs and filter introspection.

use crate::config::ClientConfig;
use crate::engine::{FanOut, Fetched, QueryEngine, ResultSet};
use crate::error::{Error, Result};
use crate::filters::{FilterDetail, FilterRegistry};
use crate::http::{Dispatcher, HttpClient};
use crate::pagination::Page;
use crate::request::{Ids, SearchRequest, TransportOptions};
use crate::types::{JsonValue, Resource, DEFAULT_CURSOR_MAX};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Default number of random DOIs
pub const DEFAULT_SAMPLE: u64 = 10;

/// Crossref REST API client
#[derive(Clone)]
pub struct Crossref {
    dispatcher: Arc<dyn Dispatcher>,
    cursor_max: u64,
}

impl Crossref {
    /// Create a client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from configuration
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.to_http_config())?;
        debug!("Created client for {}", config.base_url);
        Ok(Self {
            dispatcher: Arc::new(http),
            cursor_max: config.cursor_max,
        })
    }

    /// Create a client over any dispatcher
    pub fn with_dispatcher(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher,
            cursor_max: DEFAULT_CURSOR_MAX,
        }
    }

    /// Set the default cursor cap
    #[must_use]
    pub fn with_cursor_max(mut self, cursor_max: u64) -> Self {
        self.cursor_max = cursor_max;
        self
    }

    fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(self.dispatcher.as_ref()).with_cursor_max(self.cursor_max)
    }

    /// Execute a request against its own resource
    pub async fn search(&self, request: &SearchRequest) -> Result<ResultSet> {
        self.engine().execute(request).await
    }

    /// Search `/works`
    pub async fn works(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Works)).await
    }

    /// Search `/members`
    pub async fn members(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Members)).await
    }

    /// Search `/prefixes`
    pub async fn prefixes(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Prefixes)).await
    }

    /// Search `/funders`
    pub async fn funders(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Funders)).await
    }

    /// Search `/journals`
    pub async fn journals(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Journals)).await
    }

    /// Search `/types`
    pub async fn types(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Types)).await
    }

    /// Search `/licenses`
    pub async fn licenses(&self, request: SearchRequest) -> Result<ResultSet> {
        self.search(&request.resource(Resource::Licenses)).await
    }

    /// Resolve the registration agency of one or more DOIs
    ///
    /// One DOI gives a bare label, several give labels in input order.
    pub async fn registration_agency(
        &self,
        ids: impl Into<Ids>,
        options: TransportOptions,
    ) -> Result<FanOut<String>> {
        let ids = ids.into();
        if ids.is_empty() {
            return Err(Error::invalid_request(
                "registration agency lookup needs at least one DOI",
            ));
        }

        let mut request = SearchRequest::new(Resource::Works)
            .ids(ids)
            .transport(options);
        request.agency = true;

        match self.search(&request).await? {
            ResultSet::Single(page) => Ok(FanOut::One(agency_label(&page)?)),
            ResultSet::Many(results) => {
                let labels = results
                    .iter()
                    .map(|fetched| match fetched {
                        Fetched::Page(page) => agency_label(page),
                        Fetched::Pages(_) => {
                            Err(Error::decode("Unexpected page sequence on the agency route"))
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(FanOut::Many(labels))
            }
            ResultSet::Pages(_) => Err(Error::decode(
                "Unexpected page sequence on the agency route",
            )),
        }
    }

    /// Fetch `sample` random DOIs
    pub async fn random_dois(&self, sample: u64) -> Result<Vec<String>> {
        let request = SearchRequest::new(Resource::Works).sample(sample);
        let result = self.search(&request).await?;
        let page = result
            .as_page()
            .ok_or_else(|| Error::decode("Expected a single page for a sample request"))?;

        let items = page
            .item_list()
            .ok_or_else(|| Error::decode("Sample response has no message.items list"))?;
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                item.get("DOI")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| Error::decode(format!("Sample item {index} has no DOI")))
            })
            .collect()
    }

    /// Names of all recognized filters
    pub fn filter_names(&self) -> BTreeSet<&'static str> {
        FilterRegistry::global().names()
    }

    /// Value kind and description of each recognized filter
    pub fn filter_details(&self) -> BTreeMap<&'static str, FilterDetail> {
        FilterRegistry::global().details()
    }
}

impl fmt::Debug for Crossref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crossref")
            .field("cursor_max", &self.cursor_max)
            .finish_non_exhaustive()
    }
}

/// `message.agency.label` of an agency response
fn agency_label(page: &Page) -> Result<String> {
    page.message()
        .and_then(|m| m.get("agency"))
        .and_then(|a| a.get("label"))
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::decode("Agency response has no message.agency.label"))
}
