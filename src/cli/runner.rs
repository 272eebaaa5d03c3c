//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat, SearchArgs};
use crate::client::Crossref;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::{SearchRequest, TransportOptions};
use crate::types::{Resource, SortOrder};
use serde::Serialize;
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Works(args) => self.search(Resource::Works, args).await,
            Commands::Members(args) => self.search(Resource::Members, args).await,
            Commands::Prefixes(args) => self.search(Resource::Prefixes, args).await,
            Commands::Funders(args) => self.search(Resource::Funders, args).await,
            Commands::Journals(args) => self.search(Resource::Journals, args).await,
            Commands::Types(args) => self.search(Resource::Types, args).await,
            Commands::Licenses(args) => self.search(Resource::Licenses, args).await,
            Commands::Agency { ids } => self.agency(ids).await,
            Commands::RandomDois { sample } => self.random_dois(*sample).await,
            Commands::Filters { details } => {
                self.filters(*details);
                Ok(())
            }
        }
    }

    /// Build the client config: file, then environment, then flags
    pub(crate) fn client_config(&self) -> Result<ClientConfig> {
        let config = match &self.cli.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        let mut config = config.with_env()?;

        if let Some(url) = &self.cli.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(key) = &self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(mailto) = &self.cli.mailto {
            config.mailto = Some(mailto.clone());
        }
        config.validate()?;
        Ok(config)
    }

    fn client(&self) -> Result<Crossref> {
        Crossref::with_config(&self.client_config()?)
    }

    async fn search(&self, resource: Resource, args: &SearchArgs) -> Result<()> {
        let request = build_request(resource, args)?;
        let result = self.client()?.search(&request).await?;
        self.output(&result);
        Ok(())
    }

    async fn agency(&self, ids: &[String]) -> Result<()> {
        let labels = self
            .client()?
            .registration_agency(ids.to_vec(), TransportOptions::default())
            .await?;
        self.output(&labels);
        Ok(())
    }

    async fn random_dois(&self, sample: u64) -> Result<()> {
        let dois = self.client()?.random_dois(sample).await?;
        self.output(&dois);
        Ok(())
    }

    fn filters(&self, details: bool) {
        let registry = crate::filters::FilterRegistry::global();
        if details {
            self.output(&registry.details());
        } else {
            self.output(&json!(registry.names()));
        }
    }

    fn output<T: Serialize>(&self, value: &T) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(value).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
            }
        }
    }
}

/// Translate search flags into a request
pub(crate) fn build_request(resource: Resource, args: &SearchArgs) -> Result<SearchRequest> {
    let mut request = SearchRequest::new(resource).ids(args.ids.clone());

    if let Some(query) = &args.query {
        request = request.query(query);
    }
    for (name, value) in &args.filters {
        request = request.filter(name, value.as_str());
    }
    for (field, value) in &args.fields {
        request = request.field_query(field, value);
    }
    if let Some(offset) = args.offset {
        request = request.offset(offset);
    }
    if let Some(limit) = args.limit {
        request = request.limit(limit);
    }
    if let Some(sample) = args.sample {
        request = request.sample(sample);
    }
    if let Some(sort) = &args.sort {
        request = request.sort(sort);
    }
    if let Some(order) = &args.order {
        request = request.order(order.parse::<SortOrder>()?);
    }
    if args.facet {
        request = request.facet(true);
    }
    if args.works {
        request = request.works(true);
    }
    if let Some(cursor) = &args.cursor {
        request = request.cursor(cursor);
    }
    if let Some(max) = args.cursor_max {
        request = request.cursor_max(max);
    }
    for (key, value) in &args.params {
        request = request.set(key, value)?;
    }

    Ok(request)
}
