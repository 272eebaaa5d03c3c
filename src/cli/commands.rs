//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Crossref REST API client
#[derive(Parser, Debug)]
#[command(name = "crossref")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Client configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides config and CROSSREF_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Contact address for the polite pool
    #[arg(long, global = true)]
    pub mailto: Option<String>,

    /// API root
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search works (articles, books, datasets...)
    Works(SearchArgs),

    /// Search members (publishers)
    Members(SearchArgs),

    /// Look up DOI prefixes
    Prefixes(SearchArgs),

    /// Search funders
    Funders(SearchArgs),

    /// Search journals
    Journals(SearchArgs),

    /// Search work types
    Types(SearchArgs),

    /// List licenses
    Licenses(SearchArgs),

    /// Resolve the registration agency of DOIs
    Agency {
        /// DOIs to resolve
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Fetch random DOIs
    RandomDois {
        /// Number of DOIs
        #[arg(short, long, default_value_t = crate::client::DEFAULT_SAMPLE)]
        sample: u64,
    },

    /// List recognized filters
    Filters {
        /// Include value kinds and descriptions
        #[arg(long)]
        details: bool,
    },
}

/// Search flags shared by all resource commands
#[derive(Args, Debug, Clone, Default)]
pub struct SearchArgs {
    /// Identifier (repeatable)
    #[arg(long = "id")]
    pub ids: Vec<String>,

    /// Free-text query
    #[arg(short, long)]
    pub query: Option<String>,

    /// Filter as name=value (repeatable)
    #[arg(long = "filter", value_parser = parse_key_value)]
    pub filters: Vec<(String, String)>,

    /// Field query as field=value (repeatable), sent as query.<field>
    #[arg(long = "field", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// Raw named parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_key_value)]
    pub params: Vec<(String, String)>,

    /// Offset of the first record
    #[arg(long)]
    pub offset: Option<u64>,

    /// Records per page
    #[arg(short, long)]
    pub limit: Option<u64>,

    /// Number of random records
    #[arg(long)]
    pub sample: Option<u64>,

    /// Sort field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort order (asc or desc)
    #[arg(long)]
    pub order: Option<String>,

    /// Include facet counts
    #[arg(long)]
    pub facet: bool,

    /// Target the works of each identifier
    #[arg(long)]
    pub works: bool,

    /// Cursor token (`*` to start deep paging)
    #[arg(long)]
    pub cursor: Option<String>,

    /// Cap on records fetched in cursor mode
    #[arg(long)]
    pub cursor_max: Option<u64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}

/// Parse `name=value`
fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing name in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
