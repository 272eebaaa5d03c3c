//! CLI module
//!
//! Command-line interface over the API client.
//!
//! # Commands
//!
//! - `works`, `members`, `prefixes`, `funders`, `journals`, `types`, `licenses` - Search a resource
//! - `agency` - Resolve registration agencies of DOIs
//! - `random-dois` - Fetch random DOIs
//! - `filters` - List recognized filters

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, SearchArgs};
pub use runner::Runner;
