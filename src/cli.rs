//! Command-line interface (CLI) argument parsing module.
//!
//! This module provides CLI argument parsing using `clap`.
//! It supports running a batch latency test, listing the known resolvers and
//! test domains, and managing user-added entries.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI argument parser using clap derive macro.
///
/// # Example
///
/// ```ignore
/// let cli = Cli::parse();
/// match cli.command {
///     Some(Commands::Test { domain, .. }) => { /* ... */ }
///     Some(Commands::List { domains, .. }) => { /* ... */ }
///     None => { /* default: run the test */ }
/// }
/// ```
#[derive(Parser, Debug)]
#[command(
    name = "dnspick",
    version,
    about = "Measure DNS resolver latency and pick the fastest server",
    long_about = "Measures round-trip DNS latency to a list of resolvers with four \
                  independent probes (TCP resolve, UDP resolve, random-subdomain \
                  resolve, ICMP echo), ranks the resolvers, and reports a winner.",
    infer_subcommands = true
)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format (default, human-readable)
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated)
    Tsv,
}

impl OutputFormat {
    /// Get all available output format names.
    #[must_use]
    pub fn names() -> &'static [&'static str] {
        &["table", "json", "csv", "tsv"]
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            _ => Err(format!(
                "Unknown format: {}. Valid options are: {:?}",
                s,
                Self::names()
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
        }
    }
}

/// Available commands for the dnspick CLI.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the latency test across all known resolvers
    ///
    /// Tests every built-in and user-added resolver concurrently with the
    /// four probes and prints the ranked results plus the winner.
    #[command(alias = "t")]
    Test {
        /// Test domain, by catalog name or as a literal domain
        /// (default: the first built-in entry)
        #[arg(short, long)]
        domain: Option<String>,

        /// Load the resolver list from a JSON file instead of the catalog
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Additional ad-hoc resolvers (format: IP#Name)
        #[arg(long = "dns")]
        dns_servers: Vec<String>,
    },

    /// List known resolvers or test domains
    #[command(alias = "l")]
    List {
        /// List test domains instead of resolvers
        #[arg(long)]
        domains: bool,
    },

    /// Add a user-defined resolver
    Add {
        /// Display name
        name: String,

        /// Primary address
        primary: std::net::IpAddr,

        /// Optional secondary address
        secondary: Option<std::net::IpAddr>,
    },

    /// Remove a user-defined resolver by name
    Remove {
        /// Display name of the entry to remove
        name: String,
    },

    /// Add a user-defined test domain
    AddDomain {
        /// Display name
        name: String,

        /// Domain to query
        domain: String,

        /// Category label
        #[arg(short, long, default_value = "Custom")]
        category: String,
    },

    /// Remove a user-defined test domain by name
    RemoveDomain {
        /// Display name of the entry to remove
        name: String,
    },
}

/// Parse CLI arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert_eq!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("csv".parse::<OutputFormat>(), Ok(OutputFormat::Csv));
        assert_eq!("tsv".parse::<OutputFormat>(), Ok(OutputFormat::Tsv));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_output_format_display() {
        assert_eq!(OutputFormat::Table.to_string(), "table");
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::Csv.to_string(), "csv");
        assert_eq!(OutputFormat::Tsv.to_string(), "tsv");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_cli_parses_test_command() {
        let cli = Cli::parse_from(["dnspick", "test", "--dns", "8.8.8.8#Google"]);
        match cli.command {
            Some(Commands::Test { dns_servers, .. }) => {
                assert_eq!(dns_servers, vec!["8.8.8.8#Google".to_string()]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
