//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Query HubSpot CRM objects as tables
#[derive(Parser, Debug)]
#[command(name = "hubspot-tables")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connection configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline connection configuration JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

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
    /// Test connection to the API
    Check,

    /// List tables and their columns
    Tables {
        /// Show only this table
        #[arg(long)]
        table: Option<String>,
    },

    /// List the rows of a table
    List {
        /// Table name (e.g. hubspot_company) or object type (e.g. company)
        table: String,

        /// List archived records instead of active ones
        #[arg(long)]
        archived: bool,

        /// Maximum rows to return
        #[arg(long)]
        limit: Option<usize>,

        /// Columns to return (comma-separated, default all)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },

    /// Fetch one row by id
    Get {
        /// Table name or object type
        table: String,

        /// Record id
        id: String,

        /// Columns to return (comma-separated, default all)
        #[arg(long, value_delimiter = ',')]
        columns: Option<Vec<String>>,
    },

    /// List the ids associated with one record
    Associations {
        /// Object type of the record (e.g. company)
        from: String,

        /// Record id
        id: String,

        /// Object type to list (e.g. contact)
        to: String,
    },

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
