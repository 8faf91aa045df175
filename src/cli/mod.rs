//! CLI module
//!
//! Command-line interface for querying HubSpot tables.
//!
//! # Commands
//!
//! - `check` - Test connection to the API
//! - `tables` - List tables and their columns
//! - `list` - Stream the rows of a table
//! - `get` - Fetch one row by id
//! - `associations` - List the ids associated with a record
//! - `serve` - Start HTTP server mode

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
pub use server::{router, serve};
