// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # hubspot-tables
//!
//! Exposes HubSpot CRM objects (companies, contacts, deals, tickets, owners)
//! as tables with typed columns, including one column per custom property.
//!
//! ## Features
//!
//! - **Two credential styles**: private app token or OAuth refresh token,
//!   from config or `HUBSPOT_*` environment variables
//! - **Token cache**: OAuth access tokens are reused until five minutes
//!   before they expire, with one exchange in flight per credential
//! - **Dynamic columns**: property descriptors are discovered once per
//!   object type and turned into typed columns
//! - **Cursor pagination**: row limits and cancellation end a listing early
//! - **Associations**: linked record ids as JSON array columns
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hubspot_tables::{ConnectionConfig, Connector, HubSpotConnector, ListRequest, Result};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = ConnectionConfig::with_private_app_token("pat-na1-...");
//!     let connector = HubSpotConnector::new(config)?;
//!
//!     let request = ListRequest::new().limit(10).columns(["id", "name"]);
//!     connector
//!         .list("hubspot_company", &request, &CancellationToken::new(), &mut |row| {
//!             println!("{}", serde_json::Value::Object(row));
//!         })
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       HubSpotConnector                          │
//! │  check()   tables()   list(table, request)   get(table, id)     │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌────────────┬──────────────┬──┴───────────┬──────────────────────┐
//! │    Auth    │     HTTP     │   Paginate   │   Schema / Tables    │
//! ├────────────┼──────────────┼──────────────┼──────────────────────┤
//! │ Resolver   │ Bearer       │ Cursor loop  │ Property cache       │
//! │ TokenCache │ Throttle     │ Row limit    │ Type mapping         │
//! │            │ Status map   │ Cancel       │ Associations         │
//! └────────────┴──────────────┴──────────────┴──────────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)] // TODO: document AccountInfo and PropertyType variants

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Keyed single-flight cache
pub mod cache;

/// Connection configuration
pub mod config;

/// Credential resolution and token cache
pub mod auth;

/// HTTP client with throttling and status mapping
pub mod http;

/// Cursor pagination and association listing
pub mod pagination;

/// Property discovery
pub mod schema;

/// Table and column definitions
pub mod tables;

/// Connector trait and HubSpot implementation
pub mod connector;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ConnectionConfig;
pub use connector::{CheckResult, Connector, HubSpotConnector, ListRequest, RowStream};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
