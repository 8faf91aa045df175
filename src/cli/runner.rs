//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::ConnectionConfig;
use crate::connector::{Connector, HubSpotConnector, ListRequest};
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

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
            Commands::Check => self.check().await,
            Commands::Tables { table } => self.tables(table.as_deref()).await,
            Commands::List {
                table,
                archived,
                limit,
                columns,
            } => {
                let request = ListRequest {
                    archived: *archived,
                    limit: *limit,
                    columns: columns.clone(),
                };
                self.list(table, request).await
            }
            Commands::Get { table, id, columns } => {
                self.get(table, id, columns.as_deref()).await
            }
            Commands::Associations { from, id, to } => self.associations(from, id, to).await,
            Commands::Serve { port } => {
                let connector = self.connector()?;
                crate::cli::serve(connector, *port).await
            }
        }
    }

    /// Load configuration
    fn load_config(&self) -> Result<ConnectionConfig> {
        // Inline config takes precedence
        if let Some(json_str) = &self.cli.config_json {
            let value: Value = serde_json::from_str(json_str)
                .map_err(|e| Error::config(format!("Invalid config JSON: {e}")))?;
            return ConnectionConfig::from_json(value);
        }

        if let Some(path) = &self.cli.config {
            return ConnectionConfig::from_file(path);
        }

        // Credentials may still come from the environment
        Ok(ConnectionConfig::default())
    }

    fn connector(&self) -> Result<HubSpotConnector> {
        HubSpotConnector::new(self.load_config()?)
    }

    /// Check connection
    async fn check(&self) -> Result<()> {
        let connector = self.connector()?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Checking connection to {}", connector.config().base_url)
            }
        }));

        let result = connector.check().await?;
        let (status, message) = if result.success {
            ("SUCCEEDED", "Connection successful".to_string())
        } else {
            (
                "FAILED",
                format!(
                    "Connection failed: {}",
                    result.message.unwrap_or_default()
                ),
            )
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": {
                "status": status,
                "message": message,
                "portalId": result.portal_id
            }
        }));
        Ok(())
    }

    /// List tables with their columns
    async fn tables(&self, only: Option<&str>) -> Result<()> {
        let connector = self.connector()?;

        let tables = match only {
            Some(name) => vec![connector.table(name).await?],
            None => connector.tables().await?,
        };

        self.output_message(&json!({
            "type": "TABLES",
            "tables": tables
        }));
        Ok(())
    }

    /// List the rows of a table, stopping on Ctrl-C
    async fn list(&self, table: &str, request: ListRequest) -> Result<()> {
        let connector = self.connector()?;
        let cancel = CancellationToken::new();

        let watcher = {
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping after the current row");
                    cancel.cancel();
                }
            })
        };

        let start = Instant::now();
        let result = connector
            .list(table, &request, &cancel, &mut |row| {
                self.output_message(&json!({
                    "type": "RECORD",
                    "record": {
                        "table": table,
                        "data": row
                    }
                }));
            })
            .await;
        watcher.abort();

        let summary = result?;
        info!(
            "Listed {} rows from {} in {:.2}s",
            summary.rows,
            table,
            start.elapsed().as_secs_f64()
        );

        self.output_message(&json!({
            "type": "SUMMARY",
            "summary": {
                "table": table,
                "rows": summary.rows,
                "pages": summary.pages,
                "stop": summary.stop,
                "duration_ms": start.elapsed().as_millis() as u64
            }
        }));
        Ok(())
    }

    /// Fetch one row
    async fn get(&self, table: &str, id: &str, columns: Option<&[String]>) -> Result<()> {
        let connector = self.connector()?;

        match connector.get_selected(table, id, columns).await? {
            Some(row) => self.output_message(&json!({
                "type": "RECORD",
                "record": {
                    "table": table,
                    "data": row
                }
            })),
            None => self.output_message(&json!({
                "type": "LOG",
                "log": {
                    "level": "WARN",
                    "message": format!("No {table} row with id '{id}'")
                }
            })),
        }
        Ok(())
    }

    /// List associated ids
    async fn associations(&self, from: &str, id: &str, to: &str) -> Result<()> {
        let connector = self.connector()?;
        let associations = connector.associations(from, id, to).await?;

        self.output_message(&json!({
            "type": "ASSOCIATIONS",
            "from": {"type": from, "id": id},
            "to": to,
            "associations": associations
        }));
        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}
