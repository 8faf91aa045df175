//! HubSpot connector
//!
//! One instance owns its HTTP client, token cache, property cache and
//! account cache. Clones share all of them.

use super::account::{AccountInfo, ACCOUNT_INFO_KEY, ACCOUNT_INFO_PATH};
use super::{CheckResult, Connector, ListRequest, RowStream};
use crate::auth::{Credentials, TokenCache};
use crate::cache::KeyedCache;
use crate::config::ConnectionConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::{path_segment, HttpClient, RequestConfig};
use crate::pagination::{
    fetch_associations, fetch_pages, AssociatedId, FetchOptions, FetchSummary, Page,
};
use crate::schema::SchemaRegistry;
use crate::tables::{builtin_tables, fill, Column, ColumnSource, Table, TableKind};
use crate::types::{JsonValue, Record, Row};
use async_trait::async_trait;
use futures::future::try_join_all;
use futures::StreamExt;
use reqwest::Client;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// HubSpot serves at most this many records per page when histories are requested
const HISTORY_PAGE_SIZE: u32 = 50;

struct Inner {
    config: ConnectionConfig,
    client: Arc<HttpClient>,
    tokens: Arc<TokenCache>,
    schema: SchemaRegistry,
    account: KeyedCache<AccountInfo>,
}

/// Connector for the HubSpot CRM
#[derive(Clone)]
pub struct HubSpotConnector {
    inner: Arc<Inner>,
}

impl HubSpotConnector {
    /// Create a connector, resolving credentials from config and environment
    pub fn new(config: ConnectionConfig) -> Result<Self> {
        let credentials = Credentials::resolve(&config)?;
        Self::with_credentials(config, credentials)
    }

    /// Create a connector with already resolved credentials
    pub fn with_credentials(config: ConnectionConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let http_config = config.http_client_config();
        let client = Client::builder()
            .timeout(http_config.timeout)
            .user_agent(&http_config.user_agent)
            .build()?;

        let tokens = Arc::new(TokenCache::with_client(
            credentials,
            config.token_url(),
            client.clone(),
        ));
        let client = Arc::new(
            HttpClient::from_parts(client, http_config).with_tokens(Arc::clone(&tokens)),
        );

        info!(
            "HubSpot connector ready ({} credentials, {})",
            tokens.credentials().kind(),
            config.base_url
        );

        Ok(Self {
            inner: Arc::new(Inner {
                schema: SchemaRegistry::new(Arc::clone(&client)),
                config,
                client,
                tokens,
                account: KeyedCache::new(),
            }),
        })
    }

    /// The configuration this connector was built from
    pub fn config(&self) -> &ConnectionConfig {
        &self.inner.config
    }

    /// The token cache
    pub fn tokens(&self) -> &Arc<TokenCache> {
        &self.inner.tokens
    }

    /// The property registry
    pub fn schema(&self) -> &SchemaRegistry {
        &self.inner.schema
    }

    /// Resolve a table by name or object type, with its property columns
    pub async fn table(&self, name: &str) -> Result<Table> {
        let table = builtin_tables()
            .into_iter()
            .find(|t| t.matches(name))
            .ok_or_else(|| Error::table_not_found(name))?;

        match table.kind {
            TableKind::CrmObject => {
                let properties = self.inner.schema.list_properties(&table.object_type).await?;
                Ok(table.with_properties(&properties))
            }
            TableKind::Owner => Ok(table),
        }
    }

    /// Account details, fetched once per connector
    pub async fn account_info(&self) -> Result<AccountInfo> {
        self.inner
            .account
            .get_or_compute(ACCOUNT_INFO_KEY, || self.fetch_account_info())
            .await
    }

    /// Portal id of the connected account
    pub async fn portal_id(&self) -> Result<String> {
        Ok(self.account_info().await?.portal_id.to_string())
    }

    /// Records of `to_type` associated with one record
    pub async fn associations(
        &self,
        from_type: &str,
        record_id: &str,
        to_type: &str,
    ) -> Result<Vec<AssociatedId>> {
        fetch_associations(&self.inner.client, record_id, from_type, to_type).await
    }

    /// Stream the rows of `table` instead of pushing them into a callback
    ///
    /// Dropping the stream cancels the listing.
    pub fn list_stream(&self, table: &str, request: ListRequest) -> RowStream {
        let (tx, rx) = futures::channel::mpsc::unbounded::<Result<Row>>();
        let this = self.clone();
        let table = table.to_string();

        tokio::spawn(async move {
            let cancel = CancellationToken::new();
            let mut on_row = |row: Row| {
                if tx.unbounded_send(Ok(row)).is_err() {
                    cancel.cancel();
                }
            };

            let result = this.list(&table, &request, &cancel, &mut on_row).await;
            match result {
                Ok(summary) => debug!("Stream of {} finished: {:?}", table, summary),
                Err(e) => {
                    let _ = tx.unbounded_send(Err(e));
                }
            }
        });

        rx.boxed()
    }

    async fn fetch_account_info(&self) -> Result<AccountInfo> {
        let info: AccountInfo = self
            .inner
            .client
            .get_json(ACCOUNT_INFO_PATH, RequestConfig::new())
            .await?;
        debug!("Connected to portal {}", info.portal_id);
        Ok(info)
    }

    /// Base request for a table: archived filter, property list and,
    /// when a selected column needs them, property histories
    fn table_request(
        table: &Table,
        archived: Option<bool>,
        columns: &[&Column],
    ) -> RequestConfig {
        let mut config =
            RequestConfig::new().query_opt("archived", archived.map(|a| a.to_string()));

        if table.kind == TableKind::CrmObject {
            let keys = table.property_keys().join(",");
            if !keys.is_empty() {
                if Table::wants_history(columns) {
                    config = config.query("propertiesWithHistory", keys.clone());
                }
                config = config.query("properties", keys);
            }
        }
        config
    }

    /// Build a row, fetching any hydrated columns
    async fn build_row(&self, table: &Table, columns: &[&Column], record: &Record) -> Result<Row> {
        let mut row = table.row(record, columns);

        let hydrated: Vec<&Column> = columns
            .iter()
            .copied()
            .filter(|c| c.source.is_hydrated())
            .collect();
        if hydrated.is_empty() {
            return Ok(row);
        }

        let values = try_join_all(
            hydrated
                .iter()
                .map(|column| self.hydrate(table, column, record)),
        )
        .await?;

        for (column, value) in hydrated.into_iter().zip(values) {
            fill(&mut row, column, value);
        }
        Ok(row)
    }

    async fn hydrate(&self, table: &Table, column: &Column, record: &Record) -> Result<JsonValue> {
        match &column.source {
            ColumnSource::PortalId => Ok(JsonValue::String(self.portal_id().await?)),
            ColumnSource::Associations(to_type) => {
                let ids = self
                    .associations(&table.object_type, &record.id, to_type)
                    .await?;
                Ok(ids.into_iter().map(|a| JsonValue::String(a.id)).collect())
            }
            _ => Ok(column.extract(record)),
        }
    }
}

#[async_trait]
impl Connector for HubSpotConnector {
    async fn check(&self) -> Result<CheckResult> {
        match self.fetch_account_info().await {
            Ok(info) => {
                info!("Connection check passed for portal {}", info.portal_id);
                Ok(CheckResult::success(info.portal_id.to_string()))
            }
            Err(e) => {
                warn!("Connection check failed: {}", e);
                Ok(CheckResult::failure(e.to_string()))
            }
        }
    }

    async fn tables(&self) -> Result<Vec<Table>> {
        let names: Vec<String> = builtin_tables().into_iter().map(|t| t.name).collect();
        try_join_all(names.iter().map(|name| self.table(name))).await
    }

    async fn list(
        &self,
        table: &str,
        request: &ListRequest,
        cancel: &CancellationToken,
        on_row: &mut (dyn FnMut(Row) + Send),
    ) -> Result<FetchSummary> {
        let table = self.table(table).await?;
        let object_type = table.object_type.clone();
        let columns = table.select(request.columns.as_deref())?;
        let base = Self::table_request(&table, Some(request.archived), &columns);
        let page_size = if Table::wants_history(&columns) {
            self.inner.config.page_size.min(HISTORY_PAGE_SIZE)
        } else {
            self.inner.config.page_size
        };
        let options = FetchOptions::page_size(page_size).limit(request.limit);
        let path = table.list_path();

        let client = self.inner.client.as_ref();
        let (table, columns, base, path) = (&table, columns.as_slice(), &base, path.as_str());

        let summary = fetch_pages(
            &options,
            cancel,
            move |page_request| {
                let config = page_request.apply(base.clone());
                async move {
                    let mut page: Page<Record> = client.get_json(path, config).await?;
                    page_request.trim(&mut page.results);
                    let mut rows = Vec::with_capacity(page.results.len());
                    for record in &page.results {
                        rows.push(self.build_row(table, columns, record).await?);
                    }
                    Ok::<_, Error>(Page {
                        results: rows,
                        paging: page.paging,
                    })
                }
            },
            |row| on_row(row),
        )
        .await
        .with_operation("list", &object_type)?;

        debug!(
            "Listed {} rows of {} in {} pages ({:?})",
            summary.rows, table.name, summary.pages, summary.stop
        );
        Ok(summary)
    }

    async fn get_selected(
        &self,
        table: &str,
        id: &str,
        columns: Option<&[String]>,
    ) -> Result<Option<Row>> {
        // Ids that cannot be a path segment name no record
        if path_segment(id).is_none() {
            debug!("Id {:?} cannot name a record", id);
            return Ok(None);
        }

        let table = self.table(table).await?;
        let columns = table.select(columns)?;
        let config = Self::table_request(&table, None, &columns);
        let Some(path) = table.get_path(id) else {
            return Ok(None);
        };

        let record: Record = match self.inner.client.get_json(&path, config).await {
            Ok(record) => record,
            Err(e) if e.is_not_found() => {
                debug!("{} {} not found", table.object_type, id);
                return Ok(None);
            }
            Err(e) => return Err(e.in_operation("get", &table.object_type)),
        };

        let row = self
            .build_row(&table, &columns, &record)
            .await
            .with_operation("get", &table.object_type)?;
        Ok(Some(row))
    }
}

impl std::fmt::Debug for HubSpotConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubSpotConnector")
            .field("base_url", &self.inner.config.base_url)
            .field("tokens", &self.inner.tokens)
            .field("schema", &self.inner.schema)
            .finish_non_exhaustive()
    }
}
