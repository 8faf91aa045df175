//! Property discovery with a per-object-type cache

use super::types::{PropertiesResponse, PropertyDescriptor};
use crate::cache::KeyedCache;
use crate::error::{Result, ResultExt};
use crate::http::{HttpClient, RequestConfig};
use std::sync::Arc;
use tracing::{debug, info};

/// Property descriptors for one object type
pub type Properties = Arc<Vec<PropertyDescriptor>>;

/// Caches the property list of each object type for the life of the registry
///
/// Entries never expire. Concurrent lookups of the same object type share
/// one request.
pub struct SchemaRegistry {
    client: Arc<HttpClient>,
    cache: KeyedCache<Properties>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new(client: Arc<HttpClient>) -> Self {
        Self {
            client,
            cache: KeyedCache::new(),
        }
    }

    /// List the properties of `object_type`, fetching them on first use
    pub async fn list_properties(&self, object_type: &str) -> Result<Properties> {
        if let Some(cached) = self.cache.peek(object_type) {
            debug!("Property cache hit for {}", object_type);
            return Ok(cached);
        }

        self.cache
            .get_or_compute(object_type, || self.fetch(object_type))
            .await
            .with_operation("list_properties", object_type)
    }

    /// Names of every property of `object_type`
    pub async fn property_names(&self, object_type: &str) -> Result<Vec<String>> {
        let properties = self.list_properties(object_type).await?;
        Ok(properties.iter().map(|p| p.name.clone()).collect())
    }

    /// Object types whose properties are cached
    pub fn cached_types(&self) -> usize {
        self.cache.len()
    }

    async fn fetch(&self, object_type: &str) -> Result<Properties> {
        let path = format!("/crm/v3/properties/{object_type}");
        let response: PropertiesResponse = self.client.get_json(&path, RequestConfig::new()).await?;

        info!(
            "Discovered {} properties for {}",
            response.results.len(),
            object_type
        );
        Ok(Arc::new(response.results))
    }
}

impl std::fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
