//! OpenSearch client implementation.
//!
//! This module provides the concrete implementation of `SearchEngineClient`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    cluster::ClusterHealthParts,
    http::request::JsonBody,
    http::response::Response,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{IndicesCreateParts, IndicesPutTemplateParts},
    BulkParts, OpenSearch,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::SearchError;
use crate::interfaces::SearchEngineClient;
use crate::types::BulkRequest;

/// OpenSearch client implementation.
///
/// # Example
///
/// ```ignore
/// let client = OpenSearchClient::new("http://localhost:9200").await?;
/// client.create_index("atx311-2021-03", &IndexConfig::default().index_body()).await?;
/// ```
pub struct OpenSearchClient {
    client: OpenSearch,
}

impl OpenSearchClient {
    /// Create a new OpenSearch client connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    ///
    /// # Returns
    ///
    /// * `Ok(OpenSearchClient)` - A new client instance
    /// * `Err(SearchError)` - If the URL is invalid or transport setup fails
    pub async fn new(url: &str) -> Result<Self, SearchError> {
        let parsed_url = Url::parse(url).map_err(|e| SearchError::connection(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let client = OpenSearch::new(transport);

        info!(url = %url, "Created OpenSearch client");

        Ok(Self { client })
    }

    /// Turn a non-success response into an error message with its body.
    async fn ensure_success(response: Response, operation: &str) -> Result<Response, String> {
        let status = response.status_code();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();
        error!(status = %status, body = %error_body, operation, "Request failed");
        Err(format!(
            "{} failed with status {}: {}",
            operation, status, error_body
        ))
    }

    /// Count the items of a bulk response that carry an error.
    fn failed_items(response_body: &Value) -> usize {
        if !response_body
            .get("errors")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return 0;
        }

        response_body
            .get("items")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter(|item| {
                        item.as_object()
                            .into_iter()
                            .flat_map(|actions| actions.values())
                            .any(|result| result.get("error").is_some())
                    })
                    .count()
            })
            .unwrap_or(0)
    }
}

#[async_trait]
impl SearchEngineClient for OpenSearchClient {
    #[instrument(skip(self, body))]
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::index_creation(e.to_string()))?;

        Self::ensure_success(response, "Index creation")
            .await
            .map_err(SearchError::index_creation)?;

        debug!(index = %index, "Index created");
        Ok(())
    }

    #[instrument(skip(self, body))]
    async fn put_index_template(&self, name: &str, body: &Value) -> Result<(), SearchError> {
        let response = self
            .client
            .indices()
            .put_template(IndicesPutTemplateParts::Name(name))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::template(e.to_string()))?;

        Self::ensure_success(response, "Template registration")
            .await
            .map_err(SearchError::template)?;

        info!(template = %name, "Index template registered");
        Ok(())
    }

    #[instrument(skip(self, request), fields(document_count = request.len()))]
    async fn bulk_index(&self, request: &BulkRequest) -> Result<(), SearchError> {
        if request.is_empty() {
            return Ok(());
        }

        let body: Vec<JsonBody<Value>> = request
            .to_lines()?
            .into_iter()
            .map(JsonBody::new)
            .collect();

        let response = self
            .client
            .bulk(BulkParts::None)
            .body(body)
            .send()
            .await
            .map_err(|e| SearchError::bulk_index(e.to_string()))?;

        let response = Self::ensure_success(response, "Bulk write")
            .await
            .map_err(SearchError::bulk_index)?;

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;

        let failed = Self::failed_items(&response_body);
        if failed > 0 {
            warn!(
                failed,
                total = request.len(),
                "Bulk write accepted with item failures"
            );
        }

        debug!(count = request.len(), "Bulk write accepted");
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        let response = self
            .client
            .cluster()
            .health(ClusterHealthParts::None)
            .send()
            .await
            .map_err(|e| SearchError::connection(e.to_string()))?;

        let health: Value = response
            .json()
            .await
            .map_err(|e| SearchError::parse(e.to_string()))?;
        let status = health
            .get("status")
            .and_then(Value::as_str)
            .unwrap_or("unknown");

        info!(status = %status, "OpenSearch cluster status");

        Ok(status == "green" || status == "yellow")
    }
}
