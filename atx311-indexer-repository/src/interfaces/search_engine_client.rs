//! Search engine client trait definition.
//!
//! This module defines the abstract interface for the write-side operations
//! the loader needs, allowing for different backend implementations
//! (OpenSearch, Elasticsearch, test doubles).

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::SearchError;
use crate::types::BulkRequest;

/// Abstract interface for search engine operations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// Every non-success response is reported as an `Err(SearchError)`. Callers
/// treat these as fatal; implementations never retry.
#[async_trait]
pub trait SearchEngineClient: Send + Sync {
    /// Create an index with the given settings and mappings.
    ///
    /// # Arguments
    ///
    /// * `index` - Name of the index to create
    /// * `body` - Creation payload, typically `{"mappings": {...}}`
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchError::IndexCreationError)` - If the engine rejected the request,
    ///   including when the index already exists
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError>;

    /// Register (or replace) an index template.
    ///
    /// # Arguments
    ///
    /// * `name` - Template name
    /// * `body` - Template payload with `index_patterns` and `mappings`
    async fn put_index_template(&self, name: &str, body: &Value) -> Result<(), SearchError>;

    /// Submit one bulk write request.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the engine accepted the request
    /// * `Err(SearchError::BulkIndexError)` - If the request failed with a non-success status
    async fn bulk_index(&self, request: &BulkRequest) -> Result<(), SearchError>;

    /// Check if the search engine is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the cluster reports green or yellow
    /// * `Ok(false)` - If the cluster is unhealthy
    /// * `Err(SearchError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchError>;
}
