//! Dependency initialization and wiring for the indexer.

use std::sync::Arc;
use tracing::info;

use crate::config::{IndexerConfig, SourceConfig};
use crate::IndexingError;
use atx311_indexer_ingest::{
    loader::{BulkLoader, LoaderConfig},
    orchestrator::Orchestrator,
    processor::RowHydrator,
    provisioner::IndexProvisioner,
    source::{DocumentSource, RemoteSource},
};
use atx311_indexer_repository::{IndexConfig, OpenSearchClient, SearchEngineClient};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The configured orchestrator ready to run.
    pub orchestrator: Orchestrator,
}

impl Dependencies {
    /// Initialize all dependencies from the resolved configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(IndexingError)` - If the source URL is invalid, the client cannot be
    ///   created, or the cluster is unhealthy
    pub async fn new(config: IndexerConfig) -> Result<Self, IndexingError> {
        info!(
            opensearch_url = %config.opensearch_url,
            source = ?config.source,
            provisioning = %config.provisioning,
            batch_size = config.batch_size.get(),
            "Initializing dependencies"
        );

        let source = match config.source {
            SourceConfig::File(path) => DocumentSource::File(path),
            SourceConfig::Remote(url) => DocumentSource::Remote(RemoteSource::parse(&url)?),
        };

        // Initialize OpenSearch client
        let search_client = OpenSearchClient::new(&config.opensearch_url)
            .await
            .map_err(|e| IndexingError::config(format!("Failed to create OpenSearch client: {}", e)))?;

        if config.health_check {
            let healthy = search_client
                .health_check()
                .await
                .map_err(|e| IndexingError::config(format!("OpenSearch health check failed: {}", e)))?;

            if !healthy {
                return Err(IndexingError::config("OpenSearch cluster is unhealthy"));
            }

            info!("OpenSearch connection verified");
        }

        let client: Arc<dyn SearchEngineClient> = Arc::new(search_client);
        let index_config = IndexConfig::new(config.index_prefix, config.template_name);

        let provisioner = IndexProvisioner::new(client.clone(), index_config.clone());
        let loader = BulkLoader::with_config(
            client,
            index_config,
            LoaderConfig {
                batch_size: config.batch_size,
            },
        );

        let orchestrator = Orchestrator::new(
            source,
            RowHydrator::new(),
            provisioner,
            loader,
            config.provisioning,
        );

        Ok(Self { orchestrator })
    }
}
