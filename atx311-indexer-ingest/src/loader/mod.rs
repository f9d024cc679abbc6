//! Loader module for the ATX 311 indexer ingest.
//!
//! Submits hydrated documents to the search engine in fixed-size bulk writes,
//! routing each document to its monthly index.

use std::num::NonZeroUsize;
use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, error, info, instrument};

use atx311_indexer_repository::{BulkOperation, BulkRequest, IndexConfig, SearchEngineClient};
use atx311_indexer_shared::HydratedDocument;

use crate::errors::IngestError;
use crate::source::DocumentStream;

/// Documents per bulk write when no batch size is configured.
pub const DEFAULT_BATCH_SIZE: NonZeroUsize = match NonZeroUsize::new(300) {
    Some(size) => size,
    None => unreachable!(),
};

/// Configuration for the bulk loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Number of documents per bulk write.
    pub batch_size: NonZeroUsize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Outcome of a load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Bulk requests issued.
    pub batches: usize,
    /// Documents submitted.
    pub documents: usize,
}

/// Loader that indexes documents into the search engine.
///
/// The loader is responsible for:
/// - Batching documents into fixed-size bulk writes
/// - Naming the monthly index of every document
/// - Stopping at the first failure; there are no retries
pub struct BulkLoader {
    client: Arc<dyn SearchEngineClient>,
    index_config: IndexConfig,
    config: LoaderConfig,
}

impl BulkLoader {
    /// Create a new bulk loader with the default batch size.
    pub fn new(client: Arc<dyn SearchEngineClient>, index_config: IndexConfig) -> Self {
        Self::with_config(client, index_config, LoaderConfig::default())
    }

    /// Create a new bulk loader with custom configuration.
    pub fn with_config(
        client: Arc<dyn SearchEngineClient>,
        index_config: IndexConfig,
        config: LoaderConfig,
    ) -> Self {
        Self {
            client,
            index_config,
            config,
        }
    }

    /// Load every document of `documents`.
    ///
    /// Issues one bulk write per `batch_size` documents; the last write holds
    /// the remainder. A batch containing a failed row or a document without a
    /// valid timestamp is not sent, and nothing after it is either.
    #[instrument(skip(self, documents), fields(batch_size = self.config.batch_size.get()))]
    pub async fn load(&self, documents: DocumentStream) -> Result<LoadSummary, IngestError> {
        let mut batches = documents.chunks(self.config.batch_size.get());
        let mut summary = LoadSummary::default();

        while let Some(batch) = batches.next().await {
            let request = self.build_request(batch)?;
            let count = request.len();

            if let Err(e) = self.client.bulk_index(&request).await {
                error!(
                    error = %e,
                    batch = summary.batches + 1,
                    count,
                    "Bulk write failed"
                );
                return Err(e.into());
            }

            summary.batches += 1;
            summary.documents += count;
            debug!(batch = summary.batches, count, "Bulk write completed");

            if summary.batches % 100 == 0 {
                info!(
                    batches = summary.batches,
                    documents = summary.documents,
                    "Indexing progress"
                );
            }
        }

        info!(
            batches = summary.batches,
            documents = summary.documents,
            "Finished indexing documents"
        );
        Ok(summary)
    }

    fn build_request(
        &self,
        batch: Vec<Result<HydratedDocument, IngestError>>,
    ) -> Result<BulkRequest, IngestError> {
        let mut request = BulkRequest::with_capacity(batch.len());
        for document in batch {
            let document = document?;
            let index = document.index_name(&self.index_config.prefix)?;
            request.push(BulkOperation::new(index, document));
        }
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::RowHydrator;
    use crate::source::rows_from_reader;
    use crate::testing::{service_request_csv, MockSearchClient};
    use atx311_indexer_repository::SearchError;
    use atx311_indexer_shared::DocumentError;
    use serde_json::json;

    async fn documents(created_dates: &[&str]) -> DocumentStream {
        let rows = rows_from_reader(std::io::Cursor::new(service_request_csv(created_dates)))
            .await
            .unwrap();
        RowHydrator::new().hydrate_stream(rows)
    }

    fn loader(client: Arc<MockSearchClient>, batch_size: usize) -> BulkLoader {
        BulkLoader::with_config(
            client,
            IndexConfig::default(),
            LoaderConfig {
                batch_size: NonZeroUsize::new(batch_size).unwrap(),
            },
        )
    }

    #[tokio::test]
    async fn test_batches_with_remainder() {
        let dates = vec!["03/15/2021 02:30:00 PM"; 7];
        let client = Arc::new(MockSearchClient::new());

        let summary = loader(client.clone(), 3)
            .load(documents(&dates).await)
            .await
            .unwrap();

        let sizes: Vec<usize> = client.bulk_requests().iter().map(BulkRequest::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        assert_eq!(
            summary,
            LoadSummary {
                batches: 3,
                documents: 7
            }
        );
    }

    #[tokio::test]
    async fn test_exact_multiple_of_batch_size() {
        let dates = vec!["03/15/2021 02:30:00 PM"; 6];
        let client = Arc::new(MockSearchClient::new());

        loader(client.clone(), 3)
            .load(documents(&dates).await)
            .await
            .unwrap();

        let sizes: Vec<usize> = client.bulk_requests().iter().map(BulkRequest::len).collect();
        assert_eq!(sizes, vec![3, 3]);
    }

    #[tokio::test]
    async fn test_empty_source_issues_no_requests() {
        let client = Arc::new(MockSearchClient::new());

        let summary = loader(client.clone(), 300)
            .load(documents(&[]).await)
            .await
            .unwrap();

        assert_eq!(summary, LoadSummary::default());
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_documents_are_routed_to_monthly_indices() {
        let client = Arc::new(MockSearchClient::new());

        loader(client.clone(), 300)
            .load(documents(&["12/31/2020 11:59:59 PM", "01/01/2021 12:00:00 AM"]).await)
            .await
            .unwrap();

        let requests = client.bulk_requests();
        let operations = requests[0].operations();
        assert_eq!(operations[0].index, "atx311-2020-12");
        assert_eq!(operations[1].index, "atx311-2021-01");
        assert_eq!(
            operations[1].document.get("sr_req_council_district_number"),
            Some(&json!(2))
        );
    }

    #[tokio::test]
    async fn test_bad_timestamp_aborts_its_batch() {
        let client = Arc::new(MockSearchClient::new());
        let dates = [
            "03/15/2021 02:30:00 PM",
            "03/15/2021 02:30:00 PM",
            "03/15/2021 02:30:00 PM",
            "not a date",
            "03/15/2021 02:30:00 PM",
        ];

        let result = loader(client.clone(), 2).load(documents(&dates).await).await;

        assert!(matches!(
            result,
            Err(IngestError::DocumentError(DocumentError::InvalidTimestamp { .. }))
        ));
        assert_eq!(client.bulk_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_bulk_failure_stops_loading() {
        let client = Arc::new(MockSearchClient::new().failing_bulk_at(1));
        let dates = vec!["03/15/2021 02:30:00 PM"; 10];

        let result = loader(client.clone(), 2).load(documents(&dates).await).await;

        assert!(matches!(
            result,
            Err(IngestError::SearchError(SearchError::BulkIndexError(_)))
        ));
        assert_eq!(client.bulk_requests().len(), 2);
    }

    #[test]
    fn test_default_batch_size() {
        assert_eq!(LoaderConfig::default().batch_size.get(), 300);
    }
}
