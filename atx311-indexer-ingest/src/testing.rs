//! Test doubles shared by the ingest tests.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tempfile::NamedTempFile;

use atx311_indexer_repository::{BulkRequest, SearchEngineClient, SearchError};

/// A request received by [`MockSearchClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateIndex(String),
    PutTemplate(String),
    Bulk(BulkRequest),
}

/// Search client that records every request and can be told to fail.
#[derive(Default)]
pub struct MockSearchClient {
    calls: Mutex<Vec<Call>>,
    fail_index_creation_at: Option<usize>,
    fail_template: bool,
    fail_bulk_at: Option<usize>,
}

impl MockSearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the `n`-th (0-based) index creation request.
    pub fn failing_index_creation_at(mut self, n: usize) -> Self {
        self.fail_index_creation_at = Some(n);
        self
    }

    pub fn failing_template(mut self) -> Self {
        self.fail_template = true;
        self
    }

    /// Reject the `n`-th (0-based) bulk request.
    pub fn failing_bulk_at(mut self, n: usize) -> Self {
        self.fail_bulk_at = Some(n);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created_indices(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateIndex(index) => Some(index),
                _ => None,
            })
            .collect()
    }

    pub fn bulk_requests(&self) -> Vec<BulkRequest> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Bulk(request) => Some(request),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap();
        let seen = calls
            .iter()
            .filter(|c| std::mem::discriminant(*c) == std::mem::discriminant(&call))
            .count();
        calls.push(call);
        seen
    }
}

#[async_trait]
impl SearchEngineClient for MockSearchClient {
    async fn create_index(&self, index: &str, body: &Value) -> Result<(), SearchError> {
        assert!(body["mappings"]["properties"].is_object());
        let n = self.record(Call::CreateIndex(index.to_string()));
        if self.fail_index_creation_at == Some(n) {
            return Err(SearchError::index_creation(format!(
                "Index creation failed with status 400 Bad Request: {index} exists"
            )));
        }
        Ok(())
    }

    async fn put_index_template(&self, name: &str, body: &Value) -> Result<(), SearchError> {
        assert!(body["index_patterns"].is_array());
        self.record(Call::PutTemplate(name.to_string()));
        if self.fail_template {
            return Err(SearchError::template("Template registration failed"));
        }
        Ok(())
    }

    async fn bulk_index(&self, request: &BulkRequest) -> Result<(), SearchError> {
        let n = self.record(Call::Bulk(request.clone()));
        if self.fail_bulk_at == Some(n) {
            return Err(SearchError::bulk_index(
                "Bulk write failed with status 500 Internal Server Error",
            ));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<bool, SearchError> {
        Ok(true)
    }
}

/// A CSV file in the temp directory, removed on drop.
pub struct TempCsv {
    file: NamedTempFile,
}

impl TempCsv {
    pub async fn new(contents: &str) -> Self {
        let file = tempfile::Builder::new()
            .prefix("atx311-")
            .suffix(".csv")
            .tempfile()
            .expect("failed to create temp csv");
        tokio::fs::write(file.path(), contents).await.unwrap();
        Self { file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Build a CSV export with one row per creation date.
pub fn service_request_csv(created_dates: &[&str]) -> String {
    let mut csv = String::from("Service Request (SR) Number,SR Status,Created Date,Council District\n");
    for (i, created) in created_dates.iter().enumerate() {
        csv.push_str(&format!("21-{:05},Closed,{},{}\n", i, created, i % 10 + 1));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_temp_csv_is_removed_on_drop() {
        let csv = TempCsv::new("SR Status\nOpen\n").await;
        let path = csv.path().to_path_buf();

        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            "SR Status\nOpen\n"
        );

        drop(csv);
        assert!(!path.exists());
    }
}
