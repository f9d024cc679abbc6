//! Request payload types for the search engine.

use serde_json::{json, Value};

use atx311_indexer_shared::HydratedDocument;

use crate::errors::SearchError;

/// One index operation of a bulk write: the target index and the document.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    pub index: String,
    pub document: HydratedDocument,
}

impl BulkOperation {
    pub fn new(index: impl Into<String>, document: HydratedDocument) -> Self {
        Self {
            index: index.into(),
            document,
        }
    }

    /// The action line naming the target index.
    pub fn action(&self) -> Value {
        json!({ "index": { "_index": self.index } })
    }
}

/// A batch of index operations submitted as a single bulk write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRequest {
    operations: Vec<BulkOperation>,
}

impl BulkRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            operations: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, operation: BulkOperation) {
        self.operations.push(operation);
    }

    pub fn operations(&self) -> &[BulkOperation] {
        &self.operations
    }

    /// Number of documents in the request.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// The bulk payload as alternating action/document JSON values, one per
    /// newline-delimited line on the wire.
    pub fn to_lines(&self) -> Result<Vec<Value>, SearchError> {
        let mut lines = Vec::with_capacity(self.operations.len() * 2);
        for operation in &self.operations {
            lines.push(operation.action());
            lines.push(serde_json::to_value(&operation.document)?);
        }
        Ok(lines)
    }
}

impl FromIterator<BulkOperation> for BulkRequest {
    fn from_iter<I: IntoIterator<Item = BulkOperation>>(iter: I) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}
