//! # ATX 311 Indexer Repository
//!
//! This crate provides the search engine interface used by the loader, the
//! request payloads it sends (index schemas, templates and bulk writes), and a
//! concrete implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;
pub mod types;

pub use errors::SearchError;
pub use interfaces::SearchEngineClient;
pub use opensearch::{IndexConfig, OpenSearchClient};
pub use types::{BulkOperation, BulkRequest};
