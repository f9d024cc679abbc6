//! OpenSearch implementation of the search engine client.
//!
//! This module provides a concrete implementation of `SearchEngineClient`
//! using OpenSearch as the backend, along with the index schema payloads.

mod client;
mod index_config;

pub use client::OpenSearchClient;
pub use index_config::IndexConfig;
