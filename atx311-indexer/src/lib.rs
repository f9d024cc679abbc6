//! # ATX 311 Indexer
//!
//! Main library for the ATX 311 service-request indexer.
//!
//! This crate provides the command-line configuration and the dependency
//! wiring for running a single ingest pass.

pub mod config;

pub use config::{Cli, Dependencies, IndexerConfig, SourceConfig};

use atx311_indexer_ingest::orchestrator::RunSummary;
use thiserror::Error;

/// Errors that can occur during indexer initialization or execution.
#[derive(Error, Debug)]
pub enum IndexingError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Ingest error.
    #[error("Ingest error: {0}")]
    IngestError(#[from] atx311_indexer_ingest::IngestError),
}

impl IndexingError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Wire the dependencies for `config` and run one ingest pass.
pub async fn run(config: IndexerConfig) -> Result<RunSummary, IndexingError> {
    let dependencies = Dependencies::new(config).await?;
    Ok(dependencies.orchestrator.run().await?)
}
