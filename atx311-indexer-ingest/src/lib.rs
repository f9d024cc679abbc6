//! # ATX 311 Indexer Ingest
//!
//! This crate provides the ingest components that read the 311 service-request
//! export and bulk-load it into monthly search indices.
//!
//! ## Architecture
//!
//! The ingest follows the Source-Processor-Loader pattern:
//!
//! 1. **Source**: Streams raw CSV rows from a local file or a remote download
//! 2. **Processor**: Hydrates rows into documents using the field mapping table
//! 3. **Provisioner**: Creates the monthly indices or registers an index template
//! 4. **Loader**: Submits documents in fixed-size bulk writes
//! 5. **Orchestrator**: Runs provisioning, then loading, aborting on the first error

pub mod errors;
pub mod loader;
pub mod orchestrator;
pub mod processor;
pub mod provisioner;
pub mod source;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::IngestError;
