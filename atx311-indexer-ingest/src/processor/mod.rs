//! Processor module for the ATX 311 indexer ingest.
//!
//! Converts raw CSV rows into hydrated documents.

mod row_hydrator;

pub use row_hydrator::RowHydrator;
