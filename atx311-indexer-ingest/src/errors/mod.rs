//! Error types for the ATX 311 indexer ingest.

use std::path::PathBuf;

use atx311_indexer_repository::SearchError;
use atx311_indexer_shared::DocumentError;
use thiserror::Error;

/// Errors that can occur in the ingest. All of them are fatal for the run.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The local source file does not exist.
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// The source could not be opened or read.
    #[error("Source error: {0}")]
    SourceError(String),

    /// The remote download failed or returned a non-success status.
    #[error("Download error: {0}")]
    DownloadError(String),

    /// The source is not valid CSV.
    #[error("CSV error: {0}")]
    CsvError(String),

    /// A row could not be converted into a document.
    #[error("Document error: {0}")]
    DocumentError(#[from] DocumentError),

    /// Error from the search engine.
    #[error("Search error: {0}")]
    SearchError(#[from] SearchError),
}

impl IngestError {
    /// Create a source read error.
    pub fn read(msg: impl Into<String>) -> Self {
        Self::SourceError(msg.into())
    }

    /// Create a download error.
    pub fn download(msg: impl Into<String>) -> Self {
        Self::DownloadError(msg.into())
    }
}

impl From<csv_async::Error> for IngestError {
    fn from(err: csv_async::Error) -> Self {
        Self::CsvError(err.to_string())
    }
}
