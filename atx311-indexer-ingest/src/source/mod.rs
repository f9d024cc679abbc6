//! Document source module.
//!
//! Produces a lazy, single-pass stream of raw CSV rows from either a local
//! file or a streamed HTTP download. Each call to [`DocumentSource::open`]
//! starts a fresh pass over the underlying data.

mod csv_rows;
mod remote;

use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;

use futures::stream::BoxStream;
use tracing::{debug, instrument};

use atx311_indexer_shared::HydratedDocument;

use crate::errors::IngestError;

pub use csv_rows::rows_from_reader;
pub use remote::{RemoteSource, DEFAULT_SOURCE_URL};

/// One CSV row keyed by header column name.
pub type RawRow = HashMap<String, String>;

/// Lazy stream of raw rows.
pub type RowStream = BoxStream<'static, Result<RawRow, IngestError>>;

/// Lazy stream of hydrated documents.
pub type DocumentStream = BoxStream<'static, Result<HydratedDocument, IngestError>>;

/// Where the service-request export is read from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// A CSV file on the local filesystem.
    File(PathBuf),
    /// A CSV export downloaded over HTTP.
    Remote(RemoteSource),
}

impl DocumentSource {
    /// Open the source and stream its rows from the beginning.
    ///
    /// # Returns
    ///
    /// * `Ok(RowStream)` - Rows in file order, parsed as they are read
    /// * `Err(IngestError::SourceNotFound)` - If the local file does not exist
    /// * `Err(IngestError::DownloadError)` - If the download request fails
    #[instrument(skip(self), fields(source = %self))]
    pub async fn open(&self) -> Result<RowStream, IngestError> {
        match self {
            Self::File(path) => {
                let file = tokio::fs::File::open(path).await.map_err(|e| {
                    if e.kind() == ErrorKind::NotFound {
                        IngestError::SourceNotFound(path.clone())
                    } else {
                        IngestError::read(format!("Failed to open {}: {}", path.display(), e))
                    }
                })?;
                debug!(path = %path.display(), "Opened source file");
                rows_from_reader(file).await
            }
            Self::Remote(remote) => remote.open().await,
        }
    }
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "file {}", path.display()),
            Self::Remote(remote) => write!(f, "download {}", remote.download_url()),
        }
    }
}
