//! Remote CSV download.

use std::io;

use futures::TryStreamExt;
use tokio_util::io::StreamReader;
use tracing::{info, instrument};
use url::Url;

use super::{rows_from_reader, RowStream};
use crate::errors::IngestError;

/// Austin open-data export of the 311 service-request dataset.
pub const DEFAULT_SOURCE_URL: &str = "https://data.austintexas.gov/api/views/xwdj-i9he/rows.csv";

const ACCESS_TYPE_PARAM: &str = "accessType";
const DOWNLOAD_ACCESS: &str = "DOWNLOAD";

/// A CSV export fetched with a streamed HTTP GET.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    url: Url,
    http: reqwest::Client,
}

impl RemoteSource {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            http: reqwest::Client::new(),
        }
    }

    /// Parse `url` and build a source for it.
    pub fn parse(url: &str) -> Result<Self, IngestError> {
        let url = Url::parse(url)
            .map_err(|e| IngestError::download(format!("Invalid source URL {url}: {e}")))?;
        Ok(Self::new(url))
    }

    /// The URL actually requested: the configured URL with the download
    /// access type appended unless already present.
    pub fn download_url(&self) -> Url {
        let mut url = self.url.clone();
        if !url.query_pairs().any(|(key, _)| key == ACCESS_TYPE_PARAM) {
            url.query_pairs_mut()
                .append_pair(ACCESS_TYPE_PARAM, DOWNLOAD_ACCESS);
        }
        url
    }

    /// Start the download and stream rows as the body arrives.
    #[instrument(skip(self))]
    pub(super) async fn open(&self) -> Result<RowStream, IngestError> {
        let url = self.download_url();
        info!(url = %url, "Starting CSV download");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| IngestError::download(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IngestError::download(format!(
                "Download of {} failed with status {}",
                url, status
            )));
        }

        let body = Box::pin(response.bytes_stream().map_err(io::Error::other));
        rows_from_reader(StreamReader::new(body)).await
    }
}
