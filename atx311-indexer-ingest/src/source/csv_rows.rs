//! Header-driven CSV row parsing over any async reader.

use std::sync::Arc;

use csv_async::{AsyncReader, AsyncReaderBuilder, StringRecord};
use futures::{stream, StreamExt, TryStreamExt};
use tokio::io::AsyncRead;

use super::{RawRow, RowStream};
use crate::errors::IngestError;

/// Parse `reader` as CSV with a header line and stream its rows.
///
/// Records shorter than the header get empty values for their missing
/// trailing columns; extra trailing fields are dropped.
pub async fn rows_from_reader<R>(reader: R) -> Result<RowStream, IngestError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(reader);

    let headers: Arc<Vec<String>> = Arc::new(
        reader
            .headers()
            .await?
            .iter()
            .map(str::to_string)
            .collect(),
    );

    Ok(stream::try_unfold(reader, next_record)
        .map_ok(move |record| to_raw_row(&headers, &record))
        .boxed())
}

async fn next_record<R>(
    mut reader: AsyncReader<R>,
) -> Result<Option<(StringRecord, AsyncReader<R>)>, IngestError>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let mut record = StringRecord::new();
    if reader.read_record(&mut record).await? {
        Ok(Some((record, reader)))
    } else {
        Ok(None)
    }
}

fn to_raw_row(headers: &[String], record: &StringRecord) -> RawRow {
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| (header.clone(), record.get(i).unwrap_or_default().to_string()))
        .collect()
}
