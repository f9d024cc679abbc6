//! Row hydrator implementation.
//!
//! Transforms raw CSV rows into `HydratedDocument`s using the static field
//! mapping table.

use futures::{StreamExt, TryStreamExt};
use serde_json::{Map, Value};

use atx311_indexer_shared::{DocumentError, FieldMapping, HydratedDocument, FIELD_MAPPINGS};

use crate::errors::IngestError;
use crate::source::{DocumentStream, RawRow, RowStream};

/// Processor that renames and converts row values into document fields.
///
/// For every mapped column:
/// - absent from the row: no field is written
/// - present but empty: the field is `null`
/// - present with a value: the field holds the converted value
#[derive(Debug, Clone, Copy)]
pub struct RowHydrator {
    mappings: &'static [FieldMapping],
}

impl RowHydrator {
    /// Create a hydrator over the service-request mapping table.
    pub fn new() -> Self {
        Self {
            mappings: &FIELD_MAPPINGS,
        }
    }

    /// Hydrate a single row.
    ///
    /// # Returns
    ///
    /// * `Ok(HydratedDocument)` - The converted document
    /// * `Err(DocumentError)` - If a numeric column holds non-numeric text
    pub fn hydrate(&self, row: &RawRow) -> Result<HydratedDocument, DocumentError> {
        let mut fields = Map::new();

        for mapping in self.mappings {
            let Some(raw) = row.get(mapping.source_column) else {
                continue;
            };

            let value = if raw.is_empty() {
                Value::Null
            } else {
                mapping.conversion.apply(mapping.source_column, raw)?
            };
            fields.insert(mapping.target_name.to_string(), value);
        }

        Ok(HydratedDocument::from_fields(fields))
    }

    /// Hydrate every row of `rows` lazily, in order.
    pub fn hydrate_stream(self, rows: RowStream) -> DocumentStream {
        rows.and_then(move |row| async move { self.hydrate(&row).map_err(IngestError::from) })
            .boxed()
    }
}

impl Default for RowHydrator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::rows_from_reader;
    use serde_json::json;

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_hydrate_full_row() {
        let hydrator = RowHydrator::new();
        let doc = hydrator
            .hydrate(&row(&[
                ("Service Request (SR) Number", "21-00012345"),
                ("SR Description", "Loose Dog"),
                ("Method Recieved", "Phone"),
                ("SR Status", "Closed"),
                ("Status Change Date", "03/16/2021 09:00:00 AM"),
                ("Created Date", "03/15/2021 02:30:00 PM"),
                ("Last Update Date", "03/16/2021 09:00:00 AM"),
                ("Close Date", "03/16/2021 09:00:00 AM"),
                ("SR Location", "100 CONGRESS AVE, AUSTIN, TX 78701"),
                ("Council District", "9"),
                ("Latitude Coordinate", "30.263"),
                ("Longitude Coordinate", "-97.744"),
                ("(Latitude.Longitude)", "(30.263, -97.744)"),
            ]))
            .unwrap();

        assert_eq!(doc.fields().len(), 13);
        assert_eq!(doc.get("sr_req_number"), Some(&json!("21-00012345")));
        assert_eq!(doc.get("sr_req_method_recieved"), Some(&json!("Phone")));
        assert_eq!(doc.get("timestamp"), Some(&json!("03/15/2021 02:30:00 PM")));
        assert_eq!(doc.get("sr_req_council_district_number"), Some(&json!(9)));
        assert_eq!(doc.get("sr_req_latitude_coordinate"), Some(&json!(30.263)));
        assert_eq!(doc.get("sr_req_longitude_coordinate"), Some(&json!(-97.744)));
        assert_eq!(doc.get("sr_req_coordinates"), Some(&json!("30.263,-97.744")));
        assert_eq!(doc.index_name("atx311").unwrap(), "atx311-2021-03");
    }

    #[test]
    fn test_empty_values_are_null() {
        let doc = RowHydrator::new()
            .hydrate(&row(&[
                ("Close Date", ""),
                ("Council District", ""),
                ("(Latitude.Longitude)", ""),
            ]))
            .unwrap();

        assert_eq!(doc.get("sr_req_closed_date"), Some(&Value::Null));
        assert_eq!(doc.get("sr_req_council_district_number"), Some(&Value::Null));
        assert_eq!(doc.get("sr_req_coordinates"), Some(&Value::Null));
    }

    #[test]
    fn test_absent_and_unmapped_columns_are_skipped() {
        let doc = RowHydrator::new()
            .hydrate(&row(&[("SR Status", "Open"), ("Ward", "4")]))
            .unwrap();

        assert_eq!(doc.fields().len(), 1);
        assert_eq!(doc.get("sr_req_status"), Some(&json!("Open")));
        assert!(doc.get("sr_req_number").is_none());
    }

    #[test]
    fn test_malformed_coordinates_are_null() {
        let doc = RowHydrator::new()
            .hydrate(&row(&[("(Latitude.Longitude)", "(-30.1, -97.1)")]))
            .unwrap();

        assert_eq!(doc.get("sr_req_coordinates"), Some(&Value::Null));
    }

    #[test]
    fn test_non_numeric_integer_fails() {
        let result = RowHydrator::new().hydrate(&row(&[("Council District", "N/A")]));

        assert_eq!(
            result,
            Err(DocumentError::invalid_integer("Council District", "N/A"))
        );
    }

    #[tokio::test]
    async fn test_hydrate_stream_stops_at_failing_row() {
        let rows = rows_from_reader(
            "SR Status,Council District\nOpen,1\nClosed,x\nOpen,3\n".as_bytes(),
        )
        .await
        .unwrap();

        let mut documents = RowHydrator::new().hydrate_stream(rows);

        let first = documents.try_next().await.unwrap().unwrap();
        assert_eq!(first.get("sr_req_council_district_number"), Some(&json!(1)));
        assert!(matches!(
            documents.try_next().await,
            Err(IngestError::DocumentError(DocumentError::InvalidInteger { .. }))
        ));
    }
}
