//! Hydrated document type.
//!
//! A hydrated document is a source row after field renaming and type
//! conversion. It serializes as a flat JSON object, which is exactly the
//! document line sent in a bulk write.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::DocumentError;
use crate::index_name::{monthly_index_name, YearMonth};

/// Target field holding the request creation date.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Local parse format for every date value in the export,
/// e.g. `03/15/2021 02:30:00 PM`.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// A source row converted into document fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HydratedDocument {
    fields: Map<String, Value>,
}

impl HydratedDocument {
    /// Wrap an already converted field map.
    pub fn from_fields(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Get a field value. `None` means the source column was absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Parse the creation timestamp of this document.
    ///
    /// # Returns
    ///
    /// * `Ok(NaiveDateTime)` - The parsed creation date
    /// * `Err(DocumentError::MissingTimestamp)` - If the field is absent or null
    /// * `Err(DocumentError::InvalidTimestamp)` - If the value does not match [`TIMESTAMP_FORMAT`]
    pub fn timestamp(&self) -> Result<NaiveDateTime, DocumentError> {
        match self.fields.get(TIMESTAMP_FIELD) {
            None | Some(Value::Null) => Err(DocumentError::MissingTimestamp),
            Some(Value::String(raw)) => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
                .map_err(|e| DocumentError::invalid_timestamp(raw.as_str(), e)),
            Some(other) => Err(DocumentError::invalid_timestamp(
                other.to_string(),
                "not a string",
            )),
        }
    }

    /// Name of the monthly index this document belongs to.
    pub fn index_name(&self, prefix: &str) -> Result<String, DocumentError> {
        let created = self.timestamp()?;
        Ok(monthly_index_name(prefix, YearMonth::from_datetime(&created)))
    }
}
