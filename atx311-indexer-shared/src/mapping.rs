//! Static field mapping table.
//!
//! Each entry maps one column of the 311 service-request CSV export to a
//! target document field, the schema type used when provisioning indices, and
//! the conversion applied to the raw cell value.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{json, Map, Value};

use crate::document::TIMESTAMP_FIELD;
use crate::errors::DocumentError;

/// Date format declared in the index schema for every date field.
///
/// This is the engine-side spelling of [`crate::TIMESTAMP_FORMAT`].
pub const SCHEMA_DATE_FORMAT: &str = "MM/dd/yyyy HH:mm:ss a";

static COORDINATES_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\((\d+\.\d+), (-*\d+\.\d+)\)\n?$").expect("coordinates pattern is valid")
});

/// Schema type of a target field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaType {
    Keyword,
    Text,
    Date,
    Integer,
    Float,
    GeoPoint,
}

impl SchemaType {
    /// Name of the type as understood by the search engine.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Text => "text",
            Self::Date => "date",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::GeoPoint => "geo_point",
        }
    }

    /// Field mapping body for this type.
    pub fn to_mapping(&self) -> Value {
        match self {
            Self::Date => json!({ "type": self.as_str(), "format": SCHEMA_DATE_FORMAT }),
            _ => json!({ "type": self.as_str() }),
        }
    }
}

/// Conversion applied to a non-empty raw cell value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Keep the value as a string.
    Text,
    /// Parse a signed integer.
    Integer,
    /// Parse a floating point number.
    Float,
    /// Parse a `(<lat>, <lon>)` pair into `"<lat>,<lon>"`; mismatches become `null`.
    Coordinates,
}

impl Conversion {
    /// Convert `raw`, read from `column`, into a document value.
    ///
    /// Numeric parse failures are errors. A malformed coordinate pair is not:
    /// it yields `null`.
    pub fn apply(&self, column: &str, raw: &str) -> Result<Value, DocumentError> {
        match self {
            Self::Text => Ok(Value::String(raw.to_string())),
            Self::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|_| DocumentError::invalid_integer(column, raw)),
            Self::Float => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() => Ok(Value::from(value)),
                _ => Err(DocumentError::invalid_float(column, raw)),
            },
            Self::Coordinates => Ok(coordinates(raw).map_or(Value::Null, Value::String)),
        }
    }
}

/// One row of the mapping table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column name in the source CSV header.
    pub source_column: &'static str,
    /// Field name in the hydrated document.
    pub target_name: &'static str,
    pub schema: SchemaType,
    pub conversion: Conversion,
}

impl FieldMapping {
    const fn new(
        source_column: &'static str,
        target_name: &'static str,
        schema: SchemaType,
        conversion: Conversion,
    ) -> Self {
        Self {
            source_column,
            target_name,
            schema,
            conversion,
        }
    }
}

/// The full mapping table, in document field order.
pub static FIELD_MAPPINGS: [FieldMapping; 13] = [
    FieldMapping::new(
        "Service Request (SR) Number",
        "sr_req_number",
        SchemaType::Keyword,
        Conversion::Text,
    ),
    FieldMapping::new(
        "SR Description",
        "sr_req_description",
        SchemaType::Keyword,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Method Recieved",
        "sr_req_method_recieved",
        SchemaType::Keyword,
        Conversion::Text,
    ),
    FieldMapping::new(
        "SR Status",
        "sr_req_status",
        SchemaType::Keyword,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Status Change Date",
        "sr_req_status_change_date",
        SchemaType::Date,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Created Date",
        TIMESTAMP_FIELD,
        SchemaType::Date,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Last Update Date",
        "sr_req_last_updated_date",
        SchemaType::Date,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Close Date",
        "sr_req_closed_date",
        SchemaType::Date,
        Conversion::Text,
    ),
    FieldMapping::new(
        "SR Location",
        "sr_req_location",
        SchemaType::Text,
        Conversion::Text,
    ),
    FieldMapping::new(
        "Council District",
        "sr_req_council_district_number",
        SchemaType::Integer,
        Conversion::Integer,
    ),
    FieldMapping::new(
        "Latitude Coordinate",
        "sr_req_latitude_coordinate",
        SchemaType::Float,
        Conversion::Float,
    ),
    FieldMapping::new(
        "Longitude Coordinate",
        "sr_req_longitude_coordinate",
        SchemaType::Float,
        Conversion::Float,
    ),
    FieldMapping::new(
        "(Latitude.Longitude)",
        "sr_req_coordinates",
        SchemaType::GeoPoint,
        Conversion::Coordinates,
    ),
];

/// Parse a `(<lat>, <lon>)` pair into the `"<lat>,<lon>"` geo point form.
///
/// The latitude must be a non-negative decimal. The longitude may carry any
/// number of leading minus signs, which are kept verbatim. A single trailing
/// newline is tolerated.
pub fn coordinates(input: &str) -> Option<String> {
    let captures = COORDINATES_PATTERN.captures(input)?;
    let lat = captures.get(1)?.as_str();
    let lon = captures.get(2)?.as_str();
    Some(format!("{lat},{lon}"))
}

/// Project the mapping table into index schema properties.
pub fn schema_properties() -> Map<String, Value> {
    FIELD_MAPPINGS
        .iter()
        .map(|mapping| (mapping.target_name.to_string(), mapping.schema.to_mapping()))
        .collect()
}
