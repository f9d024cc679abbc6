//! # ATX 311 Indexer Shared
//!
//! Types shared by every layer of the 311 indexer: the static field mapping
//! table, the hydrated document produced from a source row, and the monthly
//! index naming scheme derived from a document's timestamp.

pub mod document;
pub mod errors;
pub mod index_name;
pub mod mapping;

pub use document::{HydratedDocument, TIMESTAMP_FIELD, TIMESTAMP_FORMAT};
pub use errors::DocumentError;
pub use index_name::{monthly_index_name, YearMonth, DEFAULT_INDEX_PREFIX};
pub use mapping::{
    coordinates, schema_properties, Conversion, FieldMapping, SchemaType, FIELD_MAPPINGS,
};
