//! Index naming and schema payloads.
//!
//! Every monthly index shares the same mappings, projected from the static
//! field mapping table. They are provisioned either by creating each index up
//! front or by registering a template matching the index name pattern.

use serde_json::{json, Value};

use atx311_indexer_shared::{
    monthly_index_name, schema_properties, YearMonth, DEFAULT_INDEX_PREFIX,
};

/// Naming configuration for the monthly indices and their template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// Prefix of every monthly index, e.g. `atx311` for `atx311-2021-03`.
    pub prefix: String,
    /// Name under which the index template is registered.
    pub template_name: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_PREFIX, DEFAULT_INDEX_PREFIX)
    }
}

impl IndexConfig {
    pub fn new(prefix: impl Into<String>, template_name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            template_name: template_name.into(),
        }
    }

    /// Name of the index holding documents created in `month`.
    pub fn index_name(&self, month: YearMonth) -> String {
        monthly_index_name(&self.prefix, month)
    }

    /// Wildcard pattern matching every monthly index.
    pub fn index_pattern(&self) -> String {
        format!("{}-*", self.prefix)
    }

    /// Body of an index creation request.
    pub fn index_body(&self) -> Value {
        json!({
            "mappings": {
                "properties": schema_properties()
            }
        })
    }

    /// Body of an index template registration request.
    pub fn template_body(&self) -> Value {
        json!({
            "index_patterns": [self.index_pattern()],
            "mappings": {
                "properties": schema_properties()
            }
        })
    }
}
