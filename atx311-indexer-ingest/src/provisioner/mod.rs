//! Provisioner module for the ATX 311 indexer ingest.
//!
//! Makes sure every monthly index a load will write to exists with the right
//! mappings before the first bulk write is issued.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use futures::TryStreamExt;
use tracing::{debug, info, instrument};

use atx311_indexer_repository::{IndexConfig, SearchEngineClient};
use atx311_indexer_shared::YearMonth;

use crate::errors::IngestError;
use crate::source::DocumentStream;

/// How target indices are prepared before loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisioningStrategy {
    /// Scan the documents for the earliest creation date, then create one
    /// index per month from that month through the current one.
    MonthlyIndices,
    /// Register a single template applied to every index matching the
    /// monthly naming pattern.
    Template,
}

impl fmt::Display for ProvisioningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthlyIndices => write!(f, "monthly-indices"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// Outcome of a provisioning pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionSummary {
    /// Indices created, in creation order.
    pub indices_created: Vec<String>,
    /// Name of the registered template, if any.
    pub template: Option<String>,
}

/// Creates indices or templates through the search engine client.
pub struct IndexProvisioner {
    client: Arc<dyn SearchEngineClient>,
    index_config: IndexConfig,
}

impl IndexProvisioner {
    pub fn new(client: Arc<dyn SearchEngineClient>, index_config: IndexConfig) -> Self {
        Self {
            client,
            index_config,
        }
    }

    /// Create one index per month from the earliest document through `now`.
    ///
    /// The earliest date starts at `now`, so an empty stream still creates
    /// the current month's index. The first failing request aborts the pass.
    ///
    /// # Arguments
    ///
    /// * `documents` - A full pass over the source documents
    /// * `now` - Upper bound of the month range
    #[instrument(skip(self, documents))]
    pub async fn provision_monthly(
        &self,
        mut documents: DocumentStream,
        now: NaiveDateTime,
    ) -> Result<ProvisionSummary, IngestError> {
        let mut earliest = now;
        let mut scanned = 0usize;

        while let Some(document) = documents.try_next().await? {
            let created = document.timestamp()?;
            if created < earliest {
                earliest = created;
            }
            scanned += 1;
        }

        info!(scanned, earliest = %earliest, "Scanned documents for earliest creation date");

        let body = self.index_config.index_body();
        let mut summary = ProvisionSummary::default();

        for month in YearMonth::range_inclusive(
            YearMonth::from_datetime(&earliest),
            YearMonth::from_datetime(&now),
        ) {
            let index = self.index_config.index_name(month);
            self.client.create_index(&index, &body).await?;
            debug!(index = %index, "Created monthly index");
            summary.indices_created.push(index);
        }

        info!(count = summary.indices_created.len(), "Monthly indices created");
        Ok(summary)
    }

    /// Register the index template for the monthly naming pattern.
    #[instrument(skip(self))]
    pub async fn provision_template(&self) -> Result<ProvisionSummary, IngestError> {
        let name = &self.index_config.template_name;
        self.client
            .put_index_template(name, &self.index_config.template_body())
            .await?;

        info!(
            template = %name,
            pattern = %self.index_config.index_pattern(),
            "Index template provisioned"
        );

        Ok(ProvisionSummary {
            indices_created: Vec::new(),
            template: Some(name.clone()),
        })
    }
}
