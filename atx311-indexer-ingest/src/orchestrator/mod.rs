//! Orchestrator module for the ATX 311 indexer ingest.
//!
//! Coordinates the source, processor, provisioner and loader components.

use chrono::{NaiveDateTime, Utc};
use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::loader::{BulkLoader, LoadSummary};
use crate::processor::RowHydrator;
use crate::provisioner::{IndexProvisioner, ProvisionSummary, ProvisioningStrategy};
use crate::source::{DocumentSource, DocumentStream};

/// Outcome of a full run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub provision: ProvisionSummary,
    pub load: LoadSummary,
}

/// Orchestrator that runs a single ingest pass.
///
/// Provisioning always completes before the first bulk write. Any error
/// ends the run immediately.
pub struct Orchestrator {
    source: DocumentSource,
    hydrator: RowHydrator,
    provisioner: IndexProvisioner,
    loader: BulkLoader,
    strategy: ProvisioningStrategy,
}

impl Orchestrator {
    /// Create a new orchestrator with the given components.
    pub fn new(
        source: DocumentSource,
        hydrator: RowHydrator,
        provisioner: IndexProvisioner,
        loader: BulkLoader,
        strategy: ProvisioningStrategy,
    ) -> Self {
        Self {
            source,
            hydrator,
            provisioner,
            loader,
            strategy,
        }
    }

    /// Run the orchestrator using the current UTC time as the end of the
    /// monthly index range.
    pub async fn run(&self) -> Result<RunSummary, IngestError> {
        self.run_at(Utc::now().naive_utc()).await
    }

    /// Run the orchestrator.
    #[instrument(skip(self), fields(source = %self.source, strategy = %self.strategy))]
    pub async fn run_at(&self, now: NaiveDateTime) -> Result<RunSummary, IngestError> {
        info!("Provisioning indices");
        let provision = match self.strategy {
            ProvisioningStrategy::MonthlyIndices => {
                let documents = self.documents().await?;
                self.provisioner.provision_monthly(documents, now).await?
            }
            ProvisioningStrategy::Template => self.provisioner.provision_template().await?,
        };

        info!("Indexing documents");
        let load = self.loader.load(self.documents().await?).await?;

        Ok(RunSummary { provision, load })
    }

    /// Start a fresh pass over the source.
    async fn documents(&self) -> Result<DocumentStream, IngestError> {
        let rows = self.source.open().await?;
        Ok(self.hydrator.hydrate_stream(rows))
    }
}
