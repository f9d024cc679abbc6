//! Command-line configuration for the indexer.
//!
//! Every setting can be passed as a flag; the endpoints can also come from
//! the environment (or a `.env` file loaded at startup).

mod dependencies;

pub use dependencies::Dependencies;

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use atx311_indexer_ingest::loader::DEFAULT_BATCH_SIZE;
use atx311_indexer_ingest::provisioner::ProvisioningStrategy;
use atx311_indexer_ingest::source::DEFAULT_SOURCE_URL;
use atx311_indexer_shared::DEFAULT_INDEX_PREFIX;

/// Default OpenSearch URL.
pub const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProvisioningArg {
    /// Create one index per month up front.
    Monthly,
    /// Register an index template for the monthly pattern.
    Template,
}

impl From<ProvisioningArg> for ProvisioningStrategy {
    fn from(arg: ProvisioningArg) -> Self {
        match arg {
            ProvisioningArg::Monthly => Self::MonthlyIndices,
            ProvisioningArg::Template => Self::Template,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "atx311-indexer")]
#[command(
    about = "Load the Austin 311 service-request export into monthly OpenSearch indices",
    long_about = None
)]
pub struct Cli {
    /// Path to a local CSV export. The export is downloaded when no path is given.
    #[arg(value_parser = ensure_path)]
    path: Option<PathBuf>,

    /// Path to a local CSV export (same as the positional argument)
    #[arg(long = "path", id = "path_flag", value_name = "PATH", value_parser = ensure_path, conflicts_with = "path")]
    path_flag: Option<PathBuf>,

    /// OpenSearch URL
    #[arg(long, env = "OPENSEARCH_URL", default_value = DEFAULT_OPENSEARCH_URL)]
    opensearch_url: String,

    /// URL of the remote CSV export
    #[arg(long, env = "ATX311_SOURCE_URL", default_value = DEFAULT_SOURCE_URL)]
    source_url: String,

    /// Prefix of the monthly index names
    #[arg(long, default_value = DEFAULT_INDEX_PREFIX)]
    index_prefix: String,

    /// Name of the index template
    #[arg(long, default_value = DEFAULT_INDEX_PREFIX)]
    template_name: String,

    /// Documents per bulk request
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: NonZeroUsize,

    /// How indices are provisioned [default: monthly for a local file, template for a download]
    #[arg(long, value_enum)]
    provisioning: Option<ProvisioningArg>,

    /// Do not check cluster health before loading
    #[arg(long)]
    skip_health_check: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Resolve the parsed arguments into a configuration.
    pub fn into_config(self) -> IndexerConfig {
        let source = match self.path.or(self.path_flag) {
            Some(path) => SourceConfig::File(path),
            None => SourceConfig::Remote(self.source_url),
        };

        let provisioning = self
            .provisioning
            .map(ProvisioningStrategy::from)
            .unwrap_or(match source {
                SourceConfig::File(_) => ProvisioningStrategy::MonthlyIndices,
                SourceConfig::Remote(_) => ProvisioningStrategy::Template,
            });

        IndexerConfig {
            opensearch_url: self.opensearch_url,
            source,
            index_prefix: self.index_prefix,
            template_name: self.template_name,
            batch_size: self.batch_size,
            provisioning,
            health_check: !self.skip_health_check,
        }
    }
}

/// Where documents are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    File(PathBuf),
    Remote(String),
}

/// Resolved indexer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    pub opensearch_url: String,
    pub source: SourceConfig,
    pub index_prefix: String,
    pub template_name: String,
    pub batch_size: NonZeroUsize,
    pub provisioning: ProvisioningStrategy,
    pub health_check: bool,
}

/// Resolve a CLI path to an absolute path, failing if it does not exist.
fn ensure_path(input: &str) -> Result<PathBuf, String> {
    std::fs::canonicalize(input).map_err(|_| format!("{input} does not exist"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<IndexerConfig, clap::Error> {
        let argv = std::iter::once("atx311-indexer").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(Cli::into_config)
    }

    fn existing_dir() -> String {
        std::env::temp_dir().to_string_lossy().into_owned()
    }

    #[test]
    fn test_positional_path_defaults_to_monthly_indices() {
        let dir = existing_dir();
        let config = parse(&[dir.as_str()]).unwrap();

        assert!(matches!(config.source, SourceConfig::File(ref p) if p.is_absolute()));
        assert_eq!(config.provisioning, ProvisioningStrategy::MonthlyIndices);
        assert_eq!(config.batch_size.get(), 300);
        assert_eq!(config.index_prefix, "atx311");
        assert!(config.health_check);
    }

    #[test]
    fn test_path_flag() {
        let dir = existing_dir();
        let config = parse(&["--path", dir.as_str()]).unwrap();
        assert!(matches!(config.source, SourceConfig::File(_)));
    }

    #[test]
    fn test_missing_path_is_rejected() {
        assert!(parse(&["/nonexistent/atx311.csv"]).is_err());
    }

    #[test]
    fn test_both_paths_conflict() {
        let dir = existing_dir();
        assert!(parse(&[dir.as_str(), "--path", dir.as_str()]).is_err());
    }

    #[test]
    fn test_no_path_downloads_with_template() {
        let config = parse(&["--source-url", "https://example.org/rows.csv"]).unwrap();

        assert_eq!(
            config.source,
            SourceConfig::Remote("https://example.org/rows.csv".to_string())
        );
        assert_eq!(config.provisioning, ProvisioningStrategy::Template);
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--source-url",
            "https://example.org/rows.csv",
            "--provisioning",
            "monthly",
            "--batch-size",
            "250",
            "--index-prefix",
            "austin",
            "--skip-health-check",
        ])
        .unwrap();

        assert_eq!(config.provisioning, ProvisioningStrategy::MonthlyIndices);
        assert_eq!(config.batch_size.get(), 250);
        assert_eq!(config.index_prefix, "austin");
        assert!(!config.health_check);
    }

    #[test]
    fn test_zero_batch_size_is_rejected() {
        assert!(parse(&["--batch-size", "0"]).is_err());
    }
}
