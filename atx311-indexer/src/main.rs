use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use atx311_indexer::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    match atx311_indexer::run(cli.into_config()).await {
        Ok(summary) => {
            info!(
                indices_created = summary.provision.indices_created.len(),
                template = ?summary.provision.template,
                batches = summary.load.batches,
                documents = summary.load.documents,
                "Indexing complete"
            );
        }
        Err(e) => {
            error!(error = %e, "Indexing failed");
            // The message already embeds every wrapped error.
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
